//! High-level persistence services.
//!
//! Free functions over `&dyn FullRepository` so the HTTP layer and tests work
//! against any backend. Create operations run the natural-key duplicate
//! pre-check here, before any write is attempted; the store's unique
//! constraint remains the correctness backstop under concurrent writers.

use tracing::{debug, info};

use crate::api::{
    Doctor, DoctorChanges, DoctorId, NewDoctor, NewPatient, Patient, PatientChanges, PatientId,
};
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};

/// List all doctors.
pub async fn list_doctors(repo: &dyn FullRepository) -> RepositoryResult<Vec<Doctor>> {
    let doctors = repo.list_doctors().await?;
    debug!(count = doctors.len(), "listed doctors");
    Ok(doctors)
}

/// Fetch one doctor by id.
pub async fn get_doctor(repo: &dyn FullRepository, id: DoctorId) -> RepositoryResult<Doctor> {
    repo.get_doctor(id).await
}

/// Register a new doctor.
///
/// Rejects the registration early when the license number is already taken,
/// then persists atomically. A concurrent writer can still lose the race
/// between check and insert; the unique constraint surfaces that as the same
/// duplicate error.
pub async fn register_doctor(
    repo: &dyn FullRepository,
    new_doctor: &NewDoctor,
) -> RepositoryResult<Doctor> {
    if repo
        .find_doctor_by_kmpdc_number(&new_doctor.kmpdc_number)
        .await?
        .is_some()
    {
        return Err(RepositoryError::duplicate_with_context(
            format!(
                "Doctor with kmpdc number {} already exists",
                new_doctor.kmpdc_number
            ),
            ErrorContext::new("register_doctor").with_entity("doctor"),
        ));
    }

    let doctor = repo.insert_doctor(new_doctor).await?;
    info!(id = doctor.id.value(), "registered doctor");
    Ok(doctor)
}

/// Apply a partial update to a doctor.
pub async fn update_doctor(
    repo: &dyn FullRepository,
    id: DoctorId,
    changes: &DoctorChanges,
) -> RepositoryResult<Doctor> {
    let doctor = repo.update_doctor(id, changes).await?;
    info!(id = doctor.id.value(), "updated doctor");
    Ok(doctor)
}

/// Delete a doctor by id.
pub async fn delete_doctor(repo: &dyn FullRepository, id: DoctorId) -> RepositoryResult<()> {
    repo.delete_doctor(id).await?;
    info!(id = id.value(), "deleted doctor");
    Ok(())
}

/// List all patients.
pub async fn list_patients(repo: &dyn FullRepository) -> RepositoryResult<Vec<Patient>> {
    let patients = repo.list_patients().await?;
    debug!(count = patients.len(), "listed patients");
    Ok(patients)
}

/// Fetch one patient by id.
pub async fn get_patient(repo: &dyn FullRepository, id: PatientId) -> RepositoryResult<Patient> {
    repo.get_patient(id).await
}

/// Register a new patient, rejecting duplicate identity numbers early.
pub async fn register_patient(
    repo: &dyn FullRepository,
    new_patient: &NewPatient,
) -> RepositoryResult<Patient> {
    if repo
        .find_patient_by_id_number(&new_patient.id_number)
        .await?
        .is_some()
    {
        return Err(RepositoryError::duplicate_with_context(
            format!(
                "Patient with ID number {} already exists",
                new_patient.id_number
            ),
            ErrorContext::new("register_patient").with_entity("patient"),
        ));
    }

    let patient = repo.insert_patient(new_patient).await?;
    info!(id = patient.id.value(), "registered patient");
    Ok(patient)
}

/// Apply a partial update to a patient.
pub async fn update_patient(
    repo: &dyn FullRepository,
    id: PatientId,
    changes: &PatientChanges,
) -> RepositoryResult<Patient> {
    let patient = repo.update_patient(id, changes).await?;
    info!(id = patient.id.value(), "updated patient");
    Ok(patient)
}

/// Delete a patient by id.
pub async fn delete_patient(repo: &dyn FullRepository, id: PatientId) -> RepositoryResult<()> {
    repo.delete_patient(id).await?;
    info!(id = id.value(), "deleted patient");
    Ok(())
}

/// Verify the backing store is reachable.
pub async fn health_check(repo: &dyn FullRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}
