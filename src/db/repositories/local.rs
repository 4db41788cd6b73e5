//! In-memory repository for unit testing and local development.
//!
//! Rows live in id-ordered maps behind a single `RwLock`, so every mutation is
//! atomic with respect to other callers. Natural-key uniqueness is enforced
//! here the same way the Postgres backend's unique constraints enforce it,
//! keeping behavior identical across backends.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::api::{
    Doctor, DoctorChanges, DoctorId, NewDoctor, NewPatient, Patient, PatientChanges, PatientId,
};
use crate::db::repository::{
    DoctorRepository, ErrorContext, FullRepository, PatientRepository, RepositoryError,
    RepositoryResult,
};

#[derive(Debug, Default)]
struct Inner {
    doctors: BTreeMap<i64, Doctor>,
    patients: BTreeMap<i64, Patient>,
    next_doctor_id: i64,
    next_patient_id: i64,
}

/// In-memory implementation of the repository traits.
#[derive(Debug, Default)]
pub struct LocalRepository {
    inner: RwLock<Inner>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn doctor_not_found(id: DoctorId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Doctor {} not found", id),
            ErrorContext::default().with_entity("doctor").with_entity_id(id),
        )
    }

    fn patient_not_found(id: PatientId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Patient {} not found", id),
            ErrorContext::default().with_entity("patient").with_entity_id(id),
        )
    }
}

#[async_trait]
impl DoctorRepository for LocalRepository {
    async fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        Ok(self.inner.read().doctors.values().cloned().collect())
    }

    async fn get_doctor(&self, id: DoctorId) -> RepositoryResult<Doctor> {
        self.inner
            .read()
            .doctors
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::doctor_not_found(id))
    }

    async fn find_doctor_by_kmpdc_number(
        &self,
        kmpdc_number: &str,
    ) -> RepositoryResult<Option<Doctor>> {
        Ok(self
            .inner
            .read()
            .doctors
            .values()
            .find(|d| d.kmpdc_number == kmpdc_number)
            .cloned())
    }

    async fn insert_doctor(&self, new_doctor: &NewDoctor) -> RepositoryResult<Doctor> {
        let mut inner = self.inner.write();

        // Mirrors the unique constraint on doctors.kmpdc_number.
        if inner
            .doctors
            .values()
            .any(|d| d.kmpdc_number == new_doctor.kmpdc_number)
        {
            return Err(RepositoryError::duplicate_with_context(
                format!("kmpdc_number {} already registered", new_doctor.kmpdc_number),
                ErrorContext::new("insert_doctor").with_entity("doctor"),
            ));
        }

        inner.next_doctor_id += 1;
        let doctor = Doctor {
            id: DoctorId::new(inner.next_doctor_id),
            name: new_doctor.name.clone(),
            specialisation_id: new_doctor.specialisation_id,
            phone: new_doctor.phone.clone(),
            email: new_doctor.email.clone(),
            bio: new_doctor.bio.clone(),
            kmpdc_number: new_doctor.kmpdc_number.clone(),
        };
        inner.doctors.insert(doctor.id.value(), doctor.clone());
        Ok(doctor)
    }

    async fn update_doctor(
        &self,
        id: DoctorId,
        changes: &DoctorChanges,
    ) -> RepositoryResult<Doctor> {
        let mut inner = self.inner.write();

        if !inner.doctors.contains_key(&id.value()) {
            return Err(Self::doctor_not_found(id));
        }

        if let Some(ref kmpdc_number) = changes.kmpdc_number {
            if inner
                .doctors
                .values()
                .any(|d| d.id != id && &d.kmpdc_number == kmpdc_number)
            {
                return Err(RepositoryError::duplicate_with_context(
                    format!("kmpdc_number {} already registered", kmpdc_number),
                    ErrorContext::new("update_doctor")
                        .with_entity("doctor")
                        .with_entity_id(id),
                ));
            }
        }

        let doctor = inner
            .doctors
            .get_mut(&id.value())
            .ok_or_else(|| Self::doctor_not_found(id))?;
        changes.apply(doctor);
        Ok(doctor.clone())
    }

    async fn delete_doctor(&self, id: DoctorId) -> RepositoryResult<()> {
        self.inner
            .write()
            .doctors
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| Self::doctor_not_found(id))
    }
}

#[async_trait]
impl PatientRepository for LocalRepository {
    async fn list_patients(&self) -> RepositoryResult<Vec<Patient>> {
        Ok(self.inner.read().patients.values().cloned().collect())
    }

    async fn get_patient(&self, id: PatientId) -> RepositoryResult<Patient> {
        self.inner
            .read()
            .patients
            .get(&id.value())
            .cloned()
            .ok_or_else(|| Self::patient_not_found(id))
    }

    async fn find_patient_by_id_number(
        &self,
        id_number: &str,
    ) -> RepositoryResult<Option<Patient>> {
        Ok(self
            .inner
            .read()
            .patients
            .values()
            .find(|p| p.id_number == id_number)
            .cloned())
    }

    async fn insert_patient(&self, new_patient: &NewPatient) -> RepositoryResult<Patient> {
        let mut inner = self.inner.write();

        // Mirrors the unique constraint on patients.id_number.
        if inner
            .patients
            .values()
            .any(|p| p.id_number == new_patient.id_number)
        {
            return Err(RepositoryError::duplicate_with_context(
                format!("id_number {} already registered", new_patient.id_number),
                ErrorContext::new("insert_patient").with_entity("patient"),
            ));
        }

        inner.next_patient_id += 1;
        let patient = Patient {
            id: PatientId::new(inner.next_patient_id),
            first_name: new_patient.first_name.clone(),
            last_name: new_patient.last_name.clone(),
            id_number: new_patient.id_number.clone(),
            date_of_birth: new_patient.date_of_birth,
            gender: new_patient.gender.clone(),
            phone_number: new_patient.phone_number.clone(),
            insurance_provider: new_patient.insurance_provider.clone(),
            policy_number: new_patient.policy_number.clone(),
            email: new_patient.email.clone(),
        };
        inner.patients.insert(patient.id.value(), patient.clone());
        Ok(patient)
    }

    async fn update_patient(
        &self,
        id: PatientId,
        changes: &PatientChanges,
    ) -> RepositoryResult<Patient> {
        let mut inner = self.inner.write();

        if !inner.patients.contains_key(&id.value()) {
            return Err(Self::patient_not_found(id));
        }

        if let Some(ref id_number) = changes.id_number {
            if inner
                .patients
                .values()
                .any(|p| p.id != id && &p.id_number == id_number)
            {
                return Err(RepositoryError::duplicate_with_context(
                    format!("id_number {} already registered", id_number),
                    ErrorContext::new("update_patient")
                        .with_entity("patient")
                        .with_entity_id(id),
                ));
            }
        }

        let patient = inner
            .patients
            .get_mut(&id.value())
            .ok_or_else(|| Self::patient_not_found(id))?;
        changes.apply(patient);
        Ok(patient.clone())
    }

    async fn delete_patient(&self, id: PatientId) -> RepositoryResult<()> {
        self.inner
            .write()
            .patients
            .remove(&id.value())
            .map(|_| ())
            .ok_or_else(|| Self::patient_not_found(id))
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
