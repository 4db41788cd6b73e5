//! Repository trait definitions.
//!
//! The traits here are the abstract interface between the service layer and
//! the storage backends. Implementations must be `Send + Sync` to work with
//! async Rust.

use async_trait::async_trait;

use crate::api::{
    Doctor, DoctorChanges, DoctorId, NewDoctor, NewPatient, Patient, PatientChanges, PatientId,
};

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository operations for the doctor resource.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// List all doctors in storage order.
    async fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>>;

    /// Fetch one doctor by id, or `NotFound`.
    async fn get_doctor(&self, id: DoctorId) -> RepositoryResult<Doctor>;

    /// Look up a doctor by license number. Used as the fast-path duplicate
    /// check before insertion; the unique constraint remains authoritative.
    async fn find_doctor_by_kmpdc_number(
        &self,
        kmpdc_number: &str,
    ) -> RepositoryResult<Option<Doctor>>;

    /// Persist a new doctor atomically and return it with its assigned id.
    async fn insert_doctor(&self, new_doctor: &NewDoctor) -> RepositoryResult<Doctor>;

    /// Apply a partial update atomically and return the updated doctor.
    /// Fields absent from `changes` keep their stored values.
    async fn update_doctor(
        &self,
        id: DoctorId,
        changes: &DoctorChanges,
    ) -> RepositoryResult<Doctor>;

    /// Remove a doctor, or `NotFound` if the id does not exist.
    async fn delete_doctor(&self, id: DoctorId) -> RepositoryResult<()>;
}

/// Repository operations for the patient resource.
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// List all patients in storage order.
    async fn list_patients(&self) -> RepositoryResult<Vec<Patient>>;

    /// Fetch one patient by id, or `NotFound`.
    async fn get_patient(&self, id: PatientId) -> RepositoryResult<Patient>;

    /// Look up a patient by government identity number.
    async fn find_patient_by_id_number(
        &self,
        id_number: &str,
    ) -> RepositoryResult<Option<Patient>>;

    /// Persist a new patient atomically and return it with its assigned id.
    async fn insert_patient(&self, new_patient: &NewPatient) -> RepositoryResult<Patient>;

    /// Apply a partial update atomically and return the updated patient.
    async fn update_patient(
        &self,
        id: PatientId,
        changes: &PatientChanges,
    ) -> RepositoryResult<Patient>;

    /// Remove a patient, or `NotFound` if the id does not exist.
    async fn delete_patient(&self, id: PatientId) -> RepositoryResult<()>;
}

/// Combined repository interface covering both resources.
///
/// The HTTP layer holds an `Arc<dyn FullRepository>` so backends can be
/// swapped without touching handlers.
#[async_trait]
pub trait FullRepository: DoctorRepository + PatientRepository {
    /// Verify the backing store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}
