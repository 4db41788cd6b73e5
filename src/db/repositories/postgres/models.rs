use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{doctors, patients};
use crate::api::{
    Doctor, DoctorChanges, DoctorId, NewDoctor, NewPatient, Patient, PatientChanges, PatientId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DoctorRow {
    pub id: i64,
    pub name: String,
    pub specialisation_id: i32,
    pub phone: String,
    pub email: String,
    pub bio: String,
    pub kmpdc_number: String,
}

impl From<DoctorRow> for Doctor {
    fn from(row: DoctorRow) -> Self {
        Doctor {
            id: DoctorId::new(row.id),
            name: row.name,
            specialisation_id: row.specialisation_id,
            phone: row.phone,
            email: row.email,
            bio: row.bio,
            kmpdc_number: row.kmpdc_number,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub struct NewDoctorRow {
    pub name: String,
    pub specialisation_id: i32,
    pub phone: String,
    pub email: String,
    pub bio: String,
    pub kmpdc_number: String,
}

impl From<&NewDoctor> for NewDoctorRow {
    fn from(new_doctor: &NewDoctor) -> Self {
        NewDoctorRow {
            name: new_doctor.name.clone(),
            specialisation_id: new_doctor.specialisation_id,
            phone: new_doctor.phone.clone(),
            email: new_doctor.email.clone(),
            bio: new_doctor.bio.clone(),
            kmpdc_number: new_doctor.kmpdc_number.clone(),
        }
    }
}

/// Partial update changeset. `None` fields are left out of the generated
/// UPDATE statement, which is what gives PUT its merge semantics.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = doctors)]
pub struct DoctorChangeset {
    pub name: Option<String>,
    pub specialisation_id: Option<i32>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub kmpdc_number: Option<String>,
}

impl From<&DoctorChanges> for DoctorChangeset {
    fn from(changes: &DoctorChanges) -> Self {
        DoctorChangeset {
            name: changes.name.clone(),
            specialisation_id: changes.specialisation_id,
            phone: changes.phone.clone(),
            email: changes.email.clone(),
            bio: changes.bio.clone(),
            kmpdc_number: changes.kmpdc_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub insurance_provider: String,
    pub policy_number: String,
    pub email: Option<String>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: PatientId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            id_number: row.id_number,
            date_of_birth: row.date_of_birth,
            gender: row.gender,
            phone_number: row.phone_number,
            insurance_provider: row.insurance_provider,
            policy_number: row.policy_number,
            email: row.email,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
pub struct NewPatientRow {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub insurance_provider: String,
    pub policy_number: String,
    pub email: Option<String>,
}

impl From<&NewPatient> for NewPatientRow {
    fn from(new_patient: &NewPatient) -> Self {
        NewPatientRow {
            first_name: new_patient.first_name.clone(),
            last_name: new_patient.last_name.clone(),
            id_number: new_patient.id_number.clone(),
            date_of_birth: new_patient.date_of_birth,
            gender: new_patient.gender.clone(),
            phone_number: new_patient.phone_number.clone(),
            insurance_provider: new_patient.insurance_provider.clone(),
            policy_number: new_patient.policy_number.clone(),
            email: new_patient.email.clone(),
        }
    }
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = patients)]
pub struct PatientChangeset {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub id_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub insurance_provider: Option<String>,
    pub policy_number: Option<String>,
    pub email: Option<String>,
}

impl From<&PatientChanges> for PatientChangeset {
    fn from(changes: &PatientChanges) -> Self {
        PatientChangeset {
            first_name: changes.first_name.clone(),
            last_name: changes.last_name.clone(),
            id_number: changes.id_number.clone(),
            date_of_birth: changes.date_of_birth,
            gender: changes.gender.clone(),
            phone_number: changes.phone_number.clone(),
            insurance_provider: changes.insurance_provider.clone(),
            policy_number: changes.policy_number.clone(),
            email: changes.email.clone(),
        }
    }
}
