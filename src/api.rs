//! Public data types for the clinic registry.
//!
//! These are the entity shapes exchanged between the HTTP layer, the service
//! layer, and the repository backends. All types derive Serialize/Deserialize
//! for JSON serialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Doctor identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DoctorId(pub i64);

/// Patient identifier (database primary key).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PatientId(pub i64);

impl DoctorId {
    pub fn new(value: i64) -> Self {
        DoctorId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl PatientId {
    pub fn new(value: i64) -> Self {
        PatientId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for DoctorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered doctor.
///
/// `kmpdc_number` is the professional license number and is unique across all
/// doctors; the store enforces this with a unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialisation_id: i32,
    pub phone: String,
    pub email: String,
    pub bio: String,
    pub kmpdc_number: String,
}

/// Fields required to register a new doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialisation_id: i32,
    pub phone: String,
    pub email: String,
    pub bio: String,
    pub kmpdc_number: String,
}

/// Partial doctor update. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DoctorChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialisation_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kmpdc_number: Option<String>,
}

impl DoctorChanges {
    /// True when no field is set, i.e. the update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.specialisation_id.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.bio.is_none()
            && self.kmpdc_number.is_none()
    }

    /// Apply the supplied fields over an existing doctor, leaving the rest
    /// unchanged.
    pub fn apply(&self, doctor: &mut Doctor) {
        if let Some(ref name) = self.name {
            doctor.name = name.clone();
        }
        if let Some(specialisation_id) = self.specialisation_id {
            doctor.specialisation_id = specialisation_id;
        }
        if let Some(ref phone) = self.phone {
            doctor.phone = phone.clone();
        }
        if let Some(ref email) = self.email {
            doctor.email = email.clone();
        }
        if let Some(ref bio) = self.bio {
            doctor.bio = bio.clone();
        }
        if let Some(ref kmpdc_number) = self.kmpdc_number {
            doctor.kmpdc_number = kmpdc_number.clone();
        }
    }
}

/// A registered patient.
///
/// `id_number` is the government identity number and is unique across all
/// patients. `email` is the only optional field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub insurance_provider: String,
    pub policy_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Fields required to register a new patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub phone_number: String,
    pub insurance_provider: String,
    pub policy_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Partial patient update. Fields left as `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl PatientChanges {
    /// True when no field is set, i.e. the update would be a no-op.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.id_number.is_none()
            && self.date_of_birth.is_none()
            && self.gender.is_none()
            && self.phone_number.is_none()
            && self.insurance_provider.is_none()
            && self.policy_number.is_none()
            && self.email.is_none()
    }

    /// Apply the supplied fields over an existing patient, leaving the rest
    /// unchanged.
    pub fn apply(&self, patient: &mut Patient) {
        if let Some(ref first_name) = self.first_name {
            patient.first_name = first_name.clone();
        }
        if let Some(ref last_name) = self.last_name {
            patient.last_name = last_name.clone();
        }
        if let Some(ref id_number) = self.id_number {
            patient.id_number = id_number.clone();
        }
        if let Some(date_of_birth) = self.date_of_birth {
            patient.date_of_birth = date_of_birth;
        }
        if let Some(ref gender) = self.gender {
            patient.gender = gender.clone();
        }
        if let Some(ref phone_number) = self.phone_number {
            patient.phone_number = phone_number.clone();
        }
        if let Some(ref insurance_provider) = self.insurance_provider {
            patient.insurance_provider = insurance_provider.clone();
        }
        if let Some(ref policy_number) = self.policy_number {
            patient.policy_number = policy_number.clone();
        }
        if let Some(ref email) = self.email {
            patient.email = Some(email.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doctor() -> Doctor {
        Doctor {
            id: DoctorId::new(1),
            name: "A. Kim".to_string(),
            specialisation_id: 1,
            phone: "0700".to_string(),
            email: "a@x.com".to_string(),
            bio: "x".to_string(),
            kmpdc_number: "K123".to_string(),
        }
    }

    #[test]
    fn test_doctor_id_roundtrip() {
        let id = DoctorId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id, DoctorId(42));
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_value(PatientId::new(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }

    #[test]
    fn test_doctor_changes_empty() {
        assert!(DoctorChanges::default().is_empty());
        let changes = DoctorChanges {
            phone: Some("0711".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_doctor_changes_apply_is_a_merge() {
        let mut doctor = sample_doctor();
        let changes = DoctorChanges {
            phone: Some("0711".to_string()),
            bio: Some("updated".to_string()),
            ..Default::default()
        };
        changes.apply(&mut doctor);

        assert_eq!(doctor.phone, "0711");
        assert_eq!(doctor.bio, "updated");
        // Untouched fields keep their values.
        assert_eq!(doctor.name, "A. Kim");
        assert_eq!(doctor.kmpdc_number, "K123");
    }

    #[test]
    fn test_patient_optional_email_skipped_when_absent() {
        let patient = Patient {
            id: PatientId::new(1),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            id_number: "11223344".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            gender: "Female".to_string(),
            phone_number: "0712345678".to_string(),
            insurance_provider: "NHIF".to_string(),
            policy_number: "P-9".to_string(),
            email: None,
        };
        let json = serde_json::to_value(&patient).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["date_of_birth"], "1990-05-17");
    }
}
