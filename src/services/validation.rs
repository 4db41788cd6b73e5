//! Declarative payload validation for the clinic resources.
//!
//! Validation runs over the raw JSON object before it is deserialized into a
//! typed payload, so the checks can report precise per-field messages for
//! whatever subset of fields the request supplies. Create handlers first gate
//! on [`missing_fields`]; update handlers validate only the supplied subset.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::{Map, Value};

/// Fields that must be present when registering a doctor.
pub const DOCTOR_REQUIRED_FIELDS: &[&str] = &[
    "name",
    "specialisation_id",
    "phone",
    "email",
    "bio",
    "kmpdc_number",
];

/// All fields the doctor schema recognizes.
pub const DOCTOR_FIELDS: &[&str] = DOCTOR_REQUIRED_FIELDS;

/// Fields that must be present when registering a patient.
pub const PATIENT_REQUIRED_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "id_number",
    "date_of_birth",
    "gender",
    "phone_number",
    "insurance_provider",
    "policy_number",
];

/// All fields the patient schema recognizes (`email` is optional).
pub const PATIENT_FIELDS: &[&str] = &[
    "first_name",
    "last_name",
    "id_number",
    "date_of_birth",
    "gender",
    "phone_number",
    "insurance_provider",
    "policy_number",
    "email",
];

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Return the required fields absent from the payload, in declaration order.
pub fn missing_fields(data: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|field| !data.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

/// Validate the doctor fields present in the payload.
pub fn validate_doctor_fields(data: &Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    reject_unknown_fields(&mut errors, data, DOCTOR_FIELDS);
    check_string(&mut errors, data, "name");
    check_positive_integer(&mut errors, data, "specialisation_id");
    check_string(&mut errors, data, "phone");
    check_email(&mut errors, data, "email");
    check_string(&mut errors, data, "bio");
    check_string(&mut errors, data, "kmpdc_number");
    errors
}

/// Validate the patient fields present in the payload.
pub fn validate_patient_fields(data: &Map<String, Value>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    reject_unknown_fields(&mut errors, data, PATIENT_FIELDS);
    check_string(&mut errors, data, "first_name");
    check_string(&mut errors, data, "last_name");
    check_string(&mut errors, data, "id_number");
    check_date(&mut errors, data, "date_of_birth");
    check_string(&mut errors, data, "gender");
    check_string(&mut errors, data, "phone_number");
    check_string(&mut errors, data, "insurance_provider");
    check_string(&mut errors, data, "policy_number");
    check_email(&mut errors, data, "email");
    errors
}

fn push_error(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

fn reject_unknown_fields(errors: &mut FieldErrors, data: &Map<String, Value>, known: &[&str]) {
    for key in data.keys() {
        if !known.contains(&key.as_str()) {
            push_error(errors, key, "Unknown field");
        }
    }
}

fn check_string(errors: &mut FieldErrors, data: &Map<String, Value>, field: &str) {
    let Some(value) = data.get(field) else {
        return;
    };
    match value.as_str() {
        Some(s) if s.trim().is_empty() => push_error(errors, field, "Must not be empty"),
        Some(_) => {}
        None => push_error(errors, field, "Must be a string"),
    }
}

fn check_email(errors: &mut FieldErrors, data: &Map<String, Value>, field: &str) {
    let Some(value) = data.get(field) else {
        return;
    };
    match value.as_str() {
        Some(s) if is_plausible_email(s) => {}
        Some(_) => push_error(errors, field, "Not a valid email address"),
        None => push_error(errors, field, "Must be a string"),
    }
}

fn check_date(errors: &mut FieldErrors, data: &Map<String, Value>, field: &str) {
    let Some(value) = data.get(field) else {
        return;
    };
    match value.as_str() {
        Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {}
        Some(_) => push_error(errors, field, "Must be a date in YYYY-MM-DD format"),
        None => push_error(errors, field, "Must be a string"),
    }
}

fn check_positive_integer(errors: &mut FieldErrors, data: &Map<String, Value>, field: &str) {
    let Some(value) = data.get(field) else {
        return;
    };
    match value.as_i64() {
        Some(n) if n >= 1 && n <= i64::from(i32::MAX) => {}
        Some(_) => push_error(errors, field, "Must be a positive integer"),
        None => push_error(errors, field, "Must be an integer"),
    }
}

/// Minimal `local@domain` shape check. Full RFC address validation is not the
/// goal; the store does not rely on this for correctness.
fn is_plausible_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test payload must be an object")
    }

    fn valid_doctor() -> Map<String, Value> {
        object(json!({
            "name": "A. Kim",
            "specialisation_id": 1,
            "phone": "0700",
            "email": "a@x.com",
            "bio": "x",
            "kmpdc_number": "K123"
        }))
    }

    #[test]
    fn test_valid_doctor_has_no_errors() {
        assert!(validate_doctor_fields(&valid_doctor()).is_empty());
    }

    #[test]
    fn test_missing_fields_reported_in_order() {
        let mut data = valid_doctor();
        data.remove("phone");
        data.remove("name");
        assert_eq!(
            missing_fields(&data, DOCTOR_REQUIRED_FIELDS),
            vec!["name".to_string(), "phone".to_string()]
        );
    }

    #[test]
    fn test_no_missing_fields_for_complete_payload() {
        assert!(missing_fields(&valid_doctor(), DOCTOR_REQUIRED_FIELDS).is_empty());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut data = valid_doctor();
        data.insert("email".to_string(), json!("not-an-email"));
        let errors = validate_doctor_fields(&data);
        assert_eq!(errors["email"], vec!["Not a valid email address"]);
    }

    #[test]
    fn test_empty_string_rejected() {
        let mut data = valid_doctor();
        data.insert("name".to_string(), json!("   "));
        let errors = validate_doctor_fields(&data);
        assert_eq!(errors["name"], vec!["Must not be empty"]);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut data = valid_doctor();
        data.insert("phone".to_string(), json!(700));
        data.insert("specialisation_id".to_string(), json!("cardiology"));
        let errors = validate_doctor_fields(&data);
        assert_eq!(errors["phone"], vec!["Must be a string"]);
        assert_eq!(errors["specialisation_id"], vec!["Must be an integer"]);
    }

    #[test]
    fn test_non_positive_specialisation_rejected() {
        let mut data = valid_doctor();
        data.insert("specialisation_id".to_string(), json!(0));
        let errors = validate_doctor_fields(&data);
        assert_eq!(errors["specialisation_id"], vec!["Must be a positive integer"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut data = valid_doctor();
        data.insert("favourite_color".to_string(), json!("blue"));
        let errors = validate_doctor_fields(&data);
        assert_eq!(errors["favourite_color"], vec!["Unknown field"]);
    }

    #[test]
    fn test_patient_date_of_birth_format() {
        let data = object(json!({ "date_of_birth": "17/05/1990" }));
        let errors = validate_patient_fields(&data);
        assert_eq!(
            errors["date_of_birth"],
            vec!["Must be a date in YYYY-MM-DD format"]
        );

        let data = object(json!({ "date_of_birth": "1990-05-17" }));
        assert!(validate_patient_fields(&data).is_empty());
    }

    #[test]
    fn test_patient_optional_email_validated_when_present() {
        let data = object(json!({ "email": "jane@clinic" }));
        let errors = validate_patient_fields(&data);
        assert_eq!(errors["email"], vec!["Not a valid email address"]);
    }

    #[test]
    fn test_partial_payload_only_validates_supplied_fields() {
        // Update payloads omit most fields; absent fields produce no errors.
        let data = object(json!({ "phone_number": "0712" }));
        assert!(validate_patient_fields(&data).is_empty());
    }
}
