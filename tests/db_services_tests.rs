//! Service-layer tests covering the orchestration on top of the repository.

use clinic_rust::api::{DoctorChanges, DoctorId, NewDoctor, NewPatient};
use clinic_rust::db::repositories::LocalRepository;
use clinic_rust::db::services;
use chrono::NaiveDate;

fn new_doctor(kmpdc_number: &str) -> NewDoctor {
    NewDoctor {
        name: "A. Kim".to_string(),
        specialisation_id: 1,
        phone: "0700".to_string(),
        email: "a@x.com".to_string(),
        bio: "x".to_string(),
        kmpdc_number: kmpdc_number.to_string(),
    }
}

fn new_patient(id_number: &str) -> NewPatient {
    NewPatient {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        id_number: id_number.to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        gender: "Female".to_string(),
        phone_number: "0712345678".to_string(),
        insurance_provider: "NHIF".to_string(),
        policy_number: "P-9".to_string(),
        email: None,
    }
}

#[tokio::test]
async fn test_register_doctor_assigns_id() {
    let repo = LocalRepository::new();
    let doctor = services::register_doctor(&repo, &new_doctor("K123")).await.unwrap();
    assert!(doctor.id.value() > 0);
    assert_eq!(doctor.kmpdc_number, "K123");
}

#[tokio::test]
async fn test_register_doctor_rejects_duplicate_before_insert() {
    let repo = LocalRepository::new();
    services::register_doctor(&repo, &new_doctor("K123")).await.unwrap();

    let err = services::register_doctor(&repo, &new_doctor("K123"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());
    // The pre-check message names the offending key.
    assert!(err.to_string().contains("K123"));

    assert_eq!(services::list_doctors(&repo).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_register_patient_rejects_duplicate_id_number() {
    let repo = LocalRepository::new();
    services::register_patient(&repo, &new_patient("11223344")).await.unwrap();

    let err = services::register_patient(&repo, &new_patient("11223344"))
        .await
        .unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
async fn test_update_and_delete_round_trip() {
    let repo = LocalRepository::new();
    let doctor = services::register_doctor(&repo, &new_doctor("K123")).await.unwrap();

    let changes = DoctorChanges {
        email: Some("kim@clinic.org".to_string()),
        ..Default::default()
    };
    let updated = services::update_doctor(&repo, doctor.id, &changes).await.unwrap();
    assert_eq!(updated.email, "kim@clinic.org");

    services::delete_doctor(&repo, doctor.id).await.unwrap();
    let err = services::get_doctor(&repo, doctor.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_missing_doctor_fails() {
    let repo = LocalRepository::new();
    let err = services::delete_doctor(&repo, DoctorId::new(77)).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_health_check_on_local_repository() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
}
