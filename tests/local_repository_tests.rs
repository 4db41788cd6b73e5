//! Tests for the in-memory LocalRepository.
//!
//! These cover the repository contract directly: CRUD lifecycle, natural-key
//! uniqueness, merge-semantics updates, and concurrent access patterns.

use std::sync::Arc;

use chrono::NaiveDate;
use clinic_rust::api::{
    DoctorChanges, DoctorId, NewDoctor, NewPatient, PatientChanges, PatientId,
};
use clinic_rust::db::repositories::LocalRepository;
use clinic_rust::db::repository::{DoctorRepository, PatientRepository};

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
async fn test_insert_assigns_sequential_ids() {
    let repo = LocalRepository::new();
    let first = repo.insert_doctor(&new_doctor("K1")).await.unwrap();
    let second = repo.insert_doctor(&new_doctor("K2")).await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_list_returns_doctors_in_storage_order() {
    let repo = LocalRepository::new();
    for i in 0..5 {
        repo.insert_doctor(&new_doctor(&format!("K{}", i))).await.unwrap();
    }

    let doctors = repo.list_doctors().await.unwrap();
    let ids: Vec<i64> = doctors.iter().map(|d| d.id.value()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_duplicate_kmpdc_insert_rejected() {
    let repo = LocalRepository::new();
    repo.insert_doctor(&new_doctor("K1")).await.unwrap();

    let err = repo.insert_doctor(&new_doctor("K1")).await.unwrap_err();
    assert!(err.is_duplicate());
    assert_eq!(repo.list_doctors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_by_kmpdc_number() {
    let repo = LocalRepository::new();
    repo.insert_doctor(&new_doctor("K1")).await.unwrap();

    let found = repo.find_doctor_by_kmpdc_number("K1").await.unwrap();
    assert!(found.is_some());
    let missing = repo.find_doctor_by_kmpdc_number("K999").await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_update_to_taken_kmpdc_rejected() {
    let repo = LocalRepository::new();
    repo.insert_doctor(&new_doctor("K1")).await.unwrap();
    let second = repo.insert_doctor(&new_doctor("K2")).await.unwrap();

    let changes = DoctorChanges {
        kmpdc_number: Some("K1".to_string()),
        ..Default::default()
    };
    let err = repo.update_doctor(second.id, &changes).await.unwrap_err();
    assert!(err.is_duplicate());

    // The failed update left the row untouched.
    let unchanged = repo.get_doctor(second.id).await.unwrap();
    assert_eq!(unchanged.kmpdc_number, "K2");
}

#[tokio::test]
async fn test_update_keeping_own_kmpdc_is_allowed() {
    let repo = LocalRepository::new();
    let doctor = repo.insert_doctor(&new_doctor("K1")).await.unwrap();

    // Re-sending the doctor's own license number is not a conflict.
    let changes = DoctorChanges {
        kmpdc_number: Some("K1".to_string()),
        phone: Some("0711".to_string()),
        ..Default::default()
    };
    let updated = repo.update_doctor(doctor.id, &changes).await.unwrap();
    assert_eq!(updated.phone, "0711");
}

#[tokio::test]
async fn test_patient_update_merges_fields() {
    let repo = LocalRepository::new();
    let patient = repo.insert_patient(&new_patient("11223344")).await.unwrap();

    let changes = PatientChanges {
        policy_number: Some("P-10".to_string()),
        ..Default::default()
    };
    let updated = repo.update_patient(patient.id, &changes).await.unwrap();
    assert_eq!(updated.policy_number, "P-10");
    assert_eq!(updated.first_name, patient.first_name);
    assert_eq!(updated.date_of_birth, patient.date_of_birth);
}

#[tokio::test]
async fn test_delete_removes_patient() {
    let repo = LocalRepository::new();
    let patient = repo.insert_patient(&new_patient("11223344")).await.unwrap();

    repo.delete_patient(patient.id).await.unwrap();
    let err = repo.get_patient(patient.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_operations_on_missing_ids_are_not_found() {
    let repo = LocalRepository::new();

    assert!(repo.get_doctor(DoctorId::new(1)).await.unwrap_err().is_not_found());
    assert!(repo.delete_doctor(DoctorId::new(1)).await.unwrap_err().is_not_found());
    assert!(repo
        .update_patient(PatientId::new(1), &PatientChanges::default())
        .await
        .unwrap_err()
        .is_not_found());
}

// =========================================================
// Concurrent Access Tests
// =========================================================

#[tokio::test]
async fn test_concurrent_inserts_with_distinct_keys_all_succeed() {
    let repo = Arc::new(LocalRepository::new());

    let mut handles = vec![];
    for i in 0..10 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone.insert_doctor(&new_doctor(&format!("K{}", i))).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(repo.list_doctors().await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_concurrent_inserts_with_same_key_admit_exactly_one() {
    let repo = Arc::new(LocalRepository::new());

    let mut handles = vec![];
    for _ in 0..10 {
        let repo_clone = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo_clone.insert_patient(&new_patient("11223344")).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    // The uniqueness guarantee holds under concurrent writers.
    assert_eq!(successes, 1);
    assert_eq!(repo.list_patients().await.unwrap().len(), 1);
}
