//! Tests for repository factory creation paths.

use clinic_rust::db::{
    DoctorRepository, FullRepository, PatientRepository, RepositoryFactory, RepositoryType,
};

#[tokio::test]
async fn test_create_local_repository() {
    let repo = RepositoryFactory::create(RepositoryType::Local, None)
        .await
        .expect("local repository creation must succeed");
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_local_repository_starts_empty() {
    let repo = RepositoryFactory::create_local();
    assert!(repo.list_doctors().await.unwrap().is_empty());
    assert!(repo.list_patients().await.unwrap().is_empty());
}

#[cfg(not(feature = "postgres-repo"))]
#[tokio::test]
async fn test_postgres_unavailable_without_feature() {
    let err = RepositoryFactory::create(RepositoryType::Postgres, None)
        .await
        .err()
        .expect("postgres creation must fail without the feature");
    assert!(err.to_string().contains("feature not enabled"));
}

#[test]
fn test_repository_type_round_trip() {
    assert_eq!(
        "postgres".parse::<RepositoryType>().unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!("local".parse::<RepositoryType>().unwrap(), RepositoryType::Local);
}
