//! Postgres repository implementation using Diesel.
//!
//! Blocking Diesel work runs on the tokio blocking pool; connections come
//! from an r2d2 pool scoped to one operation each. Every write happens inside
//! `conn.transaction`, so a failure rolls the whole operation back before the
//! error is surfaced.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;
use tokio::task;

use crate::api::{
    Doctor, DoctorChanges, DoctorId, NewDoctor, NewPatient, Patient, PatientChanges, PatientId,
};
use crate::db::repository::{
    DoctorRepository, ErrorContext, FullRepository, PatientRepository, RepositoryError,
    RepositoryResult,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let min_pool_size = std::env::var("PG_POOL_MIN")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let connection_timeout_sec = std::env::var("PG_CONN_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        let idle_timeout_sec = std::env::var("PG_IDLE_TIMEOUT_SEC")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(600);

        Ok(Self {
            database_url,
            max_pool_size,
            min_pool_size,
            connection_timeout_sec,
            idle_timeout_sec,
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true) // Validate connections before use
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        // Run migrations once during initialization
        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        Ok(Self { pool })
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Execute a blocking database operation on the tokio blocking pool.
    ///
    /// Every failure is terminal for the request: the connection is checked
    /// out once, the operation runs once, and whatever error it produces is
    /// surfaced directly.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(RepositoryError::from)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
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

#[async_trait]
impl DoctorRepository for PostgresRepository {
    async fn list_doctors(&self) -> RepositoryResult<Vec<Doctor>> {
        self.with_conn(|conn| {
            let rows = doctors::table
                .order(doctors::id.asc())
                .select(DoctorRow::as_select())
                .load::<DoctorRow>(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(Doctor::from).collect())
        })
        .await
        .map_err(|e| e.with_operation("list_doctors"))
    }

    async fn get_doctor(&self, id: DoctorId) -> RepositoryResult<Doctor> {
        self.with_conn(move |conn| {
            doctors::table
                .find(id.value())
                .select(DoctorRow::as_select())
                .first::<DoctorRow>(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .map(Doctor::from)
                .ok_or_else(|| doctor_not_found(id))
        })
        .await
        .map_err(|e| e.with_operation("get_doctor"))
    }

    async fn find_doctor_by_kmpdc_number(
        &self,
        kmpdc_number: &str,
    ) -> RepositoryResult<Option<Doctor>> {
        let kmpdc_number = kmpdc_number.to_string();
        self.with_conn(move |conn| {
            let row = doctors::table
                .filter(doctors::kmpdc_number.eq(&kmpdc_number))
                .select(DoctorRow::as_select())
                .first::<DoctorRow>(conn)
                .optional()
                .map_err(RepositoryError::from)?;
            Ok(row.map(Doctor::from))
        })
        .await
        .map_err(|e| e.with_operation("find_doctor_by_kmpdc_number"))
    }

    async fn insert_doctor(&self, new_doctor: &NewDoctor) -> RepositoryResult<Doctor> {
        let row = NewDoctorRow::from(new_doctor);
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let inserted: DoctorRow = diesel::insert_into(doctors::table)
                    .values(&row)
                    .returning(DoctorRow::as_returning())
                    .get_result(tx)
                    .map_err(RepositoryError::from)?;
                Ok(Doctor::from(inserted))
            })
        })
        .await
        .map_err(|e: RepositoryError| e.with_operation("insert_doctor"))
    }

    async fn update_doctor(
        &self,
        id: DoctorId,
        changes: &DoctorChanges,
    ) -> RepositoryResult<Doctor> {
        // An all-None changeset generates no SET clause; the caller rejects
        // empty payloads before this point, but guard anyway.
        if changes.is_empty() {
            return self.get_doctor(id).await;
        }

        let changeset = DoctorChangeset::from(changes);
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                diesel::update(doctors::table.find(id.value()))
                    .set(&changeset)
                    .returning(DoctorRow::as_returning())
                    .get_result::<DoctorRow>(tx)
                    .optional()
                    .map_err(RepositoryError::from)?
                    .map(Doctor::from)
                    .ok_or_else(|| doctor_not_found(id))
            })
        })
        .await
        .map_err(|e: RepositoryError| e.with_operation("update_doctor"))
    }

    async fn delete_doctor(&self, id: DoctorId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let affected = diesel::delete(doctors::table.find(id.value()))
                    .execute(tx)
                    .map_err(RepositoryError::from)?;
                if affected == 0 {
                    return Err(doctor_not_found(id));
                }
                Ok(())
            })
        })
        .await
        .map_err(|e: RepositoryError| e.with_operation("delete_doctor"))
    }
}

#[async_trait]
impl PatientRepository for PostgresRepository {
    async fn list_patients(&self) -> RepositoryResult<Vec<Patient>> {
        self.with_conn(|conn| {
            let rows = patients::table
                .order(patients::id.asc())
                .select(PatientRow::as_select())
                .load::<PatientRow>(conn)
                .map_err(RepositoryError::from)?;
            Ok(rows.into_iter().map(Patient::from).collect())
        })
        .await
        .map_err(|e| e.with_operation("list_patients"))
    }

    async fn get_patient(&self, id: PatientId) -> RepositoryResult<Patient> {
        self.with_conn(move |conn| {
            patients::table
                .find(id.value())
                .select(PatientRow::as_select())
                .first::<PatientRow>(conn)
                .optional()
                .map_err(RepositoryError::from)?
                .map(Patient::from)
                .ok_or_else(|| patient_not_found(id))
        })
        .await
        .map_err(|e| e.with_operation("get_patient"))
    }

    async fn find_patient_by_id_number(
        &self,
        id_number: &str,
    ) -> RepositoryResult<Option<Patient>> {
        let id_number = id_number.to_string();
        self.with_conn(move |conn| {
            let row = patients::table
                .filter(patients::id_number.eq(&id_number))
                .select(PatientRow::as_select())
                .first::<PatientRow>(conn)
                .optional()
                .map_err(RepositoryError::from)?;
            Ok(row.map(Patient::from))
        })
        .await
        .map_err(|e| e.with_operation("find_patient_by_id_number"))
    }

    async fn insert_patient(&self, new_patient: &NewPatient) -> RepositoryResult<Patient> {
        let row = NewPatientRow::from(new_patient);
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let inserted: PatientRow = diesel::insert_into(patients::table)
                    .values(&row)
                    .returning(PatientRow::as_returning())
                    .get_result(tx)
                    .map_err(RepositoryError::from)?;
                Ok(Patient::from(inserted))
            })
        })
        .await
        .map_err(|e: RepositoryError| e.with_operation("insert_patient"))
    }

    async fn update_patient(
        &self,
        id: PatientId,
        changes: &PatientChanges,
    ) -> RepositoryResult<Patient> {
        if changes.is_empty() {
            return self.get_patient(id).await;
        }

        let changeset = PatientChangeset::from(changes);
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                diesel::update(patients::table.find(id.value()))
                    .set(&changeset)
                    .returning(PatientRow::as_returning())
                    .get_result::<PatientRow>(tx)
                    .optional()
                    .map_err(RepositoryError::from)?
                    .map(Patient::from)
                    .ok_or_else(|| patient_not_found(id))
            })
        })
        .await
        .map_err(|e: RepositoryError| e.with_operation("update_patient"))
    }

    async fn delete_patient(&self, id: PatientId) -> RepositoryResult<()> {
        self.with_conn(move |conn| {
            conn.transaction(|tx| {
                let affected = diesel::delete(patients::table.find(id.value()))
                    .execute(tx)
                    .map_err(RepositoryError::from)?;
                if affected == 0 {
                    return Err(patient_not_found(id));
                }
                Ok(())
            })
        })
        .await
        .map_err(|e: RepositoryError| e.with_operation("delete_patient"))
    }
}

#[async_trait]
impl FullRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| Ok(sql_query("SELECT 1").execute(conn).is_ok()))
            .await
    }
}
