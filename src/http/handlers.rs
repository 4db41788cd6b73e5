//! HTTP handlers for the REST API.
//!
//! Create and update handlers implement the validate-then-persist-then-
//! serialize protocol: required-field presence (create only), per-field
//! schema rules, then the natural-key uniqueness check, all before any write
//! is attempted. The raw JSON object is inspected first so missing-field and
//! field-level errors can be reported precisely; typed deserialization
//! happens only after the payload has passed validation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{Map, Value};

use super::dto::{DoctorResponse, HealthResponse, MessageResponse, PatientResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    Doctor, DoctorChanges, DoctorId, NewDoctor, NewPatient, Patient, PatientChanges, PatientId,
};
use crate::db::services as db_services;
use crate::services::validation::{
    self, FieldErrors, DOCTOR_REQUIRED_FIELDS, PATIENT_REQUIRED_FIELDS,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Gate a create payload: must be a JSON object carrying every required field.
fn create_payload<'a>(
    body: &'a Value,
    required: &[&str],
) -> Result<&'a Map<String, Value>, AppError> {
    let Some(data) = body.as_object() else {
        // A non-object body carries none of the required fields.
        return Err(AppError::MissingFields(
            required.iter().map(|f| f.to_string()).collect(),
        ));
    };

    let missing = validation::missing_fields(data, required);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }
    Ok(data)
}

/// Gate an update payload: must be a JSON object with at least one field.
fn update_payload(body: &Value) -> Result<&Map<String, Value>, AppError> {
    match body.as_object() {
        Some(data) if !data.is_empty() => Ok(data),
        _ => Err(AppError::EmptyPayload),
    }
}

fn ensure_valid(errors: FieldErrors) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, AppError> {
    // Validation has already checked types and formats; a failure here means
    // the payload disagrees with the entity shape in some unanticipated way.
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid payload: {}", e)))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is
/// accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Doctor CRUD
// =============================================================================

/// GET /doctor
///
/// List all registered doctors.
pub async fn list_doctors(State(state): State<AppState>) -> HandlerResult<Vec<Doctor>> {
    let doctors = db_services::list_doctors(state.repository.as_ref()).await?;
    Ok(Json(doctors))
}

/// POST /doctor/add
///
/// Register a new doctor.
pub async fn register_doctor(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<DoctorResponse>), AppError> {
    let data = create_payload(&body, DOCTOR_REQUIRED_FIELDS)?;
    ensure_valid(validation::validate_doctor_fields(data))?;

    let new_doctor: NewDoctor = decode(body)?;
    let doctor = db_services::register_doctor(state.repository.as_ref(), &new_doctor).await?;

    Ok((
        StatusCode::CREATED,
        Json(DoctorResponse {
            message: "Doctor added successfully".to_string(),
            doctor,
        }),
    ))
}

/// GET /doctor/{id}
///
/// Get one doctor's details.
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Doctor> {
    let doctor = db_services::get_doctor(state.repository.as_ref(), DoctorId::new(id)).await?;
    Ok(Json(doctor))
}

/// PUT/PATCH /doctor/{id}
///
/// Apply a partial update; fields absent from the payload are left unchanged.
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> HandlerResult<DoctorResponse> {
    let data = update_payload(&body)?;
    ensure_valid(validation::validate_doctor_fields(data))?;

    let changes: DoctorChanges = decode(body)?;
    let doctor =
        db_services::update_doctor(state.repository.as_ref(), DoctorId::new(id), &changes).await?;

    Ok(Json(DoctorResponse {
        message: "Doctor details updated successfully".to_string(),
        doctor,
    }))
}

/// DELETE /doctor/{id}
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<MessageResponse> {
    db_services::delete_doctor(state.repository.as_ref(), DoctorId::new(id)).await?;
    Ok(Json(MessageResponse {
        message: "Doctor deleted successfully".to_string(),
    }))
}

// =============================================================================
// Patient CRUD
// =============================================================================

/// GET /patient
///
/// List all registered patients.
pub async fn list_patients(State(state): State<AppState>) -> HandlerResult<Vec<Patient>> {
    let patients = db_services::list_patients(state.repository.as_ref()).await?;
    Ok(Json(patients))
}

/// POST /patient/add
///
/// Register a new patient.
pub async fn register_patient(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<PatientResponse>), AppError> {
    let data = create_payload(&body, PATIENT_REQUIRED_FIELDS)?;
    ensure_valid(validation::validate_patient_fields(data))?;

    let new_patient: NewPatient = decode(body)?;
    let patient = db_services::register_patient(state.repository.as_ref(), &new_patient).await?;

    Ok((
        StatusCode::CREATED,
        Json(PatientResponse {
            message: "Patient added successfully".to_string(),
            patient,
        }),
    ))
}

/// GET /patient/{id}
///
/// Get one patient's details.
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Patient> {
    let patient = db_services::get_patient(state.repository.as_ref(), PatientId::new(id)).await?;
    Ok(Json(patient))
}

/// PUT/PATCH /patient/{id}
///
/// Apply a partial update; fields absent from the payload are left unchanged.
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> HandlerResult<PatientResponse> {
    let data = update_payload(&body)?;
    ensure_valid(validation::validate_patient_fields(data))?;

    let changes: PatientChanges = decode(body)?;
    let patient =
        db_services::update_patient(state.repository.as_ref(), PatientId::new(id), &changes)
            .await?;

    Ok(Json(PatientResponse {
        message: "Patient details updated successfully".to_string(),
        patient,
    }))
}

/// DELETE /patient/{id}
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<MessageResponse> {
    db_services::delete_patient(state.repository.as_ref(), PatientId::new(id)).await?;
    Ok(Json(MessageResponse {
        message: "Patient deleted successfully".to_string(),
    }))
}
