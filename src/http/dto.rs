//! Data Transfer Objects for the HTTP API.
//!
//! Entity representations are the serde projections of the [`crate::api`]
//! types; the structs here are the response envelopes the endpoints wrap them
//! in.

use serde::{Deserialize, Serialize};

pub use crate::api::{Doctor, Patient};

/// Confirmation-only response (delete endpoints).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message about the operation
    pub message: String,
}

/// Response carrying a doctor plus an operation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorResponse {
    pub message: String,
    pub doctor: Doctor,
}

/// Response carrying a patient plus an operation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientResponse {
    pub message: String,
    pub patient: Patient,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Database connection status
    pub database: String,
}
