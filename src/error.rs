//! Outcomes the presentation layer turns into user-visible messages.
//!
//! None of these are fatal; every variant leaves the store unchanged.

use crate::persistence::{ExportError, StoreError};
use crate::validation::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("teacher login required")]
    Unauthorized,

    #[error("roll number {0} not found")]
    NotFound(i64),

    #[error("roll number {0} already exists")]
    Conflict(i64),

    #[error("student store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("stored data is invalid: {0}")]
    InvalidData(String),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}

impl DashboardError {
    /// Stable machine-readable code, shared by the HTTP and CLI layers.
    pub fn code(&self) -> &'static str {
        match self {
            DashboardError::Validation(_) => "invalid_request",
            DashboardError::InvalidCredentials => "invalid_credentials",
            DashboardError::Unauthorized => "unauthorized",
            DashboardError::NotFound(_) => "not_found",
            DashboardError::Conflict(_) => "conflict",
            DashboardError::StoreUnavailable(_) => "store_unavailable",
            DashboardError::InvalidData(_) | DashboardError::Export(_) => "internal_error",
        }
    }
}

impl From<StoreError> for DashboardError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(roll) => DashboardError::Conflict(roll),
            StoreError::NotFound(roll) => DashboardError::NotFound(roll),
            StoreError::Unavailable(message) => DashboardError::StoreUnavailable(message),
            StoreError::InvalidData(message) => DashboardError::InvalidData(message),
        }
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;
