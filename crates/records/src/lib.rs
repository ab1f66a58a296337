//! Remote record access for the HRMS and SCM services
//!
//! Holds the entity catalogue, field declarations, the HTTP record client
//! and the partial-update reconciler shared by every update tool.

pub mod client;
pub mod entity;
pub mod fields;
pub mod reconcile;
pub mod record;

pub use client::{BulkDeleteReport, Page, PageRequest, RecordClient};
pub use entity::{Entity, Operation, Service, CARRIER, EMPLOYEE, PRODUCT, SUPPLIER};
pub use fields::{FieldKind, FieldSpec, InputField, ValidationError};
pub use reconcile::{reconcile_and_apply, ApplyUpdate, FetchById, OutcomeKind, UpdateOutcome};
pub use record::{Record, RecordId, ID_FIELD};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{entity} does not support {operation}")]
    Unsupported {
        entity: &'static str,
        operation: Operation,
    },
}

impl StoreError {
    /// HTTP status reported by the remote service, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            StoreError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
