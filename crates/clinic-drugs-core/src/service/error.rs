//! Drug service errors.

use std::fmt;

use thiserror::Error;

use crate::db::DbError;

/// Message shown when a prescribed drug is deleted.
pub const DRUG_IN_USE_MESSAGE: &str = "The drug cannot be deleted!";

/// Kind of record a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Clinic,
    QuantityType,
    Drug,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Clinic => "Clinic",
            EntityKind::QuantityType => "Quantity type",
            EntityKind::Drug => "Drug",
        };
        f.write_str(name)
    }
}

/// Outcome of a refused or failed drug operation.
#[derive(Error, Debug)]
pub enum DrugError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: EntityKind, id: String },

    #[error("{message}")]
    Conflict { drug_id: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl DrugError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DrugError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: EntityKind, id: impl Into<String>) -> Self {
        DrugError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// The drug is still referenced by prescriptions.
    pub fn in_use(drug_id: impl Into<String>) -> Self {
        DrugError::Conflict {
            drug_id: drug_id.into(),
            message: DRUG_IN_USE_MESSAGE.to_string(),
        }
    }

    /// Expected outcomes the caller should report rather than treat as faults.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DrugError::Storage(_))
    }
}

pub type DrugResult<T> = Result<T, DrugError>;
