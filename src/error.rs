//! Error types for the workflow engine.
//!
//! Lookup, validation, and navigation failures are local and carry enough
//! context to log. Service failures come from the data-service boundary and
//! are never shown verbatim to the user.

use thiserror::Error;

use crate::model::ElementKind;
use crate::navigator::ViewKey;

/// Failures reported by a [`crate::service::DataService`] implementation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backend refused the write (unknown id, constraint, ...).
    #[error("{kind} {id} rejected: {reason}")]
    Rejected {
        kind: String,
        id: String,
        reason: String,
    },

    /// A requested record does not exist.
    #[error("{what} not found")]
    NotFound { what: String },

    /// Storage or transport failed underneath the service.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced by workflow commands and lookups.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("unknown step {0:?}")]
    UnknownStep(String),

    #[error("no step with order id {0}")]
    UnknownStepOrder(u32),

    /// The step is terminal; there is nothing to advance to.
    #[error("step {0:?} has no successor")]
    NoSuccessor(String),

    #[error("no view named {0:?}")]
    UnknownView(String),

    #[error("view key {0} is not on the navigation stack")]
    UnknownViewKey(ViewKey),

    #[error("{kind} {id} is not cached")]
    MissingEntity { kind: ElementKind, id: String },

    #[error("{kind} has no Id")]
    MissingId { kind: ElementKind },

    #[error("{kind} is missing field {field:?}")]
    MissingField { kind: ElementKind, field: String },

    #[error("note has not been saved yet")]
    UnsavedNote,

    #[error("form has {count} invalid field(s)")]
    Validation { count: usize },

    #[error("no process is selected")]
    NothingSelected,

    /// The selection came from search or no step is focused.
    #[error("selected process is not actionable")]
    NotActionable,

    #[error("{0} is not being edited")]
    NotEditing(ElementKind),

    #[error("another operation is pending")]
    Pending,

    #[error("caches have not been loaded")]
    NotLoaded,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl WorkflowError {
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            WorkflowError::UnknownStep(_)
                | WorkflowError::UnknownStepOrder(_)
                | WorkflowError::UnknownView(_)
                | WorkflowError::UnknownViewKey(_)
                | WorkflowError::MissingEntity { .. }
                | WorkflowError::MissingId { .. }
                | WorkflowError::MissingField { .. }
        )
    }
}
