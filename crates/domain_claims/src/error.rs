//! Claims domain errors

use thiserror::Error;

use core_kernel::{Action, ErrorKind, PortError, ValidationError};
use domain_compliance::ComplianceError;

use crate::claim::ClaimStatus;

/// Errors raised by the Claim aggregate
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not authorized to {action}: {reason}")]
    Unauthorized { action: Action, reason: String },

    #[error("Cannot {action} a claim in status {status}")]
    InvalidStateTransition { status: ClaimStatus, action: Action },
}

impl ClaimError {
    pub fn unauthorized(action: Action, reason: impl Into<String>) -> Self {
        ClaimError::Unauthorized {
            action,
            reason: reason.into(),
        }
    }

    /// Returns the stable error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimError::Validation(_) => ErrorKind::Validation,
            ClaimError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ClaimError::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
        }
    }
}

/// Errors surfaced by the dispute engine
#[derive(Debug, Error)]
pub enum DisputeError {
    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] PortError),

    /// A collaborator failed after the state change was committed
    #[error("{collaborator} failed: {source}")]
    Collaborator {
        collaborator: &'static str,
        #[source]
        source: PortError,
    },
}

impl DisputeError {
    /// Returns the stable error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            DisputeError::Claim(e) => e.kind(),
            DisputeError::Compliance(e) => e.kind(),
            DisputeError::Validation(_) => ErrorKind::Validation,
            DisputeError::Forbidden(_) => ErrorKind::Unauthorized,
            DisputeError::Store(e) => e.kind(),
            DisputeError::Collaborator { .. } => ErrorKind::Store,
        }
    }

    /// Returns true if the caller should refetch and retry once
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
