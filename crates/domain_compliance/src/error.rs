//! Compliance domain errors

use thiserror::Error;

use core_kernel::{Action, ComplianceId, ErrorKind, ValidationError};

use crate::compliance::ComplianceStatus;

/// Errors that can occur in the compliance workflow
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Not authorized to {action}: {reason}")]
    Unauthorized { action: Action, reason: String },

    #[error("Cannot {action} a compliance in status {status}")]
    InvalidStateTransition {
        status: ComplianceStatus,
        action: Action,
    },

    #[error("Compliance {compliance_id} is terminal: {reason}")]
    TerminalStateViolation {
        compliance_id: ComplianceId,
        reason: String,
    },
}

impl ComplianceError {
    pub fn unauthorized(action: Action, reason: impl Into<String>) -> Self {
        ComplianceError::Unauthorized {
            action,
            reason: reason.into(),
        }
    }

    /// Returns the stable error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComplianceError::Validation(_) => ErrorKind::Validation,
            ComplianceError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ComplianceError::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            ComplianceError::TerminalStateViolation { .. } => ErrorKind::TerminalStateViolation,
        }
    }
}
