//! Core error types used across the engine

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable error kinds surfaced to callers
///
/// Every domain error maps onto exactly one kind. The kind's code is part of
/// the public contract and must not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Payload failed length, cardinality or format rules
    Validation,
    /// Actor role or identity does not match the action's requirement
    Unauthorized,
    /// Action is not in the current state's allowed set
    InvalidStateTransition,
    /// Action attempted on a banned or otherwise final entity
    TerminalStateViolation,
    /// Optimistic lock conflict; refetch and retry once
    ConcurrentModification,
    /// Target entity does not exist
    NotFound,
    /// Underlying store or collaborator failed
    Store,
}

impl ErrorKind {
    /// Returns the stable code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::InvalidStateTransition => "invalid_state_transition",
            ErrorKind::TerminalStateViolation => "terminal_state_violation",
            ErrorKind::ConcurrentModification => "concurrent_modification",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Store => "store_error",
        }
    }

    /// Returns true if the caller may retry after refetching
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::ConcurrentModification)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A payload rule violation on a single field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation(ValidationError::new(field, message))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Validation(_) => ErrorKind::Validation,
            CoreError::Configuration(_) => ErrorKind::Store,
        }
    }
}
