//! Tests for core_kernel error types

use core_kernel::error::{CoreError, ErrorKind, ValidationError};
use core_kernel::validation::rules;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("description", "too short");

    match &error {
        CoreError::Validation(v) => {
            assert_eq!(v.field, "description");
            assert_eq!(v.message, "too short");
        }
        _ => panic!("Expected Validation error"),
    }
    assert_eq!(error.kind(), ErrorKind::Validation);
}

#[test]
fn test_core_error_from_validation_error() {
    let v = rules::OBSERVATIONS.check("short").unwrap_err();
    let core: CoreError = v.into();
    assert!(matches!(core, CoreError::Validation(_)));
}

#[test]
fn test_core_error_display() {
    let error = CoreError::Validation(ValidationError::new("resolution", "is required"));
    let display = format!("{}", error);

    assert!(display.contains("Validation error"));
    assert!(display.contains("resolution"));
}

#[test]
fn test_error_kind_codes_are_stable() {
    let expected = [
        (ErrorKind::Validation, "validation_error"),
        (ErrorKind::Unauthorized, "unauthorized"),
        (ErrorKind::InvalidStateTransition, "invalid_state_transition"),
        (ErrorKind::TerminalStateViolation, "terminal_state_violation"),
        (ErrorKind::ConcurrentModification, "concurrent_modification"),
        (ErrorKind::NotFound, "not_found"),
        (ErrorKind::Store, "store_error"),
    ];

    for (kind, code) in expected {
        assert_eq!(kind.code(), code);
        assert_eq!(kind.to_string(), code);
    }
}

#[test]
fn test_only_concurrent_modification_is_retryable() {
    assert!(ErrorKind::ConcurrentModification.is_retryable());
    assert!(!ErrorKind::Validation.is_retryable());
    assert!(!ErrorKind::TerminalStateViolation.is_retryable());
}
