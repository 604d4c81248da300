//! Custom Test Assertions
//!
//! Assertion helpers that print the offending error or state instead of a
//! bare `false`.

use std::fmt;

use core_kernel::{Action, ActionSet, CoreError, ErrorKind, PortError};
use domain_claims::{Claim, ClaimError, ClaimStatus, DisputeError, DisputeEvent};
use domain_compliance::{Compliance, ComplianceError, ComplianceStatus};

/// Errors that report a stable [`ErrorKind`]
pub trait HasErrorKind: fmt::Display {
    fn error_kind(&self) -> ErrorKind;
}

macro_rules! has_error_kind {
    ($($ty:ty),*) => {
        $(impl HasErrorKind for $ty {
            fn error_kind(&self) -> ErrorKind {
                self.kind()
            }
        })*
    };
}

has_error_kind!(CoreError, PortError, ClaimError, ComplianceError, DisputeError);

/// Asserts that a result failed with the given kind
///
/// # Panics
///
/// Panics on success or on an error of a different kind
pub fn assert_error_kind<T: fmt::Debug, E: HasErrorKind>(result: Result<T, E>, kind: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {} error, got Ok({:?})", kind, value),
        Err(e) => assert_eq!(
            e.error_kind(),
            kind,
            "Expected {} error, got {}: {}",
            kind,
            e.error_kind(),
            e
        ),
    }
}

/// Asserts the status of a claim
pub fn assert_claim_status(claim: &Claim, expected: ClaimStatus) {
    assert_eq!(
        claim.status(),
        expected,
        "Claim {} is {}, expected {}",
        claim.id(),
        claim.status(),
        expected
    );
}

/// Asserts the stored status of a compliance
pub fn assert_compliance_status(compliance: &Compliance, expected: ComplianceStatus) {
    assert_eq!(
        compliance.status(),
        expected,
        "Compliance {} is {}, expected {}",
        compliance.id(),
        compliance.status(),
        expected
    );
}

/// Asserts that the action set is exactly `expected`
pub fn assert_actions(actual: &ActionSet, expected: &[Action]) {
    let expected: ActionSet = expected.iter().copied().collect();
    assert_eq!(
        actual, &expected,
        "Available actions differ: actual={:?}, expected={:?}",
        actual, expected
    );
}

/// Asserts the event types in dispatch order
pub fn assert_event_types(events: &[DisputeEvent], expected: &[&str]) {
    let actual: Vec<&str> = events.iter().map(DisputeEvent::event_type).collect();
    assert_eq!(actual, expected, "Dispatched events differ");
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ValidationError;

    #[test]
    fn test_assert_error_kind_matches() {
        let result: Result<(), ClaimError> =
            Err(ValidationError::new("description", "too short").into());
        assert_error_kind(result, ErrorKind::Validation);
    }

    #[test]
    #[should_panic(expected = "Expected not_found error")]
    fn test_assert_error_kind_rejects_success() {
        let result: Result<u32, PortError> = Ok(1);
        assert_error_kind(result, ErrorKind::NotFound);
    }

    #[test]
    fn test_assert_actions_ignores_order() {
        let set: ActionSet = [Action::PeerObject, Action::PeerApprove].into_iter().collect();
        assert_actions(&set, &[Action::PeerApprove, Action::PeerObject]);
    }
}
