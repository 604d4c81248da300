//! Peer review gate
//!
//! The counterpart of the responsible party may pre-review a submission
//! before the moderator decides. The review is advisory: it is recorded on
//! the compliance and on the current submission but never moves the status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::validation::rules;
use core_kernel::{Action, Actor, UserId};

use crate::compliance::{Compliance, ComplianceStatus};
use crate::error::ComplianceError;

/// Counterpart review attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerReviewRecord {
    pub reviewer_id: UserId,
    pub approved: bool,
    pub reason: Option<String>,
    pub reviewed_at: DateTime<Utc>,
}

/// Guards for the counterpart's advisory review
pub struct PeerReviewGate;

impl PeerReviewGate {
    /// Checks a peer review request and builds the record to store
    ///
    /// Objections need a reason of 20-500 chars; approvals take an optional
    /// reason of at most 500 chars.
    pub fn evaluate(
        compliance: &Compliance,
        actor: &Actor,
        approved: bool,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<PeerReviewRecord, ComplianceError> {
        let action = if approved {
            Action::PeerApprove
        } else {
            Action::PeerObject
        };

        if actor.user_id != compliance.counterpart_user_id() {
            return Err(ComplianceError::unauthorized(
                action,
                "only the counterpart of the responsible party may peer review",
            ));
        }

        let rule = if approved {
            rules::PEER_APPROVAL
        } else {
            rules::PEER_OBJECTION
        };
        rule.check_optional(reason)?;

        if compliance.status() != ComplianceStatus::Submitted {
            return Err(ComplianceError::InvalidStateTransition {
                status: compliance.display_status(),
                action,
            });
        }

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(PeerReviewRecord {
            reviewer_id: actor.user_id,
            approved,
            reason,
            reviewed_at: now,
        })
    }
}
