//! Action vocabulary shared by the claim and compliance workflows
//!
//! Action sets returned to callers are derived from entity state by the
//! domain crates; they are never stored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An action a viewer may perform on a claim or compliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Claim actions
    CreateClaim,
    MarkInReview,
    AddObservations,
    /// Unified party reply to moderator observations
    #[serde(alias = "subsanar_claim")]
    SubmitObservations,
    ResolveClaim,
    RejectClaim,
    CancelClaim,

    // Compliance actions
    #[serde(alias = "upload_compliance")]
    SubmitComplianceEvidence,
    PeerApprove,
    PeerObject,
    ReviewCompliance,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateClaim => "create_claim",
            Action::MarkInReview => "mark_in_review",
            Action::AddObservations => "add_observations",
            Action::SubmitObservations => "submit_observations",
            Action::ResolveClaim => "resolve_claim",
            Action::RejectClaim => "reject_claim",
            Action::CancelClaim => "cancel_claim",
            Action::SubmitComplianceEvidence => "submit_compliance_evidence",
            Action::PeerApprove => "peer_approve",
            Action::PeerObject => "peer_object",
            Action::ReviewCompliance => "review_compliance",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered set of actions, serialized as a JSON array
pub type ActionSet = BTreeSet<Action>;
