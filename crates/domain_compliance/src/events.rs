//! Domain events emitted by the Compliance aggregate
//!
//! Events are collected on the aggregate and drained by the engine after a
//! successful commit; the notification collaborator receives every one of
//! them, and escalation events additionally become account directives.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, ComplianceId, UserId};

use crate::deadline::OverdueStatus;
use crate::escalation::{AccountDirective, Consequence, EscalationSource};

/// Domain events emitted by the Compliance aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComplianceEvent {
    /// Moderator imposed a new commitment
    ComplianceImposed {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        responsible_user_id: UserId,
        deadline: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    /// Responsible party submitted evidence
    EvidenceSubmitted {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        attempt_number: u32,
        file_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Counterpart pre-reviewed the current submission
    PeerReviewRecorded {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        reviewer_id: UserId,
        approved: bool,
        timestamp: DateTime<Utc>,
    },

    /// Moderator approved the submission
    ComplianceApproved {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        reviewer_id: UserId,
        timestamp: DateTime<Utc>,
    },

    /// Moderator rejected the submission
    ComplianceRejected {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        reviewer_id: UserId,
        rejection_count: u32,
        consequence: Consequence,
        next_deadline: Option<DateTime<Utc>>,
        timestamp: DateTime<Utc>,
    },

    /// Deadline evaluation moved the compliance to a new overdue stage
    OverdueStageReached {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        stage: OverdueStatus,
        days_overdue: u32,
        effective_deadline: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },

    /// The responsible party's account must be suspended
    AccountSuspensionTriggered {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        user_id: UserId,
        days: u32,
        source: EscalationSource,
        timestamp: DateTime<Utc>,
    },

    /// The responsible party's account must be banned
    AccountBanTriggered {
        compliance_id: ComplianceId,
        claim_id: ClaimId,
        user_id: UserId,
        source: EscalationSource,
        timestamp: DateTime<Utc>,
    },
}

impl ComplianceEvent {
    /// Returns the compliance ID associated with this event
    pub fn compliance_id(&self) -> ComplianceId {
        match self {
            ComplianceEvent::ComplianceImposed { compliance_id, .. }
            | ComplianceEvent::EvidenceSubmitted { compliance_id, .. }
            | ComplianceEvent::PeerReviewRecorded { compliance_id, .. }
            | ComplianceEvent::ComplianceApproved { compliance_id, .. }
            | ComplianceEvent::ComplianceRejected { compliance_id, .. }
            | ComplianceEvent::OverdueStageReached { compliance_id, .. }
            | ComplianceEvent::AccountSuspensionTriggered { compliance_id, .. }
            | ComplianceEvent::AccountBanTriggered { compliance_id, .. } => *compliance_id,
        }
    }

    /// Returns the owning claim ID
    pub fn claim_id(&self) -> ClaimId {
        match self {
            ComplianceEvent::ComplianceImposed { claim_id, .. }
            | ComplianceEvent::EvidenceSubmitted { claim_id, .. }
            | ComplianceEvent::PeerReviewRecorded { claim_id, .. }
            | ComplianceEvent::ComplianceApproved { claim_id, .. }
            | ComplianceEvent::ComplianceRejected { claim_id, .. }
            | ComplianceEvent::OverdueStageReached { claim_id, .. }
            | ComplianceEvent::AccountSuspensionTriggered { claim_id, .. }
            | ComplianceEvent::AccountBanTriggered { claim_id, .. } => *claim_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ComplianceEvent::ComplianceImposed { timestamp, .. }
            | ComplianceEvent::EvidenceSubmitted { timestamp, .. }
            | ComplianceEvent::PeerReviewRecorded { timestamp, .. }
            | ComplianceEvent::ComplianceApproved { timestamp, .. }
            | ComplianceEvent::ComplianceRejected { timestamp, .. }
            | ComplianceEvent::OverdueStageReached { timestamp, .. }
            | ComplianceEvent::AccountSuspensionTriggered { timestamp, .. }
            | ComplianceEvent::AccountBanTriggered { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ComplianceEvent::ComplianceImposed { .. } => "ComplianceImposed",
            ComplianceEvent::EvidenceSubmitted { .. } => "EvidenceSubmitted",
            ComplianceEvent::PeerReviewRecorded { .. } => "PeerReviewRecorded",
            ComplianceEvent::ComplianceApproved { .. } => "ComplianceApproved",
            ComplianceEvent::ComplianceRejected { .. } => "ComplianceRejected",
            ComplianceEvent::OverdueStageReached { .. } => "OverdueStageReached",
            ComplianceEvent::AccountSuspensionTriggered { .. } => "AccountSuspensionTriggered",
            ComplianceEvent::AccountBanTriggered { .. } => "AccountBanTriggered",
        }
    }

    /// Returns the account directive carried by an escalation event
    pub fn account_directive(&self) -> Option<AccountDirective> {
        match self {
            ComplianceEvent::AccountSuspensionTriggered { user_id, days, source, .. } => {
                Some(AccountDirective::Suspend {
                    user_id: *user_id,
                    days: *days,
                    source: *source,
                })
            }
            ComplianceEvent::AccountBanTriggered { user_id, source, .. } => {
                Some(AccountDirective::Ban {
                    user_id: *user_id,
                    source: *source,
                })
            }
            _ => None,
        }
    }
}
