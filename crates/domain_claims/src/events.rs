//! Domain events for the dispute workflow
//!
//! Claim events are collected on the Claim aggregate; [`DisputeEvent`] wraps
//! claim and compliance events for the notification collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, HiringId, UserId};
use domain_compliance::ComplianceEvent;

use crate::claim::{ClaimStatus, ClaimType, ResolutionType};

/// Domain events emitted by the Claim aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClaimEvent {
    ClaimOpened {
        claim_id: ClaimId,
        hiring_id: HiringId,
        claimant_id: UserId,
        respondent_id: UserId,
        claim_type: ClaimType,
        timestamp: DateTime<Utc>,
    },

    ClaimTakenForReview {
        claim_id: ClaimId,
        moderator_id: UserId,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    ObservationsAdded {
        claim_id: ClaimId,
        moderator_id: UserId,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    ClarificationSubmitted {
        claim_id: ClaimId,
        party_id: UserId,
        file_count: usize,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    /// Verdict recorded together with imposed compliances
    VerdictRecorded {
        claim_id: ClaimId,
        resolution_type: ResolutionType,
        compliance_count: usize,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    ClaimResolved {
        claim_id: ClaimId,
        resolution_type: ResolutionType,
        resolved_by: UserId,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    /// Claim rejected; the hiring must revert
    ClaimRejected {
        claim_id: ClaimId,
        hiring_id: HiringId,
        rejected_by: UserId,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },

    ClaimCancelled {
        claim_id: ClaimId,
        cancelled_by: UserId,
        from: ClaimStatus,
        timestamp: DateTime<Utc>,
    },
}

impl ClaimEvent {
    /// Returns the claim ID associated with this event
    pub fn claim_id(&self) -> ClaimId {
        match self {
            ClaimEvent::ClaimOpened { claim_id, .. }
            | ClaimEvent::ClaimTakenForReview { claim_id, .. }
            | ClaimEvent::ObservationsAdded { claim_id, .. }
            | ClaimEvent::ClarificationSubmitted { claim_id, .. }
            | ClaimEvent::VerdictRecorded { claim_id, .. }
            | ClaimEvent::ClaimResolved { claim_id, .. }
            | ClaimEvent::ClaimRejected { claim_id, .. }
            | ClaimEvent::ClaimCancelled { claim_id, .. } => *claim_id,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ClaimEvent::ClaimOpened { timestamp, .. }
            | ClaimEvent::ClaimTakenForReview { timestamp, .. }
            | ClaimEvent::ObservationsAdded { timestamp, .. }
            | ClaimEvent::ClarificationSubmitted { timestamp, .. }
            | ClaimEvent::VerdictRecorded { timestamp, .. }
            | ClaimEvent::ClaimResolved { timestamp, .. }
            | ClaimEvent::ClaimRejected { timestamp, .. }
            | ClaimEvent::ClaimCancelled { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            ClaimEvent::ClaimOpened { .. } => "ClaimOpened",
            ClaimEvent::ClaimTakenForReview { .. } => "ClaimTakenForReview",
            ClaimEvent::ObservationsAdded { .. } => "ObservationsAdded",
            ClaimEvent::ClarificationSubmitted { .. } => "ClarificationSubmitted",
            ClaimEvent::VerdictRecorded { .. } => "VerdictRecorded",
            ClaimEvent::ClaimResolved { .. } => "ClaimResolved",
            ClaimEvent::ClaimRejected { .. } => "ClaimRejected",
            ClaimEvent::ClaimCancelled { .. } => "ClaimCancelled",
        }
    }
}

/// Any event the engine publishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "aggregate", content = "event", rename_all = "snake_case")]
pub enum DisputeEvent {
    Claim(ClaimEvent),
    Compliance(ComplianceEvent),
}

impl DisputeEvent {
    pub fn claim_id(&self) -> ClaimId {
        match self {
            DisputeEvent::Claim(e) => e.claim_id(),
            DisputeEvent::Compliance(e) => e.claim_id(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DisputeEvent::Claim(e) => e.event_type(),
            DisputeEvent::Compliance(e) => e.event_type(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            DisputeEvent::Claim(e) => e.timestamp(),
            DisputeEvent::Compliance(e) => e.timestamp(),
        }
    }
}

impl From<ClaimEvent> for DisputeEvent {
    fn from(event: ClaimEvent) -> Self {
        DisputeEvent::Claim(event)
    }
}

impl From<ComplianceEvent> for DisputeEvent {
    fn from(event: ComplianceEvent) -> Self {
        DisputeEvent::Compliance(event)
    }
}
