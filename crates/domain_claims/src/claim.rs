//! Claim aggregate
//!
//! A claim is a dispute one marketplace party raises against the other about
//! a hiring. Moderators drive it through review and clarification rounds to a
//! final verdict.
//!
//! # State Machine
//!
//! ```text
//! open -> in_review -> pending_clarification -> requires_staff_response
//!             ^                 ^                        |
//!             |                 +------------------------+
//!             +-- verdict with compliances --------------+
//!
//! in_review | requires_staff_response -> resolved
//! any non-terminal -> rejected | cancelled
//! ```
//!
//! `resolved`, `rejected` and `cancelled` are terminal; every action on a
//! terminal claim fails with an invalid state transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::validation::rules;
use core_kernel::{
    validate_evidence, Action, Actor, ClaimId, EvidenceFile, HiringId, UserId, ValidationError,
};

use crate::error::ClaimError;
use crate::events::ClaimEvent;

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Raised, waiting for a moderator
    Open,
    /// Assigned to a moderator
    InReview,
    /// Moderator asked the parties for clarification
    PendingClarification,
    /// A party replied; back in the moderator's queue
    RequiresStaffResponse,
    Resolved,
    Rejected,
    Cancelled,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Open => "open",
            ClaimStatus::InReview => "in_review",
            ClaimStatus::PendingClarification => "pending_clarification",
            ClaimStatus::RequiresStaffResponse => "requires_staff_response",
            ClaimStatus::Resolved => "resolved",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Resolved | ClaimStatus::Rejected | ClaimStatus::Cancelled
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the hiring the claimant is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartySide {
    Client,
    Provider,
}

/// Reason for a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    // Raised by clients
    ServiceNotDelivered,
    IncompleteWork,
    PoorQuality,
    MissedDeadline,
    UnresponsiveProvider,

    // Raised by providers
    PaymentNotReceived,
    ScopeChanged,
    UnresponsiveClient,
    AbusiveBehavior,

    /// Free-text reason, either side
    Other,
}

impl ClaimType {
    /// Returns the side allowed to raise this reason; `None` for either
    pub fn side(&self) -> Option<PartySide> {
        match self {
            ClaimType::ServiceNotDelivered
            | ClaimType::IncompleteWork
            | ClaimType::PoorQuality
            | ClaimType::MissedDeadline
            | ClaimType::UnresponsiveProvider => Some(PartySide::Client),
            ClaimType::PaymentNotReceived
            | ClaimType::ScopeChanged
            | ClaimType::UnresponsiveClient
            | ClaimType::AbusiveBehavior => Some(PartySide::Provider),
            ClaimType::Other => None,
        }
    }
}

/// Verdict category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionType {
    ClientFavor,
    ProviderFavor,
    PartialAgreement,
}

/// Input for opening a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClaim {
    pub hiring_id: HiringId,
    pub claimant_side: PartySide,
    pub respondent_id: UserId,
    pub claim_type: ClaimType,
    pub other_reason: Option<String>,
    pub description: String,
    pub evidence: Vec<EvidenceFile>,
}

/// What a resolve action did to the claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveOutcome {
    /// The claim reached `resolved`
    Resolved,
    /// Verdict recorded; the claim stays in review while compliances run
    AwaitingCompliance,
}

/// The Claim aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    id: ClaimId,
    hiring_id: HiringId,
    claim_type: ClaimType,
    other_reason: Option<String>,
    claimant_side: PartySide,
    status: ClaimStatus,
    claimant_id: UserId,
    respondent_id: UserId,
    moderator_id: Option<UserId>,
    description: String,
    evidence: Vec<EvidenceFile>,
    observations: Option<String>,
    observations_at: Option<DateTime<Utc>>,
    clarification_response: Option<String>,
    clarification_response_at: Option<DateTime<Utc>>,
    clarification_evidence: Vec<EvidenceFile>,
    resolution: Option<String>,
    resolution_type: Option<ResolutionType>,
    resolved_by_email: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
    /// Domain events to be published
    #[serde(skip)]
    events: Vec<ClaimEvent>,
    /// Version for optimistic concurrency
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Claim {
    /// Opens a claim on behalf of the claimant
    ///
    /// # Errors
    ///
    /// Returns a validation error when the description is outside 50-2000
    /// chars, more than 5 evidence files are attached, an `other` claim lacks
    /// a reason of at most 30 chars, the reason belongs to the other side, or
    /// the claimant names themselves as respondent.
    pub fn open(actor: &Actor, new: NewClaim, now: DateTime<Utc>) -> Result<Self, ClaimError> {
        if actor.is_staff() {
            return Err(ClaimError::unauthorized(
                Action::CreateClaim,
                "claims are opened by marketplace users",
            ));
        }

        rules::CLAIM_DESCRIPTION.check(&new.description)?;
        validate_evidence(&new.evidence, 0)?;

        let other_reason = match new.claim_type {
            ClaimType::Other => {
                let reason = new.other_reason.as_deref().unwrap_or_default();
                rules::OTHER_REASON.check(reason)?;
                Some(reason.trim().to_string())
            }
            _ => None,
        };

        if let Some(side) = new.claim_type.side() {
            if side != new.claimant_side {
                return Err(ValidationError::new(
                    "claim_type",
                    format!(
                        "{:?} cannot be raised by the {:?} side",
                        new.claim_type, new.claimant_side
                    ),
                )
                .into());
            }
        }

        if new.respondent_id == actor.user_id {
            return Err(
                ValidationError::new("respondent_id", "must differ from the claimant").into(),
            );
        }

        let id = ClaimId::new_v7();
        let mut claim = Self {
            id,
            hiring_id: new.hiring_id,
            claim_type: new.claim_type,
            other_reason,
            claimant_side: new.claimant_side,
            status: ClaimStatus::Open,
            claimant_id: actor.user_id,
            respondent_id: new.respondent_id,
            moderator_id: None,
            description: new.description.trim().to_string(),
            evidence: new.evidence,
            observations: None,
            observations_at: None,
            clarification_response: None,
            clarification_response_at: None,
            clarification_evidence: Vec::new(),
            resolution: None,
            resolution_type: None,
            resolved_by_email: None,
            resolved_at: None,
            cancellation_reason: None,
            events: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        claim.events.push(ClaimEvent::ClaimOpened {
            claim_id: id,
            hiring_id: claim.hiring_id,
            claimant_id: claim.claimant_id,
            respondent_id: claim.respondent_id,
            claim_type: claim.claim_type,
            timestamp: now,
        });

        Ok(claim)
    }

    pub fn id(&self) -> ClaimId {
        self.id
    }

    pub fn hiring_id(&self) -> HiringId {
        self.hiring_id
    }

    pub fn claim_type(&self) -> ClaimType {
        self.claim_type
    }

    pub fn other_reason(&self) -> Option<&str> {
        self.other_reason.as_deref()
    }

    pub fn claimant_side(&self) -> PartySide {
        self.claimant_side
    }

    pub fn status(&self) -> ClaimStatus {
        self.status
    }

    pub fn claimant_id(&self) -> UserId {
        self.claimant_id
    }

    pub fn respondent_id(&self) -> UserId {
        self.respondent_id
    }

    /// Moderator assigned by `mark_in_review`
    pub fn moderator_id(&self) -> Option<UserId> {
        self.moderator_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn evidence(&self) -> &[EvidenceFile] {
        &self.evidence
    }

    pub fn observations(&self) -> Option<&str> {
        self.observations.as_deref()
    }

    pub fn observations_at(&self) -> Option<DateTime<Utc>> {
        self.observations_at
    }

    pub fn clarification_response(&self) -> Option<&str> {
        self.clarification_response.as_deref()
    }

    pub fn clarification_response_at(&self) -> Option<DateTime<Utc>> {
        self.clarification_response_at
    }

    /// Files attached to clarification replies, all rounds
    pub fn clarification_evidence(&self) -> &[EvidenceFile] {
        &self.clarification_evidence
    }

    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    pub fn resolution_type(&self) -> Option<ResolutionType> {
        self.resolution_type
    }

    pub fn resolved_by_email(&self) -> Option<&str> {
        self.resolved_by_email.as_deref()
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the user is the claimant or the respondent
    pub fn is_party(&self, user_id: UserId) -> bool {
        user_id == self.claimant_id || user_id == self.respondent_id
    }

    /// Returns the other party of the claim, if the user is a party
    pub fn counterpart_of(&self, user_id: UserId) -> Option<UserId> {
        if user_id == self.claimant_id {
            Some(self.respondent_id)
        } else if user_id == self.respondent_id {
            Some(self.claimant_id)
        } else {
            None
        }
    }

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<ClaimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Assigns the acting moderator and starts the review
    pub fn mark_in_review(&mut self, actor: &Actor, now: DateTime<Utc>) -> Result<(), ClaimError> {
        let action = Action::MarkInReview;
        self.ensure_active(action)?;
        Self::ensure_staff(actor, action)?;
        if self.status != ClaimStatus::Open || self.moderator_id.is_some() {
            return Err(self.invalid_transition(action));
        }

        self.moderator_id = Some(actor.user_id);
        let from = self.transition(ClaimStatus::InReview, now);
        self.events.push(ClaimEvent::ClaimTakenForReview {
            claim_id: self.id,
            moderator_id: actor.user_id,
            from,
            timestamp: now,
        });
        Ok(())
    }

    /// Sends observations to the parties and waits for clarification
    pub fn add_observations(
        &mut self,
        actor: &Actor,
        observations: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let action = Action::AddObservations;
        self.ensure_active(action)?;
        Self::ensure_staff(actor, action)?;
        rules::OBSERVATIONS.check(observations)?;
        if !matches!(
            self.status,
            ClaimStatus::InReview | ClaimStatus::RequiresStaffResponse
        ) {
            return Err(self.invalid_transition(action));
        }

        self.observations = Some(observations.trim().to_string());
        self.observations_at = Some(now);
        let from = self.transition(ClaimStatus::PendingClarification, now);
        self.events.push(ClaimEvent::ObservationsAdded {
            claim_id: self.id,
            moderator_id: actor.user_id,
            from,
            timestamp: now,
        });
        Ok(())
    }

    /// Records a party's reply to the moderator's observations
    ///
    /// Either party may reply. The reply needs a response of 20-2000 chars,
    /// at least one new evidence file, or both.
    pub fn submit_clarification(
        &mut self,
        actor: &Actor,
        response: Option<&str>,
        files: Vec<EvidenceFile>,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let action = Action::SubmitObservations;
        self.ensure_active(action)?;
        if !self.is_party(actor.user_id) {
            return Err(ClaimError::unauthorized(
                action,
                "only the claimant or the respondent may reply",
            ));
        }

        let response = response.map(str::trim).filter(|r| !r.is_empty());
        if let Some(text) = response {
            rules::CLARIFICATION.check(text)?;
        }
        validate_evidence(&files, 0)?;
        if response.is_none() && files.is_empty() {
            return Err(ValidationError::new(
                "clarification_response",
                "a response of at least 20 characters or one evidence file is required",
            )
            .into());
        }

        if self.status != ClaimStatus::PendingClarification {
            return Err(self.invalid_transition(action));
        }

        let file_count = files.len();
        if let Some(text) = response {
            self.clarification_response = Some(text.to_string());
        }
        self.clarification_response_at = Some(now);
        self.clarification_evidence.extend(files);
        let from = self.transition(ClaimStatus::RequiresStaffResponse, now);
        self.events.push(ClaimEvent::ClarificationSubmitted {
            claim_id: self.id,
            party_id: actor.user_id,
            file_count,
            from,
            timestamp: now,
        });
        Ok(())
    }

    /// Records the moderator's verdict
    ///
    /// # Arguments
    ///
    /// * `resolution` - Verdict text, 20-2000 chars
    /// * `resolution_type` - Verdict category
    /// * `imposed_compliances` - Number of compliances created with this verdict
    ///
    /// With no compliances the claim is resolved. Otherwise the verdict is
    /// recorded and the claim stays in review until the moderator finalizes.
    pub fn resolve(
        &mut self,
        actor: &Actor,
        resolution: &str,
        resolution_type: ResolutionType,
        imposed_compliances: usize,
        now: DateTime<Utc>,
    ) -> Result<ResolveOutcome, ClaimError> {
        let action = Action::ResolveClaim;
        self.ensure_active(action)?;
        Self::ensure_staff(actor, action)?;
        rules::RESOLUTION.check(resolution)?;
        if !matches!(
            self.status,
            ClaimStatus::InReview | ClaimStatus::RequiresStaffResponse
        ) {
            return Err(self.invalid_transition(action));
        }

        self.resolution = Some(resolution.trim().to_string());
        self.resolution_type = Some(resolution_type);
        self.resolved_by_email = Some(actor.email.clone());

        if imposed_compliances > 0 {
            let from = self.transition(ClaimStatus::InReview, now);
            self.events.push(ClaimEvent::VerdictRecorded {
                claim_id: self.id,
                resolution_type,
                compliance_count: imposed_compliances,
                from,
                timestamp: now,
            });
            return Ok(ResolveOutcome::AwaitingCompliance);
        }

        self.resolved_at = Some(now);
        let from = self.transition(ClaimStatus::Resolved, now);
        self.events.push(ClaimEvent::ClaimResolved {
            claim_id: self.id,
            resolution_type,
            resolved_by: actor.user_id,
            from,
            timestamp: now,
        });
        Ok(ResolveOutcome::Resolved)
    }

    /// Rejects the claim; the hiring reverts to its pre-claim state
    pub fn reject(
        &mut self,
        actor: &Actor,
        resolution: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let action = Action::RejectClaim;
        self.ensure_active(action)?;
        Self::ensure_staff(actor, action)?;
        rules::RESOLUTION.check(resolution)?;

        self.resolution = Some(resolution.trim().to_string());
        self.resolved_by_email = Some(actor.email.clone());
        self.resolved_at = Some(now);
        let from = self.transition(ClaimStatus::Rejected, now);
        self.events.push(ClaimEvent::ClaimRejected {
            claim_id: self.id,
            hiring_id: self.hiring_id,
            rejected_by: actor.user_id,
            from,
            timestamp: now,
        });
        Ok(())
    }

    /// Withdraws the claim; allowed to the claimant and to staff
    pub fn cancel(
        &mut self,
        actor: &Actor,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), ClaimError> {
        let action = Action::CancelClaim;
        self.ensure_active(action)?;
        if !actor.is_staff() && actor.user_id != self.claimant_id {
            return Err(ClaimError::unauthorized(
                action,
                "only the claimant or a moderator may cancel",
            ));
        }
        rules::CANCELLATION_REASON.check_optional(reason)?;

        self.cancellation_reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        let from = self.transition(ClaimStatus::Cancelled, now);
        self.events.push(ClaimEvent::ClaimCancelled {
            claim_id: self.id,
            cancelled_by: actor.user_id,
            from,
            timestamp: now,
        });
        Ok(())
    }

    fn ensure_active(&self, action: Action) -> Result<(), ClaimError> {
        if self.is_terminal() {
            return Err(self.invalid_transition(action));
        }
        Ok(())
    }

    fn ensure_staff(actor: &Actor, action: Action) -> Result<(), ClaimError> {
        if !actor.is_staff() {
            return Err(ClaimError::unauthorized(action, "moderator role required"));
        }
        Ok(())
    }

    fn invalid_transition(&self, action: Action) -> ClaimError {
        ClaimError::InvalidStateTransition {
            status: self.status,
            action,
        }
    }

    fn transition(&mut self, to: ClaimStatus, now: DateTime<Utc>) -> ClaimStatus {
        let from = self.status;
        self.status = to;
        self.version += 1;
        self.updated_at = now;
        from
    }
}
