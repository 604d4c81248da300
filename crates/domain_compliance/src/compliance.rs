//! Compliance aggregate
//!
//! A compliance is an obligation a moderator imposes on one claim party. The
//! responsible party submits evidence, the counterpart may pre-review it, and
//! a moderator approves or rejects it. Rejections escalate through the
//! [`EscalationPolicy`]; missed deadlines escalate through the
//! [`DeadlinePolicy`]. Either path can end in a ban, after which the
//! compliance refuses every mutation.
//!
//! # State Machine
//!
//! - Pending -> Submitted (via submit_evidence)
//! - Submitted -> Approved (via review, approve)
//! - Submitted -> Pending (via review, reject with a retry granted)
//! - Submitted -> Rejected (via review, reject with suspension or ban)
//! - Pending -> Rejected (via refresh_overdue reaching BANNED)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::validation::rules;
use core_kernel::{
    validate_evidence, Action, Actor, ClaimId, ComplianceId, EvidenceFile, SubmissionId, UserId,
    ValidationError,
};

use crate::deadline::{DeadlinePolicy, OverdueStatus};
use crate::error::ComplianceError;
use crate::escalation::{Consequence, EscalationPolicy, EscalationSource};
use crate::events::ComplianceEvent;
use crate::peer_review::{PeerReviewGate, PeerReviewRecord};

/// Compliance status
///
/// Only `Pending`, `Submitted`, `Approved` and `Rejected` are persisted. The
/// remaining variants are overlays returned by [`Compliance::display_status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
    /// Pending and past the first grace window
    Overdue,
    /// Pending and past the original deadline
    Warning,
    /// Banned by deadline exhaustion
    Escalated,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Pending => "pending",
            ComplianceStatus::Submitted => "submitted",
            ComplianceStatus::Approved => "approved",
            ComplianceStatus::Rejected => "rejected",
            ComplianceStatus::Overdue => "overdue",
            ComplianceStatus::Warning => "warning",
            ComplianceStatus::Escalated => "escalated",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of obligation imposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceType {
    Refund,
    PartialRefund,
    DeliverWork,
    CorrectWork,
    Payment,
    Documentation,
    Other,
}

/// Terms a moderator sets when imposing a compliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceTerms {
    pub responsible_user_id: UserId,
    pub compliance_type: ComplianceType,
    pub deadline: DateTime<Utc>,
    pub moderator_instructions: String,
}

/// Moderator decision on a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Moderator review attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeratorReviewRecord {
    pub reviewer_id: UserId,
    pub reviewer_email: String,
    pub decision: ReviewDecision,
    pub notes: String,
    pub reviewed_at: DateTime<Utc>,
}

/// One evidence submission; appended on every submit and never removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub attempt_number: u32,
    pub submitted_at: DateTime<Utc>,
    pub user_notes: String,
    pub evidence: Vec<EvidenceFile>,
    pub peer_review: Option<PeerReviewRecord>,
    pub moderator_review: Option<ModeratorReviewRecord>,
}

/// Result of a moderator review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approved,
    /// Rejected with another attempt granted
    RetryGranted {
        attempt: u32,
        deadline: DateTime<Utc>,
    },
    /// Rejected with a terminal escalation
    Escalated { consequence: Consequence },
}

/// The Compliance aggregate root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compliance {
    id: ComplianceId,
    claim_id: ClaimId,
    responsible_user_id: UserId,
    /// The other claim party; the only user allowed to peer review
    counterpart_user_id: UserId,
    compliance_type: ComplianceType,
    status: ComplianceStatus,
    /// Current deadline; extended when a retry is granted
    deadline: DateTime<Utc>,
    moderator_instructions: String,
    current_attempt: u32,
    max_attempts: u32,
    rejection_count: u32,
    suspension_triggered: bool,
    ban_triggered: bool,
    overdue_status: OverdueStatus,
    days_overdue: u32,
    effective_deadline: DateTime<Utc>,
    can_still_submit: bool,
    evidence: Vec<EvidenceFile>,
    user_notes: Option<String>,
    submitted_at: Option<DateTime<Utc>>,
    peer_approved: Option<bool>,
    peer_review_reason: Option<String>,
    peer_reviewed_at: Option<DateTime<Utc>>,
    moderator_notes: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    submissions: Vec<Submission>,
    #[serde(skip)]
    events: Vec<ComplianceEvent>,
    /// Version for optimistic concurrency
    version: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Compliance {
    /// Imposes a new compliance on a claim party
    ///
    /// # Arguments
    ///
    /// * `claim_id` - The owning claim
    /// * `terms` - Responsible party, type, deadline and instructions
    /// * `counterpart_user_id` - The other claim party
    /// * `max_attempts` - Attempts granted, usually the escalation policy's
    /// * `now` - Current time
    ///
    /// # Errors
    ///
    /// Returns a validation error if the instructions are out of bounds, the
    /// deadline is not in the future, or both parties are the same user.
    pub fn impose(
        claim_id: ClaimId,
        terms: ComplianceTerms,
        counterpart_user_id: UserId,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, ComplianceError> {
        rules::MODERATOR_INSTRUCTIONS.check(&terms.moderator_instructions)?;
        if terms.deadline <= now {
            return Err(ValidationError::new("deadline", "must be in the future").into());
        }
        if terms.responsible_user_id == counterpart_user_id {
            return Err(ValidationError::new(
                "responsible_user_id",
                "must be a party other than the counterpart",
            )
            .into());
        }

        let id = ComplianceId::new_v7();
        let mut compliance = Self {
            id,
            claim_id,
            responsible_user_id: terms.responsible_user_id,
            counterpart_user_id,
            compliance_type: terms.compliance_type,
            status: ComplianceStatus::Pending,
            deadline: terms.deadline,
            moderator_instructions: terms.moderator_instructions.trim().to_string(),
            current_attempt: 1,
            max_attempts: max_attempts.max(1),
            rejection_count: 0,
            suspension_triggered: false,
            ban_triggered: false,
            overdue_status: OverdueStatus::NotOverdue,
            days_overdue: 0,
            effective_deadline: terms.deadline,
            can_still_submit: true,
            evidence: Vec::new(),
            user_notes: None,
            submitted_at: None,
            peer_approved: None,
            peer_review_reason: None,
            peer_reviewed_at: None,
            moderator_notes: None,
            reviewed_at: None,
            submissions: Vec::new(),
            events: Vec::new(),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        compliance.events.push(ComplianceEvent::ComplianceImposed {
            compliance_id: id,
            claim_id,
            responsible_user_id: terms.responsible_user_id,
            deadline: terms.deadline,
            timestamp: now,
        });

        Ok(compliance)
    }

    pub fn id(&self) -> ComplianceId {
        self.id
    }

    pub fn claim_id(&self) -> ClaimId {
        self.claim_id
    }

    pub fn responsible_user_id(&self) -> UserId {
        self.responsible_user_id
    }

    pub fn counterpart_user_id(&self) -> UserId {
        self.counterpart_user_id
    }

    pub fn compliance_type(&self) -> ComplianceType {
        self.compliance_type
    }

    /// Returns the persisted status
    pub fn status(&self) -> ComplianceStatus {
        self.status
    }

    pub fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    pub fn moderator_instructions(&self) -> &str {
        &self.moderator_instructions
    }

    pub fn current_attempt(&self) -> u32 {
        self.current_attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn rejection_count(&self) -> u32 {
        self.rejection_count
    }

    pub fn suspension_triggered(&self) -> bool {
        self.suspension_triggered
    }

    pub fn ban_triggered(&self) -> bool {
        self.ban_triggered
    }

    pub fn overdue_status(&self) -> OverdueStatus {
        self.overdue_status
    }

    pub fn days_overdue(&self) -> u32 {
        self.days_overdue
    }

    /// Deadline including the grace window of the current overdue stage
    pub fn effective_deadline(&self) -> DateTime<Utc> {
        self.effective_deadline
    }

    pub fn can_still_submit(&self) -> bool {
        self.can_still_submit
    }

    /// Evidence of the latest submission
    pub fn evidence(&self) -> &[EvidenceFile] {
        &self.evidence
    }

    pub fn user_notes(&self) -> Option<&str> {
        self.user_notes.as_deref()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn peer_approved(&self) -> Option<bool> {
        self.peer_approved
    }

    pub fn peer_review_reason(&self) -> Option<&str> {
        self.peer_review_reason.as_deref()
    }

    pub fn peer_reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.peer_reviewed_at
    }

    pub fn moderator_notes(&self) -> Option<&str> {
        self.moderator_notes.as_deref()
    }

    pub fn reviewed_at(&self) -> Option<DateTime<Utc>> {
        self.reviewed_at
    }

    /// Submission history, oldest first
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
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

    /// Returns accumulated domain events and clears them
    pub fn take_events(&mut self) -> Vec<ComplianceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns pending domain events without clearing them
    pub fn pending_events(&self) -> &[ComplianceEvent] {
        &self.events
    }

    /// Returns true once no further transition is possible
    pub fn is_terminal(&self) -> bool {
        self.ban_triggered
            || matches!(
                self.status,
                ComplianceStatus::Approved | ComplianceStatus::Rejected
            )
    }

    /// Status as presented to viewers, with the overdue overlays applied
    pub fn display_status(&self) -> ComplianceStatus {
        if self.ban_triggered && self.overdue_status == OverdueStatus::Banned {
            return ComplianceStatus::Escalated;
        }
        match (self.status, self.overdue_status) {
            (ComplianceStatus::Pending, OverdueStatus::FirstWarning) => ComplianceStatus::Warning,
            (ComplianceStatus::Pending, OverdueStatus::Suspended) => ComplianceStatus::Overdue,
            (status, _) => status,
        }
    }

    /// Submits evidence for the current attempt
    ///
    /// # Errors
    ///
    /// - `TerminalStateViolation` once banned
    /// - `Unauthorized` unless the actor is the responsible party
    /// - `Validation` for 0 or more than 5 files, bad files, or notes outside 20-1000 chars
    /// - `InvalidStateTransition` unless pending and still allowed to submit
    pub fn submit_evidence(
        &mut self,
        actor: &Actor,
        files: Vec<EvidenceFile>,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmissionId, ComplianceError> {
        let action = Action::SubmitComplianceEvidence;
        self.ensure_not_banned()?;
        if actor.user_id != self.responsible_user_id {
            return Err(ComplianceError::unauthorized(
                action,
                "only the responsible party may submit evidence",
            ));
        }
        validate_evidence(&files, 1)?;
        rules::EVIDENCE_NOTES.check(notes)?;
        if self.status != ComplianceStatus::Pending || !self.can_still_submit {
            return Err(self.invalid_transition(action));
        }

        let notes = notes.trim().to_string();
        let submission = Submission {
            id: SubmissionId::new_v7(),
            attempt_number: self.current_attempt,
            submitted_at: now,
            user_notes: notes.clone(),
            evidence: files.clone(),
            peer_review: None,
            moderator_review: None,
        };
        let submission_id = submission.id;
        let file_count = files.len();

        self.submissions.push(submission);
        self.evidence = files;
        self.user_notes = Some(notes);
        self.submitted_at = Some(now);
        self.peer_approved = None;
        self.peer_review_reason = None;
        self.peer_reviewed_at = None;
        self.status = ComplianceStatus::Submitted;
        self.touch(now);

        self.events.push(ComplianceEvent::EvidenceSubmitted {
            compliance_id: self.id,
            claim_id: self.claim_id,
            attempt_number: self.current_attempt,
            file_count,
            timestamp: now,
        });

        Ok(submission_id)
    }

    /// Records the counterpart's advisory review of the current submission
    ///
    /// Never changes the status. A later call overwrites the earlier record
    /// until the moderator decides.
    pub fn peer_review(
        &mut self,
        actor: &Actor,
        approved: bool,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), ComplianceError> {
        self.ensure_not_banned()?;
        let record = PeerReviewGate::evaluate(self, actor, approved, reason, now)?;

        self.peer_approved = Some(record.approved);
        self.peer_review_reason = record.reason.clone();
        self.peer_reviewed_at = Some(now);
        if let Some(current) = self.submissions.last_mut() {
            current.peer_review = Some(record);
        }
        self.touch(now);

        self.events.push(ComplianceEvent::PeerReviewRecorded {
            compliance_id: self.id,
            claim_id: self.claim_id,
            reviewer_id: actor.user_id,
            approved,
            timestamp: now,
        });

        Ok(())
    }

    /// Applies the moderator's final decision on the current submission
    ///
    /// # Arguments
    ///
    /// * `actor` - The reviewing moderator
    /// * `decision` - Approve or reject
    /// * `notes` - Moderator notes, 20-1000 chars
    /// * `now` - Current time
    /// * `policy` - Escalation table applied on rejection
    ///
    /// # Errors
    ///
    /// - `TerminalStateViolation` once banned
    /// - `Unauthorized` unless the actor is staff
    /// - `Validation` for notes out of bounds
    /// - `InvalidStateTransition` unless submitted
    pub fn review(
        &mut self,
        actor: &Actor,
        decision: ReviewDecision,
        notes: &str,
        now: DateTime<Utc>,
        policy: &EscalationPolicy,
    ) -> Result<ReviewOutcome, ComplianceError> {
        let action = Action::ReviewCompliance;
        self.ensure_not_banned()?;
        if !actor.is_staff() {
            return Err(ComplianceError::unauthorized(
                action,
                "only a moderator may review a compliance",
            ));
        }
        rules::REVIEW_NOTES.check(notes)?;
        if self.status != ComplianceStatus::Submitted {
            return Err(self.invalid_transition(action));
        }

        let notes = notes.trim().to_string();
        if let Some(current) = self.submissions.last_mut() {
            current.moderator_review = Some(ModeratorReviewRecord {
                reviewer_id: actor.user_id,
                reviewer_email: actor.email.clone(),
                decision,
                notes: notes.clone(),
                reviewed_at: now,
            });
        }
        self.moderator_notes = Some(notes);
        self.reviewed_at = Some(now);
        self.touch(now);

        match decision {
            ReviewDecision::Approve => {
                self.status = ComplianceStatus::Approved;
                self.can_still_submit = false;
                self.events.push(ComplianceEvent::ComplianceApproved {
                    compliance_id: self.id,
                    claim_id: self.claim_id,
                    reviewer_id: actor.user_id,
                    timestamp: now,
                });
                Ok(ReviewOutcome::Approved)
            }
            ReviewDecision::Reject => Ok(self.reject(actor, now, policy)),
        }
    }

    fn reject(
        &mut self,
        actor: &Actor,
        now: DateTime<Utc>,
        policy: &EscalationPolicy,
    ) -> ReviewOutcome {
        let mut consequence = policy.evaluate(self.rejection_count).consequence;
        if !consequence.is_terminal() && self.current_attempt >= self.max_attempts {
            consequence = Consequence::Ban;
        }
        self.rejection_count += 1;

        let next_deadline = if consequence.is_terminal() {
            self.status = ComplianceStatus::Rejected;
            self.can_still_submit = false;
            None
        } else {
            self.current_attempt += 1;
            self.deadline = self.deadline.max(now)
                + Duration::days(i64::from(policy.retry_extension_days));
            self.effective_deadline = self.deadline;
            // A new attempt walks the overdue stages from the start
            self.overdue_status = OverdueStatus::NotOverdue;
            self.days_overdue = 0;
            self.status = ComplianceStatus::Pending;
            self.can_still_submit = true;
            Some(self.deadline)
        };

        self.events.push(ComplianceEvent::ComplianceRejected {
            compliance_id: self.id,
            claim_id: self.claim_id,
            reviewer_id: actor.user_id,
            rejection_count: self.rejection_count,
            consequence,
            next_deadline,
            timestamp: now,
        });

        match consequence {
            Consequence::Warning => ReviewOutcome::RetryGranted {
                attempt: self.current_attempt,
                deadline: self.deadline,
            },
            Consequence::Suspension { days } => {
                self.suspension_triggered = true;
                self.events.push(ComplianceEvent::AccountSuspensionTriggered {
                    compliance_id: self.id,
                    claim_id: self.claim_id,
                    user_id: self.responsible_user_id,
                    days,
                    source: EscalationSource::Rejection,
                    timestamp: now,
                });
                ReviewOutcome::Escalated { consequence }
            }
            Consequence::Ban => {
                self.ban_triggered = true;
                self.events.push(ComplianceEvent::AccountBanTriggered {
                    compliance_id: self.id,
                    claim_id: self.claim_id,
                    user_id: self.responsible_user_id,
                    source: EscalationSource::Rejection,
                    timestamp: now,
                });
                ReviewOutcome::Escalated { consequence }
            }
        }
    }

    /// Re-evaluates the deadline of a pending compliance
    ///
    /// Updates `days_overdue`, the effective deadline and `can_still_submit`.
    /// When the evaluation advances the overdue stage, the new stage is
    /// recorded and its side effects applied: a suspension directive at
    /// SUSPENDED, and a ban with a terminal rejection at BANNED.
    ///
    /// Returns the newly reached stage, if any.
    pub fn refresh_overdue(
        &mut self,
        now: DateTime<Utc>,
        policy: &DeadlinePolicy,
    ) -> Option<OverdueStatus> {
        if self.status != ComplianceStatus::Pending || self.is_terminal() {
            return None;
        }

        let evaluation = policy.evaluate(self.deadline, now, self.overdue_status);
        self.days_overdue = evaluation.days_overdue;
        self.effective_deadline = evaluation.effective_deadline;
        self.can_still_submit = evaluation.can_still_submit;

        if !evaluation.advanced_from(self.overdue_status) {
            return None;
        }

        let stage = evaluation.overdue_status;
        self.overdue_status = stage;
        self.touch(now);
        self.events.push(ComplianceEvent::OverdueStageReached {
            compliance_id: self.id,
            claim_id: self.claim_id,
            stage,
            days_overdue: evaluation.days_overdue,
            effective_deadline: evaluation.effective_deadline,
            timestamp: now,
        });

        match stage {
            OverdueStatus::Suspended if !self.suspension_triggered => {
                self.suspension_triggered = true;
                self.events.push(ComplianceEvent::AccountSuspensionTriggered {
                    compliance_id: self.id,
                    claim_id: self.claim_id,
                    user_id: self.responsible_user_id,
                    days: policy.account_suspension_days,
                    source: EscalationSource::Deadline,
                    timestamp: now,
                });
            }
            OverdueStatus::Banned => {
                self.ban_triggered = true;
                self.status = ComplianceStatus::Rejected;
                self.can_still_submit = false;
                self.events.push(ComplianceEvent::AccountBanTriggered {
                    compliance_id: self.id,
                    claim_id: self.claim_id,
                    user_id: self.responsible_user_id,
                    source: EscalationSource::Deadline,
                    timestamp: now,
                });
            }
            _ => {}
        }

        Some(stage)
    }

    fn ensure_not_banned(&self) -> Result<(), ComplianceError> {
        if self.ban_triggered {
            return Err(ComplianceError::TerminalStateViolation {
                compliance_id: self.id,
                reason: "the responsible party has been banned".to_string(),
            });
        }
        Ok(())
    }

    fn invalid_transition(&self, action: Action) -> ComplianceError {
        ComplianceError::InvalidStateTransition {
            status: self.display_status(),
            action,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn pending() -> (Compliance, Actor) {
        let responsible = UserId::new();
        let terms = ComplianceTerms {
            responsible_user_id: responsible,
            compliance_type: ComplianceType::Refund,
            deadline: t0() + Duration::days(7),
            moderator_instructions: "Refund the full amount through the platform".to_string(),
        };
        let compliance = Compliance::impose(ClaimId::new(), terms, UserId::new(), 3, t0()).unwrap();
        (compliance, Actor::user(responsible, "provider@example.com"))
    }

    fn files() -> Vec<EvidenceFile> {
        vec![EvidenceFile::new("https://files.example.com/receipt.pdf", "receipt.pdf", 1024)]
    }

    #[test]
    fn test_impose_starts_pending() {
        let (compliance, _) = pending();
        assert_eq!(compliance.status(), ComplianceStatus::Pending);
        assert_eq!(compliance.current_attempt(), 1);
        assert_eq!(compliance.version(), 1);
        assert!(compliance.can_still_submit());
    }

    #[test]
    fn test_impose_rejects_past_deadline() {
        let terms = ComplianceTerms {
            responsible_user_id: UserId::new(),
            compliance_type: ComplianceType::Payment,
            deadline: t0() - Duration::hours(1),
            moderator_instructions: "Pay the outstanding balance in full".to_string(),
        };
        let err = Compliance::impose(ClaimId::new(), terms, UserId::new(), 3, t0()).unwrap_err();
        assert!(matches!(err, ComplianceError::Validation(_)));
    }

    #[test]
    fn test_submit_moves_to_submitted_and_appends_history() {
        let (mut compliance, actor) = pending();
        compliance
            .submit_evidence(&actor, files(), "Refund issued, receipt attached here", t0())
            .unwrap();
        assert_eq!(compliance.status(), ComplianceStatus::Submitted);
        assert_eq!(compliance.submissions().len(), 1);
        assert_eq!(compliance.submissions()[0].attempt_number, 1);
        assert_eq!(compliance.version(), 2);
    }

    #[test]
    fn test_display_overlays() {
        let (mut compliance, _) = pending();
        let policy = DeadlinePolicy::default();
        let deadline = compliance.deadline();

        compliance.refresh_overdue(deadline + Duration::hours(1), &policy);
        assert_eq!(compliance.display_status(), ComplianceStatus::Warning);
        assert_eq!(compliance.status(), ComplianceStatus::Pending);

        compliance.refresh_overdue(deadline + Duration::days(4), &policy);
        assert_eq!(compliance.display_status(), ComplianceStatus::Overdue);

        compliance.refresh_overdue(deadline + Duration::days(6), &policy);
        assert_eq!(compliance.display_status(), ComplianceStatus::Escalated);
        assert_eq!(compliance.status(), ComplianceStatus::Rejected);
    }

    #[test]
    fn test_rejected_event_precedes_escalation_event() {
        let (mut compliance, actor) = pending();
        let moderator = Actor::moderator(UserId::new(), "mod@example.com");
        let policy = EscalationPolicy::default();
        let notes = "Evidence does not show the refund";

        compliance
            .submit_evidence(&actor, files(), "Refund issued, receipt attached here", t0())
            .unwrap();
        compliance
            .review(&moderator, ReviewDecision::Reject, notes, t0(), &policy)
            .unwrap();
        compliance
            .submit_evidence(&actor, files(), "Second receipt with bank reference", t0())
            .unwrap();
        compliance.take_events();
        compliance
            .review(&moderator, ReviewDecision::Reject, notes, t0(), &policy)
            .unwrap();

        let types: Vec<_> = compliance
            .take_events()
            .iter()
            .map(|e| e.event_type())
            .collect();
        assert_eq!(types, vec!["ComplianceRejected", "AccountSuspensionTriggered"]);
    }
}
