//! Dispute engine service
//!
//! `DisputeService` is the single entry point for every claim and compliance
//! action. Each action loads the aggregate, applies the transition, writes it
//! back under the version it loaded, then publishes the resulting events to
//! the collaborators. Overdue stages are evaluated on every read; a read that
//! advances a stage persists it and publishes its side effects before
//! returning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use core_kernel::{
    Action, Actor, ClaimId, ClockSource, ComplianceId, EvidenceFile, PortError,
};
use domain_compliance::{
    Compliance, ComplianceError, ComplianceTerms, DeadlinePolicy, EscalationPolicy,
    OverdueStatus, ReviewDecision,
};

use crate::actions::ClaimViewer;
use crate::claim::{Claim, NewClaim, ResolutionType};
use crate::coordinator::ResolutionCoordinator;
use crate::error::{ClaimError, DisputeError};
use crate::events::{ClaimEvent, DisputeEvent};
use crate::ports::logging::{LoggingAccountPort, LoggingHiringPort, LoggingNotifier};
use crate::ports::{AccountPort, DisputeStore, HiringPort, NotificationPort};
use crate::view::{ClaimView, ComplianceView};

/// Escalation and deadline configuration of the engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub escalation: EscalationPolicy,
    pub deadlines: DeadlinePolicy,
}

/// Moderator verdict request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveClaim {
    pub resolution: String,
    pub resolution_type: ResolutionType,
    /// Compliances imposed with the verdict; empty resolves the claim
    #[serde(default)]
    pub compliances: Vec<ComplianceTerms>,
}

/// Result of an overdue sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub evaluated: usize,
    /// Compliances whose overdue stage advanced, with the new stage
    pub advanced: Vec<(ComplianceId, OverdueStatus)>,
    /// Compliances left at their stage because evaluating them failed
    pub failed: Vec<(ComplianceId, String)>,
}

/// Attempts made to persist a stage flip that races another writer
const REFRESH_ATTEMPTS: usize = 2;

/// The claim and compliance resolution engine
pub struct DisputeService {
    store: Arc<dyn DisputeStore>,
    notifier: Arc<dyn NotificationPort>,
    accounts: Arc<dyn AccountPort>,
    hiring: Arc<dyn HiringPort>,
    clock: Arc<dyn ClockSource>,
    settings: EngineSettings,
}

impl DisputeService {
    /// Creates a service with logging collaborators and default settings
    pub fn new(store: Arc<dyn DisputeStore>, clock: Arc<dyn ClockSource>) -> Self {
        Self {
            store,
            notifier: Arc::new(LoggingNotifier),
            accounts: Arc::new(LoggingAccountPort),
            hiring: Arc::new(LoggingHiringPort),
            clock,
            settings: EngineSettings::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationPort>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_accounts(mut self, accounts: Arc<dyn AccountPort>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_hiring(mut self, hiring: Arc<dyn HiringPort>) -> Self {
        self.hiring = hiring;
        self
    }

    pub fn with_settings(mut self, settings: EngineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the underlying store, for health checks
    pub fn store(&self) -> Arc<dyn DisputeStore> {
        Arc::clone(&self.store)
    }

    // ========================================================================
    // Claim actions
    // ========================================================================

    /// Opens a claim; the actor becomes the claimant
    pub async fn create_claim(
        &self,
        actor: &Actor,
        new: NewClaim,
    ) -> Result<ClaimView, DisputeError> {
        let now = self.clock.now();
        let mut claim =
            Claim::open(actor, new, now).map_err(|e| rejected(actor, Action::CreateClaim, e))?;
        self.store.insert_claim(&claim).await?;

        info!(
            claim_id = %claim.id(),
            actor = %actor,
            claim_type = ?claim.claim_type(),
            "claim opened"
        );

        let events = claim.take_events().into_iter().map(DisputeEvent::from).collect();
        self.publish(events).await?;
        Ok(ClaimView::new(claim, Vec::new(), actor))
    }

    /// Returns a claim with its refreshed compliances
    pub async fn get_claim(&self, actor: &Actor, id: ClaimId) -> Result<ClaimView, DisputeError> {
        let claim = self.store.get_claim(id).await?;
        ensure_claim_visible(&claim, actor)?;
        self.claim_view(claim, actor).await
    }

    pub async fn mark_in_review(
        &self,
        actor: &Actor,
        id: ClaimId,
    ) -> Result<ClaimView, DisputeError> {
        self.mutate_claim(actor, id, Action::MarkInReview, |claim, now| {
            claim.mark_in_review(actor, now)
        })
        .await
    }

    pub async fn add_observations(
        &self,
        actor: &Actor,
        id: ClaimId,
        observations: &str,
    ) -> Result<ClaimView, DisputeError> {
        self.mutate_claim(actor, id, Action::AddObservations, |claim, now| {
            claim.add_observations(actor, observations, now)
        })
        .await
    }

    /// Unified party reply to the moderator's observations
    ///
    /// Serves both `submit_observations` and `subsanar_claim`.
    pub async fn submit_observations(
        &self,
        actor: &Actor,
        id: ClaimId,
        response: Option<&str>,
        files: Vec<EvidenceFile>,
    ) -> Result<ClaimView, DisputeError> {
        self.mutate_claim(actor, id, Action::SubmitObservations, |claim, now| {
            claim.submit_clarification(actor, response, files, now)
        })
        .await
    }

    /// Alias of [`DisputeService::submit_observations`]
    pub async fn subsanar_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        response: Option<&str>,
        files: Vec<EvidenceFile>,
    ) -> Result<ClaimView, DisputeError> {
        self.submit_observations(actor, id, response, files).await
    }

    /// Records a verdict, imposing compliances atomically when requested
    pub async fn resolve_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        request: ResolveClaim,
    ) -> Result<ClaimView, DisputeError> {
        let action = Action::ResolveClaim;
        let now = self.clock.now();
        let mut claim = self.store.get_claim(id).await?;
        let expected = claim.version();
        let from = claim.status();

        claim
            .resolve(
                actor,
                &request.resolution,
                request.resolution_type,
                request.compliances.len(),
                now,
            )
            .map_err(|e| rejected(actor, action, e))?;
        let mut compliances = ResolutionCoordinator::build_compliances(
            &claim,
            request.compliances,
            &self.settings.escalation,
            now,
        )
        .map_err(|e| rejected(actor, action, e))?;

        if compliances.is_empty() {
            self.store.update_claim(&claim, expected).await?;
        } else {
            self.store.commit_verdict(&claim, expected, &compliances).await?;
        }

        info!(
            claim_id = %id,
            actor = %actor,
            from = %from,
            to = %claim.status(),
            compliances = compliances.len(),
            "claim verdict recorded"
        );

        let mut events: Vec<DisputeEvent> =
            claim.take_events().into_iter().map(DisputeEvent::from).collect();
        for compliance in compliances.iter_mut() {
            events.extend(compliance.take_events().into_iter().map(DisputeEvent::from));
        }
        self.publish(events).await?;
        self.claim_view(claim, actor).await
    }

    /// Rejects the claim and reverts the hiring
    pub async fn reject_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        resolution: &str,
    ) -> Result<ClaimView, DisputeError> {
        self.mutate_claim(actor, id, Action::RejectClaim, |claim, now| {
            claim.reject(actor, resolution, now)
        })
        .await
    }

    pub async fn cancel_claim(
        &self,
        actor: &Actor,
        id: ClaimId,
        reason: Option<&str>,
    ) -> Result<ClaimView, DisputeError> {
        self.mutate_claim(actor, id, Action::CancelClaim, |claim, now| {
            claim.cancel(actor, reason, now)
        })
        .await
    }

    // ========================================================================
    // Compliance actions
    // ========================================================================

    /// Returns a compliance with its overdue stage refreshed
    pub async fn get_compliance(
        &self,
        actor: &Actor,
        id: ComplianceId,
    ) -> Result<ComplianceView, DisputeError> {
        let compliance = self.store.get_compliance(id).await?;
        ensure_compliance_visible(&compliance, actor)?;
        let compliance = self.refresh(compliance, self.clock.now()).await?;
        Ok(ComplianceView::new(compliance, actor))
    }

    pub async fn list_claim_compliances(
        &self,
        actor: &Actor,
        claim_id: ClaimId,
    ) -> Result<Vec<ComplianceView>, DisputeError> {
        let claim = self.store.get_claim(claim_id).await?;
        ensure_claim_visible(&claim, actor)?;
        let compliances = self.load_compliances(claim_id).await?;
        Ok(compliances
            .into_iter()
            .map(|c| ComplianceView::new(c, actor))
            .collect())
    }

    /// Submits evidence for the current attempt
    ///
    /// Serves both `submit_compliance_evidence` and `upload_compliance`.
    pub async fn submit_compliance_evidence(
        &self,
        actor: &Actor,
        id: ComplianceId,
        files: Vec<EvidenceFile>,
        notes: &str,
    ) -> Result<ComplianceView, DisputeError> {
        self.mutate_compliance(actor, id, Action::SubmitComplianceEvidence, |compliance, now| {
            compliance.submit_evidence(actor, files, notes, now).map(|_| ())
        })
        .await
    }

    /// Alias of [`DisputeService::submit_compliance_evidence`]
    pub async fn upload_compliance(
        &self,
        actor: &Actor,
        id: ComplianceId,
        files: Vec<EvidenceFile>,
        notes: &str,
    ) -> Result<ComplianceView, DisputeError> {
        self.submit_compliance_evidence(actor, id, files, notes).await
    }

    /// Counterpart's advisory review
    pub async fn peer_review(
        &self,
        actor: &Actor,
        id: ComplianceId,
        approved: bool,
        reason: Option<&str>,
    ) -> Result<ComplianceView, DisputeError> {
        let action = if approved {
            Action::PeerApprove
        } else {
            Action::PeerObject
        };
        self.mutate_compliance(actor, id, action, |compliance, now| {
            compliance.peer_review(actor, approved, reason, now)
        })
        .await
    }

    pub async fn peer_approve(
        &self,
        actor: &Actor,
        id: ComplianceId,
        reason: Option<&str>,
    ) -> Result<ComplianceView, DisputeError> {
        self.peer_review(actor, id, true, reason).await
    }

    pub async fn peer_object(
        &self,
        actor: &Actor,
        id: ComplianceId,
        reason: &str,
    ) -> Result<ComplianceView, DisputeError> {
        self.peer_review(actor, id, false, Some(reason)).await
    }

    /// Moderator's final decision on the current submission
    pub async fn review_compliance(
        &self,
        actor: &Actor,
        id: ComplianceId,
        decision: ReviewDecision,
        notes: &str,
    ) -> Result<ComplianceView, DisputeError> {
        let policy = self.settings.escalation.clone();
        self.mutate_compliance(actor, id, Action::ReviewCompliance, |compliance, now| {
            compliance
                .review(actor, decision, notes, now, &policy)
                .map(|outcome| debug!(compliance_id = %id, ?outcome, "compliance reviewed"))
        })
        .await
    }

    /// Evaluates every open compliance and applies stage side effects
    ///
    /// Intended for an external scheduler; reads apply the same refresh.
    pub async fn sweep_overdue(&self, actor: &Actor) -> Result<SweepReport, DisputeError> {
        if !actor.is_staff() {
            return Err(DisputeError::Forbidden(
                "moderator role required to sweep overdue compliances".to_string(),
            ));
        }

        let now = self.clock.now();
        let mut report = SweepReport::default();
        for compliance in self.store.list_open_compliances().await? {
            let before = compliance.overdue_status();
            let id = compliance.id();
            match self.refresh(compliance, now).await {
                Ok(refreshed) => {
                    report.evaluated += 1;
                    if refreshed.overdue_status() != before {
                        report.advanced.push((id, refreshed.overdue_status()));
                    }
                }
                Err(err) => {
                    error!(compliance_id = %id, error = %err, "overdue sweep skipped compliance");
                    report.failed.push((id, err.to_string()));
                }
            }
        }

        info!(
            actor = %actor,
            evaluated = report.evaluated,
            advanced = report.advanced.len(),
            failed = report.failed.len(),
            "overdue sweep finished"
        );
        Ok(report)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn mutate_claim<F>(
        &self,
        actor: &Actor,
        id: ClaimId,
        action: Action,
        apply: F,
    ) -> Result<ClaimView, DisputeError>
    where
        F: FnOnce(&mut Claim, DateTime<Utc>) -> Result<(), ClaimError>,
    {
        let now = self.clock.now();
        let mut claim = self.store.get_claim(id).await?;
        let expected = claim.version();
        let from = claim.status();

        apply(&mut claim, now).map_err(|e| rejected(actor, action, e))?;
        self.store.update_claim(&claim, expected).await?;

        info!(
            claim_id = %id,
            actor = %actor,
            action = %action,
            from = %from,
            to = %claim.status(),
            "claim transition"
        );

        let events = claim.take_events().into_iter().map(DisputeEvent::from).collect();
        self.publish(events).await?;
        self.claim_view(claim, actor).await
    }

    async fn mutate_compliance<F>(
        &self,
        actor: &Actor,
        id: ComplianceId,
        action: Action,
        apply: F,
    ) -> Result<ComplianceView, DisputeError>
    where
        F: FnOnce(&mut Compliance, DateTime<Utc>) -> Result<(), ComplianceError>,
    {
        let now = self.clock.now();
        let loaded = self.store.get_compliance(id).await?;
        let mut compliance = self.refresh(loaded, now).await?;
        let expected = compliance.version();
        let from = compliance.display_status();

        apply(&mut compliance, now).map_err(|e| rejected(actor, action, e))?;
        // Recomputes the effective deadline after a granted retry
        compliance.refresh_overdue(now, &self.settings.deadlines);
        self.store.update_compliance(&compliance, expected).await?;

        info!(
            compliance_id = %id,
            claim_id = %compliance.claim_id(),
            actor = %actor,
            action = %action,
            from = %from,
            to = %compliance.display_status(),
            attempt = compliance.current_attempt(),
            rejections = compliance.rejection_count(),
            "compliance transition"
        );

        let events = compliance
            .take_events()
            .into_iter()
            .map(DisputeEvent::from)
            .collect();
        self.publish(events).await?;
        Ok(ComplianceView::new(compliance, actor))
    }

    async fn claim_view(&self, claim: Claim, actor: &Actor) -> Result<ClaimView, DisputeError> {
        let compliances = self.load_compliances(claim.id()).await?;
        Ok(ClaimView::new(claim, compliances, actor))
    }

    async fn load_compliances(&self, claim_id: ClaimId) -> Result<Vec<Compliance>, DisputeError> {
        let now = self.clock.now();
        let mut refreshed = Vec::new();
        for compliance in self.store.list_compliances(claim_id).await? {
            refreshed.push(self.refresh(compliance, now).await?);
        }
        Ok(refreshed)
    }

    /// Applies the deadline evaluation and persists a stage change
    ///
    /// Account directives raised by the new stage are applied before the
    /// stage is written, so a failed directive leaves the stage unadvanced and
    /// the next evaluation issues it again. When another writer got there
    /// first the compliance is reloaded and evaluated again.
    async fn refresh(
        &self,
        mut compliance: Compliance,
        now: DateTime<Utc>,
    ) -> Result<Compliance, DisputeError> {
        for attempt in 1..=REFRESH_ATTEMPTS {
            let expected = compliance.version();
            let Some(stage) = compliance.refresh_overdue(now, &self.settings.deadlines) else {
                return Ok(compliance);
            };

            let events: Vec<DisputeEvent> = compliance
                .take_events()
                .into_iter()
                .map(DisputeEvent::from)
                .collect();
            for event in &events {
                self.apply_directive(event).await?;
            }

            match self.store.update_compliance(&compliance, expected).await {
                Ok(()) => {
                    warn!(
                        compliance_id = %compliance.id(),
                        claim_id = %compliance.claim_id(),
                        responsible = %compliance.responsible_user_id(),
                        stage = %stage,
                        days_overdue = compliance.days_overdue(),
                        "compliance overdue stage advanced"
                    );
                    for event in &events {
                        self.notify(event).await;
                    }
                    return Ok(compliance);
                }
                Err(err) if err.is_version_conflict() && attempt < REFRESH_ATTEMPTS => {
                    debug!(
                        compliance_id = %compliance.id(),
                        "overdue refresh raced a writer, reloading"
                    );
                    compliance = self.store.get_compliance(compliance.id()).await?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(compliance)
    }

    /// Dispatches committed events to the collaborators
    ///
    /// Notification failures are logged; account and hiring failures are
    /// returned after every event has been offered.
    async fn publish(&self, events: Vec<DisputeEvent>) -> Result<(), DisputeError> {
        let mut first_failure: Option<DisputeError> = None;

        for event in events {
            self.notify(&event).await;

            let outcome = match &event {
                DisputeEvent::Compliance(_) => self.apply_directive(&event).await,
                DisputeEvent::Claim(ClaimEvent::ClaimRejected {
                    claim_id,
                    hiring_id,
                    ..
                }) => self
                    .hiring
                    .revert_hiring(*hiring_id, *claim_id)
                    .await
                    .map_err(|source| {
                        let err = collaborator("hiring service", source);
                        error!(claim_id = %claim_id, error = %err, "collaborator call failed");
                        err
                    }),
                DisputeEvent::Claim(_) => Ok(()),
            };

            if let Err(err) = outcome {
                first_failure.get_or_insert(err);
            }
        }

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn notify(&self, event: &DisputeEvent) {
        if let Err(err) = self.notifier.notify(event).await {
            error!(
                claim_id = %event.claim_id(),
                event_type = event.event_type(),
                error = %err,
                "notification dispatch failed"
            );
        }
    }

    /// Forwards the account directive carried by a compliance event, if any
    async fn apply_directive(&self, event: &DisputeEvent) -> Result<(), DisputeError> {
        let DisputeEvent::Compliance(e) = event else {
            return Ok(());
        };
        let Some(directive) = e.account_directive() else {
            return Ok(());
        };

        warn!(
            compliance_id = %e.compliance_id(),
            user_id = %directive.user_id(),
            ?directive,
            "account escalation"
        );
        self.accounts
            .apply_directive(&directive)
            .await
            .map_err(|source| {
                let err = collaborator("account service", source);
                error!(claim_id = %event.claim_id(), error = %err, "collaborator call failed");
                err
            })
    }
}

fn collaborator(name: &'static str, source: PortError) -> DisputeError {
    DisputeError::Collaborator {
        collaborator: name,
        source,
    }
}

fn rejected(actor: &Actor, action: Action, err: impl Into<DisputeError>) -> DisputeError {
    let err = err.into();
    debug!(actor = %actor, action = %action, kind = %err.kind(), error = %err, "action rejected");
    err
}

fn ensure_claim_visible(claim: &Claim, actor: &Actor) -> Result<(), DisputeError> {
    if ClaimViewer::of(claim, actor) == ClaimViewer::Outsider {
        return Err(DisputeError::Forbidden(format!(
            "{} is not a party to claim {}",
            actor.user_id,
            claim.id()
        )));
    }
    Ok(())
}

fn ensure_compliance_visible(compliance: &Compliance, actor: &Actor) -> Result<(), DisputeError> {
    if domain_compliance::ComplianceViewer::of(compliance, actor)
        == domain_compliance::ComplianceViewer::Outsider
    {
        return Err(DisputeError::Forbidden(format!(
            "{} is not a party to compliance {}",
            actor.user_id,
            compliance.id()
        )));
    }
    Ok(())
}
