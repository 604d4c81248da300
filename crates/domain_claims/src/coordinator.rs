//! Resolution coordination
//!
//! Builds the compliances a verdict imposes and reports whether every
//! compliance under a claim has settled. Settlement is advisory: the
//! moderator may resolve or reject at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::ValidationError;
use domain_compliance::{Compliance, ComplianceStatus, ComplianceTerms, EscalationPolicy};

use crate::claim::Claim;
use crate::error::DisputeError;

/// Maximum compliances a single verdict may impose
pub const MAX_COMPLIANCES_PER_VERDICT: usize = 10;

/// Settlement counts for the compliances of one claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub total: usize,
    pub pending: usize,
    pub submitted: usize,
    pub approved: usize,
    /// Rejected with no further attempts, including bans
    pub rejected: usize,
    pub can_resolve: bool,
}

/// Orchestrates claim resolution across its compliances
pub struct ResolutionCoordinator;

impl ResolutionCoordinator {
    /// Returns true when every compliance under the claim is terminal
    pub fn can_resolve(compliances: &[Compliance]) -> bool {
        compliances.iter().all(Compliance::is_terminal)
    }

    /// Counts compliances by settlement state
    pub fn summarize(compliances: &[Compliance]) -> SettlementSummary {
        let mut summary = SettlementSummary {
            total: compliances.len(),
            can_resolve: Self::can_resolve(compliances),
            ..SettlementSummary::default()
        };
        for compliance in compliances {
            match compliance.status() {
                _ if compliance.ban_triggered() => summary.rejected += 1,
                ComplianceStatus::Approved => summary.approved += 1,
                ComplianceStatus::Rejected => summary.rejected += 1,
                ComplianceStatus::Submitted => summary.submitted += 1,
                _ => summary.pending += 1,
            }
        }
        summary
    }

    /// Builds the compliances imposed by a verdict
    ///
    /// Each responsible party must be the claimant or the respondent; the
    /// other party becomes the counterpart allowed to peer review.
    pub fn build_compliances(
        claim: &Claim,
        terms: Vec<ComplianceTerms>,
        policy: &EscalationPolicy,
        now: DateTime<Utc>,
    ) -> Result<Vec<Compliance>, DisputeError> {
        if terms.len() > MAX_COMPLIANCES_PER_VERDICT {
            return Err(ValidationError::new(
                "compliances",
                format!("at most {} compliances per verdict", MAX_COMPLIANCES_PER_VERDICT),
            )
            .into());
        }

        terms
            .into_iter()
            .map(|t| {
                let counterpart = claim.counterpart_of(t.responsible_user_id).ok_or_else(|| {
                    ValidationError::new(
                        "responsible_user_id",
                        "must be the claimant or the respondent of the claim",
                    )
                })?;
                Ok(Compliance::impose(
                    claim.id(),
                    t,
                    counterpart,
                    policy.max_attempts,
                    now,
                )?)
            })
            .collect()
    }
}
