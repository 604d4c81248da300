//! Compliance DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::ComplianceId;
use domain_claims::SweepReport;
use domain_compliance::{OverdueStatus, ReviewDecision};

use super::EvidenceFileDto;

#[derive(Debug, Deserialize, Validate)]
pub struct EvidenceRequest {
    #[validate(length(min = 1, max = 5), nested)]
    pub evidence: Vec<EvidenceFileDto>,
    #[validate(length(min = 20, max = 1000))]
    pub user_notes: String,
}

/// Counterpart verdict on the latest submission
#[derive(Debug, Deserialize, Validate)]
pub struct PeerReviewRequest {
    pub approved: bool,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct PeerApproveRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PeerObjectRequest {
    #[validate(length(min = 20, max = 500))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    #[validate(length(min = 20, max = 1000))]
    pub moderator_notes: String,
}

#[derive(Debug, Serialize)]
pub struct AdvancedCompliance {
    pub compliance_id: ComplianceId,
    pub overdue_status: OverdueStatus,
}

#[derive(Debug, Serialize)]
pub struct FailedCompliance {
    pub compliance_id: ComplianceId,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub evaluated: usize,
    pub advanced: Vec<AdvancedCompliance>,
    pub failed: Vec<FailedCompliance>,
}

impl From<SweepReport> for SweepResponse {
    fn from(report: SweepReport) -> Self {
        Self {
            evaluated: report.evaluated,
            advanced: report
                .advanced
                .into_iter()
                .map(|(compliance_id, overdue_status)| AdvancedCompliance {
                    compliance_id,
                    overdue_status,
                })
                .collect(),
            failed: report
                .failed
                .into_iter()
                .map(|(compliance_id, error)| FailedCompliance {
                    compliance_id,
                    error,
                })
                .collect(),
        }
    }
}
