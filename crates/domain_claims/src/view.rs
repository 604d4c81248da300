//! Response views
//!
//! Every engine action answers with the updated aggregate and the actions
//! the calling viewer may take next, so callers never refetch.

use serde::Serialize;

use core_kernel::{ActionSet, Actor};
use domain_compliance::{Compliance, ComplianceStatus, ComplianceViewer};

use crate::actions::{self, ClaimViewer};
use crate::claim::Claim;
use crate::coordinator::{ResolutionCoordinator, SettlementSummary};

/// A compliance as seen by one viewer
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceView {
    #[serde(flatten)]
    pub compliance: Compliance,
    /// Status with the overdue overlays applied
    pub display_status: ComplianceStatus,
    pub viewer: ComplianceViewer,
    pub available_actions: ActionSet,
}

impl ComplianceView {
    pub fn new(compliance: Compliance, actor: &Actor) -> Self {
        let viewer = ComplianceViewer::of(&compliance, actor);
        Self {
            display_status: compliance.display_status(),
            available_actions: domain_compliance::allowed_actions(&compliance, viewer),
            viewer,
            compliance,
        }
    }
}

/// A claim with its compliances as seen by one viewer
#[derive(Debug, Clone, Serialize)]
pub struct ClaimView {
    #[serde(flatten)]
    pub claim: Claim,
    pub viewer: ClaimViewer,
    pub compliances: Vec<ComplianceView>,
    pub settlement: SettlementSummary,
    pub available_actions: ActionSet,
}

impl ClaimView {
    pub fn new(claim: Claim, compliances: Vec<Compliance>, actor: &Actor) -> Self {
        let viewer = ClaimViewer::of(&claim, actor);
        let settlement = ResolutionCoordinator::summarize(&compliances);
        Self {
            available_actions: actions::allowed_actions(&claim, viewer),
            viewer,
            settlement,
            compliances: compliances
                .into_iter()
                .map(|c| ComplianceView::new(c, actor))
                .collect(),
            claim,
        }
    }
}
