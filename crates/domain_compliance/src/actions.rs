//! Allowed actions for a compliance viewer
//!
//! Derived from the compliance state on every response; never stored.

use serde::{Deserialize, Serialize};

use core_kernel::{Action, ActionSet, Actor};

use crate::compliance::{Compliance, ComplianceStatus};

/// Relation of a viewer to a compliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceViewer {
    Moderator,
    Responsible,
    Counterpart,
    Outsider,
}

impl ComplianceViewer {
    /// Derives the viewer relation of an actor
    pub fn of(compliance: &Compliance, actor: &Actor) -> Self {
        if actor.is_staff() {
            ComplianceViewer::Moderator
        } else if actor.user_id == compliance.responsible_user_id() {
            ComplianceViewer::Responsible
        } else if actor.user_id == compliance.counterpart_user_id() {
            ComplianceViewer::Counterpart
        } else {
            ComplianceViewer::Outsider
        }
    }
}

/// Computes the actions a viewer may perform on a compliance
pub fn allowed_actions(compliance: &Compliance, viewer: ComplianceViewer) -> ActionSet {
    let mut actions = ActionSet::new();
    if compliance.is_terminal() {
        return actions;
    }

    match (compliance.status(), viewer) {
        (ComplianceStatus::Pending, ComplianceViewer::Responsible)
            if compliance.can_still_submit() =>
        {
            actions.insert(Action::SubmitComplianceEvidence);
        }
        (ComplianceStatus::Submitted, ComplianceViewer::Counterpart) => {
            actions.insert(Action::PeerApprove);
            actions.insert(Action::PeerObject);
        }
        (ComplianceStatus::Submitted, ComplianceViewer::Moderator) => {
            actions.insert(Action::ReviewCompliance);
        }
        _ => {}
    }

    actions
}
