//! Allowed actions for a claim viewer

use serde::{Deserialize, Serialize};

use core_kernel::{Action, ActionSet, Actor};

use crate::claim::{Claim, ClaimStatus};

/// Relation of a viewer to a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimViewer {
    Moderator,
    Claimant,
    Respondent,
    Outsider,
}

impl ClaimViewer {
    /// Derives the viewer relation of an actor
    pub fn of(claim: &Claim, actor: &Actor) -> Self {
        if actor.is_staff() {
            ClaimViewer::Moderator
        } else if actor.user_id == claim.claimant_id() {
            ClaimViewer::Claimant
        } else if actor.user_id == claim.respondent_id() {
            ClaimViewer::Respondent
        } else {
            ClaimViewer::Outsider
        }
    }
}

/// Computes the actions a viewer may perform on a claim
///
/// Mirrors the guards of the Claim aggregate; an action listed here passes
/// the state and role checks and fails only on payload validation.
pub fn allowed_actions(claim: &Claim, viewer: ClaimViewer) -> ActionSet {
    let mut actions = ActionSet::new();
    if claim.is_terminal() {
        return actions;
    }

    let status = claim.status();
    match viewer {
        ClaimViewer::Moderator => {
            if status == ClaimStatus::Open && claim.moderator_id().is_none() {
                actions.insert(Action::MarkInReview);
            }
            if matches!(status, ClaimStatus::InReview | ClaimStatus::RequiresStaffResponse) {
                actions.insert(Action::AddObservations);
                actions.insert(Action::ResolveClaim);
            }
            actions.insert(Action::RejectClaim);
            actions.insert(Action::CancelClaim);
        }
        ClaimViewer::Claimant => {
            if status == ClaimStatus::PendingClarification {
                actions.insert(Action::SubmitObservations);
            }
            actions.insert(Action::CancelClaim);
        }
        ClaimViewer::Respondent => {
            if status == ClaimStatus::PendingClarification {
                actions.insert(Action::SubmitObservations);
            }
        }
        ClaimViewer::Outsider => {}
    }

    actions
}
