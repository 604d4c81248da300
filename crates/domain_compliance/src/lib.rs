//! Compliance Domain - Moderator-imposed commitments and their escalation
//!
//! This crate owns one compliance commitment's lifecycle:
//! - Evidence submission and the append-only submission history
//! - Advisory peer review by the counterpart
//! - Moderator review with rejection-based escalation
//! - Deadline evaluation with fixed grace windows
//! - Allowed actions per viewer

pub mod compliance;
pub mod deadline;
pub mod escalation;
pub mod peer_review;
pub mod actions;
pub mod events;
pub mod error;

pub use compliance::{
    Compliance, ComplianceStatus, ComplianceTerms, ComplianceType, ModeratorReviewRecord,
    ReviewDecision, ReviewOutcome, Submission,
};
pub use deadline::{evaluate_deadline, DeadlineEvaluation, DeadlinePolicy, OverdueStatus};
pub use escalation::{
    AccountDirective, Consequence, EscalationOutcome, EscalationPolicy, EscalationRule,
    EscalationSource,
};
pub use peer_review::{PeerReviewGate, PeerReviewRecord};
pub use actions::{allowed_actions, ComplianceViewer};
pub use events::ComplianceEvent;
pub use error::ComplianceError;
