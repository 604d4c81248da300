//! Claims Domain
//!
//! This crate implements the claim lifecycle and the engine service that
//! coordinates claims with the compliances imposed by their verdicts.
//!
//! # Claim Lifecycle
//!
//! ```text
//! open -> in_review <-> pending_clarification -> requires_staff_response
//!              |                                          |
//!              +---------> resolved / rejected <----------+
//!
//! any non-terminal state -> cancelled
//! ```
//!
//! A verdict that imposes compliances keeps the claim in review; the
//! moderator resolves it once the compliances settle.

pub mod actions;
pub mod claim;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod memory;
pub mod ports;
pub mod service;
pub mod view;

pub use actions::{allowed_actions, ClaimViewer};
pub use claim::{
    Claim, ClaimStatus, ClaimType, NewClaim, PartySide, ResolutionType, ResolveOutcome,
};
pub use coordinator::{ResolutionCoordinator, SettlementSummary, MAX_COMPLIANCES_PER_VERDICT};
pub use error::{ClaimError, DisputeError};
pub use events::{ClaimEvent, DisputeEvent};
pub use memory::InMemoryDisputeStore;
pub use ports::{
    AccountPort, ClaimStore, ComplianceStore, DisputeStore, HiringPort, NotificationPort,
};
pub use service::{DisputeService, EngineSettings, ResolveClaim, SweepReport};
pub use view::{ClaimView, ComplianceView};
