//! Core Kernel - Foundational types for the dispute resolution engine
//!
//! This crate provides the building blocks shared by the claim and compliance
//! domains:
//! - Strongly-typed identifiers
//! - Actors, roles and the action vocabulary
//! - Text and evidence validation rules
//! - Time sources for deadline evaluation
//! - Port error types and adapter health reporting

pub mod identifiers;
pub mod actor;
pub mod action;
pub mod validation;
pub mod evidence;
pub mod temporal;
pub mod ports;
pub mod error;

pub use identifiers::{ClaimId, ComplianceId, SubmissionId, UserId, HiringId, EventId};
pub use actor::{Actor, Role};
pub use action::{Action, ActionSet};
pub use validation::{TextRule, char_len};
pub use evidence::{EvidenceFile, validate_evidence};
pub use temporal::{ClockSource, SystemClock, FixedClock, ceil_days};
pub use ports::{PortError, DomainPort, AdapterHealth, HealthCheckResult, HealthCheckable};
pub use error::{CoreError, ErrorKind, ValidationError};
