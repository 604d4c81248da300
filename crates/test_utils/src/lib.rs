//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! dispute engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built actors, payload texts and evidence files
//! - `builders`: Builder patterns for claims and compliance terms
//! - `database`: Database test helpers and container management
//! - `assertions`: Assertion helpers for error kinds, statuses and actions
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
