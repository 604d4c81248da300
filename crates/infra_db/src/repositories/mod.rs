//! Repository implementations
//!
//! Repositories own the SQL. They speak in aggregates and `DatabaseError`;
//! translation to port errors happens in the adapters.

pub mod disputes;

pub use disputes::{DisputeRepository, WriteOutcome};
