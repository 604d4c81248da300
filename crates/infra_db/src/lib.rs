//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the dispute engine using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: [`repositories::DisputeRepository`]
//! owns the SQL, and [`adapters::PostgresDisputeStore`] implements the
//! domain's `DisputeStore` port on top of it.
//!
//! # Storage Model
//!
//! Each aggregate is stored as a JSONB document next to a `version` column.
//! Updates only apply when the stored version equals the version the caller
//! loaded, so concurrent writers never overwrite each other silently.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresDisputeStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/disputes")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresDisputeStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use repositories::{DisputeRepository, WriteOutcome};
pub use adapters::PostgresDisputeStore;
