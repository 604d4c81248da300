//! Domain Adapters
//!
//! Adapter implementations connecting domain ports to PostgreSQL.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresDisputeStore;
//! use domain_claims::DisputeStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn DisputeStore> = Arc::new(PostgresDisputeStore::new(pool));
//! let claim = store.get_claim(claim_id).await?;
//! ```

pub mod disputes;

pub use disputes::PostgresDisputeStore;
