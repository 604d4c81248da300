//! Ports and Adapters Infrastructure
//!
//! Foundational types for the hexagonal layout of the dispute engine. The
//! domain crates define port traits (stores, notification dispatch, account
//! directives, hiring reversal) on top of the marker traits here; adapters in
//! `infra_db`, `interface_api` or test code implement them.
//!
//! ```text
//!              ┌──────────────────────────────┐
//!              │        DisputeService        │
//!              └──────────────────────────────┘
//!                 │                       │
//!                 ▼                       ▼
//!      ┌───────────────────┐   ┌───────────────────────┐
//!      │    Store ports    │   │  Collaborator ports   │
//!      │ (claims, compl.)  │   │ (notify, account, …)  │
//!      └───────────────────┘   └───────────────────────┘
//!          ▲           ▲                 ▲
//!   ┌──────┴─────┐ ┌───┴──────┐   ┌──────┴──────┐
//!   │ PostgreSQL │ │ In-memory│   │ Log / mock  │
//!   └────────────┘ └──────────┘   └─────────────┘
//! ```

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Error type for port operations
///
/// A unified error type that all port implementations use, so the engine
/// handles a database adapter and an in-memory adapter the same way.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The stored version differs from the version the caller loaded
    #[error("Version conflict on {entity_type} {id}: expected {expected}, found {found}")]
    VersionConflict {
        entity_type: String,
        id: String,
        expected: u32,
        found: u32,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The external system is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
    },

    /// A stored record could not be decoded or encoded
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a VersionConflict error
    pub fn version_conflict(
        entity_type: impl Into<String>,
        id: impl fmt::Display,
        expected: u32,
        found: u32,
    ) -> Self {
        PortError::VersionConflict {
            entity_type: entity_type.into(),
            id: id.to_string(),
            expected,
            found,
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::Connection { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error is an optimistic lock conflict
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, PortError::VersionConflict { .. })
    }

    /// Maps the port failure onto the engine's error taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            PortError::NotFound { .. } => ErrorKind::NotFound,
            PortError::VersionConflict { .. } => ErrorKind::ConcurrentModification,
            _ => ErrorKind::Store,
        }
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they are thread-safe and usable
/// behind `Arc<dyn _>` in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
    /// Health status is unknown
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
