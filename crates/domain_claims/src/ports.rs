//! Dispute Domain Ports
//!
//! Port traits for everything the engine needs from outside the domain:
//! aggregate storage and the three collaborators (notification dispatch,
//! account directives, hiring reversal).
//!
//! # Adapters
//!
//! - **PostgreSQL**: `infra_db::PostgresDisputeStore`
//! - **In-memory**: [`crate::memory::InMemoryDisputeStore`]
//! - **Logging**: [`logging`] collaborators that only trace what they receive
//! - **Mock**: [`mock`] collaborators that record calls for assertions
//!
//! # Concurrency
//!
//! Every update carries the version the caller loaded. A store must refuse
//! the write with `PortError::VersionConflict` when the stored version
//! differs, and must commit a verdict (claim update plus new compliances)
//! atomically.

use async_trait::async_trait;

use core_kernel::{
    ClaimId, ComplianceId, DomainPort, HealthCheckable, HiringId, PortError,
};
use domain_compliance::{AccountDirective, Compliance};

use crate::claim::Claim;
use crate::events::DisputeEvent;

/// Claim persistence
#[async_trait]
pub trait ClaimStore: DomainPort + HealthCheckable {
    /// Inserts a new claim
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Retrieves a claim by ID
    ///
    /// # Returns
    ///
    /// The claim if found, or `PortError::NotFound`
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError>;

    /// Replaces a claim if the stored version equals `expected_version`
    async fn update_claim(&self, claim: &Claim, expected_version: u32) -> Result<(), PortError>;

    /// Deletes a claim together with its compliances
    async fn delete_claim(&self, id: ClaimId) -> Result<(), PortError>;
}

/// Compliance persistence
#[async_trait]
pub trait ComplianceStore: DomainPort + HealthCheckable {
    /// Retrieves a compliance by ID
    async fn get_compliance(&self, id: ComplianceId) -> Result<Compliance, PortError>;

    /// Lists the compliances of a claim, oldest first
    async fn list_compliances(&self, claim_id: ClaimId) -> Result<Vec<Compliance>, PortError>;

    /// Lists compliances still subject to deadline evaluation
    async fn list_open_compliances(&self) -> Result<Vec<Compliance>, PortError>;

    /// Replaces a compliance if the stored version equals `expected_version`
    async fn update_compliance(
        &self,
        compliance: &Compliance,
        expected_version: u32,
    ) -> Result<(), PortError>;
}

/// Combined store with the atomic verdict commit
#[async_trait]
pub trait DisputeStore: ClaimStore + ComplianceStore {
    /// Updates the claim and inserts the imposed compliances in one unit
    ///
    /// Nothing is written when the claim version check fails.
    async fn commit_verdict(
        &self,
        claim: &Claim,
        expected_version: u32,
        compliances: &[Compliance],
    ) -> Result<(), PortError>;
}

/// Notification dispatch, called for every committed transition
#[async_trait]
pub trait NotificationPort: DomainPort {
    async fn notify(&self, event: &DisputeEvent) -> Result<(), PortError>;
}

/// Account/identity service honoring suspensions and bans platform-wide
#[async_trait]
pub trait AccountPort: DomainPort {
    async fn apply_directive(&self, directive: &AccountDirective) -> Result<(), PortError>;
}

/// Hiring/service state owner
#[async_trait]
pub trait HiringPort: DomainPort {
    /// Reverts the hiring to its state before the claim was raised
    async fn revert_hiring(&self, hiring_id: HiringId, claim_id: ClaimId) -> Result<(), PortError>;
}

/// Collaborators that trace what they receive and never fail
pub mod logging {
    use super::*;

    /// Traces every event at info level
    #[derive(Debug, Default, Clone)]
    pub struct LoggingNotifier;

    impl DomainPort for LoggingNotifier {}

    #[async_trait]
    impl NotificationPort for LoggingNotifier {
        async fn notify(&self, event: &DisputeEvent) -> Result<(), PortError> {
            tracing::info!(
                claim_id = %event.claim_id(),
                event_type = event.event_type(),
                "dispute notification"
            );
            Ok(())
        }
    }

    /// Traces account directives at warn level
    #[derive(Debug, Default, Clone)]
    pub struct LoggingAccountPort;

    impl DomainPort for LoggingAccountPort {}

    #[async_trait]
    impl AccountPort for LoggingAccountPort {
        async fn apply_directive(&self, directive: &AccountDirective) -> Result<(), PortError> {
            tracing::warn!(user_id = %directive.user_id(), ?directive, "account directive issued");
            Ok(())
        }
    }

    /// Traces hiring reversals at info level
    #[derive(Debug, Default, Clone)]
    pub struct LoggingHiringPort;

    impl DomainPort for LoggingHiringPort {}

    #[async_trait]
    impl HiringPort for LoggingHiringPort {
        async fn revert_hiring(
            &self,
            hiring_id: HiringId,
            claim_id: ClaimId,
        ) -> Result<(), PortError> {
            tracing::info!(%hiring_id, %claim_id, "hiring reverted after claim rejection");
            Ok(())
        }
    }
}

/// Recording collaborators for testing
///
/// Each mock keeps what it receives behind a `tokio::sync::RwLock` so tests
/// can assert on dispatched events and directives.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Records every notified event
    #[derive(Debug, Default, Clone)]
    pub struct RecordingNotifier {
        events: Arc<RwLock<Vec<DisputeEvent>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn events(&self) -> Vec<DisputeEvent> {
            self.events.read().await.clone()
        }

        /// Returns the event type names in dispatch order
        pub async fn event_types(&self) -> Vec<&'static str> {
            self.events.read().await.iter().map(|e| e.event_type()).collect()
        }

        pub async fn clear(&self) {
            self.events.write().await.clear();
        }
    }

    impl DomainPort for RecordingNotifier {}

    #[async_trait]
    impl NotificationPort for RecordingNotifier {
        async fn notify(&self, event: &DisputeEvent) -> Result<(), PortError> {
            self.events.write().await.push(event.clone());
            Ok(())
        }
    }

    /// Records account directives
    #[derive(Debug, Default, Clone)]
    pub struct RecordingAccountPort {
        directives: Arc<RwLock<Vec<AccountDirective>>>,
    }

    impl RecordingAccountPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn directives(&self) -> Vec<AccountDirective> {
            self.directives.read().await.clone()
        }
    }

    impl DomainPort for RecordingAccountPort {}

    #[async_trait]
    impl AccountPort for RecordingAccountPort {
        async fn apply_directive(&self, directive: &AccountDirective) -> Result<(), PortError> {
            self.directives.write().await.push(directive.clone());
            Ok(())
        }
    }

    /// Records hiring reversals
    #[derive(Debug, Default, Clone)]
    pub struct RecordingHiringPort {
        reverted: Arc<RwLock<Vec<(HiringId, ClaimId)>>>,
    }

    impl RecordingHiringPort {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn reverted(&self) -> Vec<(HiringId, ClaimId)> {
            self.reverted.read().await.clone()
        }
    }

    impl DomainPort for RecordingHiringPort {}

    #[async_trait]
    impl HiringPort for RecordingHiringPort {
        async fn revert_hiring(
            &self,
            hiring_id: HiringId,
            claim_id: ClaimId,
        ) -> Result<(), PortError> {
            self.reverted.write().await.push((hiring_id, claim_id));
            Ok(())
        }
    }

    /// Account service that is always down
    #[derive(Debug, Default, Clone)]
    pub struct UnavailableAccountPort;

    impl DomainPort for UnavailableAccountPort {}

    #[async_trait]
    impl AccountPort for UnavailableAccountPort {
        async fn apply_directive(&self, _directive: &AccountDirective) -> Result<(), PortError> {
            Err(PortError::ServiceUnavailable {
                service: "accounts".to_string(),
            })
        }
    }
}
