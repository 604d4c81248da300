//! PostgreSQL Dispute Adapter
//!
//! Implements the dispute domain's storage ports on top of
//! [`DisputeRepository`].
//!
//! Database errors are translated to `PortError` variants:
//! - a version mismatch -> `PortError::VersionConflict`
//! - a missing row -> `PortError::NotFound`
//! - constraint violations -> `PortError::Conflict`
//! - connection failures -> `PortError::Connection`
//! - other errors -> `PortError::Internal`

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, ClaimId, ComplianceId, DomainPort, HealthCheckResult, HealthCheckable,
    PortError,
};
use domain_claims::{Claim, ClaimStore, ComplianceStore, DisputeStore};
use domain_compliance::Compliance;

use crate::repositories::{DisputeRepository, WriteOutcome};

/// PostgreSQL-backed implementation of the `DisputeStore` port
#[derive(Debug, Clone)]
pub struct PostgresDisputeStore {
    repository: DisputeRepository,
}

impl PostgresDisputeStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: DisputeRepository::new(pool),
        }
    }

    /// Returns the underlying repository
    pub fn repository(&self) -> &DisputeRepository {
        &self.repository
    }
}

fn check_write(
    outcome: WriteOutcome,
    entity_type: &str,
    id: impl std::fmt::Display,
    expected: u32,
) -> Result<(), PortError> {
    match outcome {
        WriteOutcome::Applied => Ok(()),
        WriteOutcome::Missing => Err(PortError::not_found(entity_type, id)),
        WriteOutcome::Stale { found } => {
            debug!(entity_type, %id, expected, found, "version-checked write refused");
            Err(PortError::version_conflict(entity_type, id, expected, found))
        }
    }
}

fn lookup_error(
    entity_type: &str,
    id: impl std::fmt::Display,
    e: crate::DatabaseError,
) -> PortError {
    if e.is_not_found() {
        PortError::not_found(entity_type, id)
    } else {
        e.into()
    }
}

impl DomainPort for PostgresDisputeStore {}

#[async_trait]
impl HealthCheckable for PostgresDisputeStore {
    /// Performs a `SELECT 1` round trip
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(self.repository.pool())
            .await;

        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-dispute-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-dispute-store".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl ClaimStore for PostgresDisputeStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.id()))]
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
        self.repository.insert_claim(claim).await.map_err(Into::into)
    }

    #[instrument(skip(self))]
    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        self.repository
            .get_claim(id)
            .await
            .map_err(|e| lookup_error("Claim", id, e))
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id()))]
    async fn update_claim(&self, claim: &Claim, expected_version: u32) -> Result<(), PortError> {
        let outcome = self.repository.update_claim(claim, expected_version).await?;
        check_write(outcome, "Claim", claim.id(), expected_version)
    }

    #[instrument(skip(self))]
    async fn delete_claim(&self, id: ClaimId) -> Result<(), PortError> {
        if !self.repository.delete_claim(id).await? {
            return Err(PortError::not_found("Claim", id));
        }
        Ok(())
    }
}

#[async_trait]
impl ComplianceStore for PostgresDisputeStore {
    #[instrument(skip(self))]
    async fn get_compliance(&self, id: ComplianceId) -> Result<Compliance, PortError> {
        self.repository
            .get_compliance(id)
            .await
            .map_err(|e| lookup_error("Compliance", id, e))
    }

    #[instrument(skip(self))]
    async fn list_compliances(&self, claim_id: ClaimId) -> Result<Vec<Compliance>, PortError> {
        Ok(self.repository.list_compliances(claim_id).await?)
    }

    async fn list_open_compliances(&self) -> Result<Vec<Compliance>, PortError> {
        Ok(self.repository.list_open_compliances().await?)
    }

    #[instrument(skip(self, compliance), fields(compliance_id = %compliance.id()))]
    async fn update_compliance(
        &self,
        compliance: &Compliance,
        expected_version: u32,
    ) -> Result<(), PortError> {
        let outcome = self
            .repository
            .update_compliance(compliance, expected_version)
            .await?;
        check_write(outcome, "Compliance", compliance.id(), expected_version)
    }
}

#[async_trait]
impl DisputeStore for PostgresDisputeStore {
    #[instrument(
        skip(self, claim, compliances),
        fields(claim_id = %claim.id(), compliances = compliances.len())
    )]
    async fn commit_verdict(
        &self,
        claim: &Claim,
        expected_version: u32,
        compliances: &[Compliance],
    ) -> Result<(), PortError> {
        let outcome = self
            .repository
            .commit_verdict(claim, expected_version, compliances)
            .await?;
        check_write(outcome, "Claim", claim.id(), expected_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ErrorKind;

    #[test]
    fn test_stale_write_is_a_version_conflict() {
        let err =
            check_write(WriteOutcome::Stale { found: 4 }, "Claim", ClaimId::new(), 3).unwrap_err();
        assert!(err.is_version_conflict());
        assert_eq!(err.kind(), ErrorKind::ConcurrentModification);
    }

    #[test]
    fn test_missing_row_is_not_found() {
        let err =
            check_write(WriteOutcome::Missing, "Compliance", ComplianceId::new(), 1).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_applied_write_passes() {
        assert!(check_write(WriteOutcome::Applied, "Claim", ClaimId::new(), 1).is_ok());
    }

    #[test]
    fn test_lookup_miss_names_the_entity() {
        let id = ClaimId::new();
        let err = lookup_error("Claim", id, crate::DatabaseError::not_found("Claim", id));
        match err {
            PortError::NotFound { entity_type, id: found } => {
                assert_eq!(entity_type, "Claim");
                assert_eq!(found, id.to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
