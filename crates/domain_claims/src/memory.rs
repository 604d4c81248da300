//! In-memory dispute store
//!
//! Backs the `memory` store backend and the test suites. Claims and
//! compliances share one lock so a verdict commit is atomic.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    AdapterHealth, ClaimId, ComplianceId, DomainPort, HealthCheckResult, HealthCheckable,
    PortError,
};
use domain_compliance::Compliance;

use crate::claim::Claim;
use crate::ports::{ClaimStore, ComplianceStore, DisputeStore};

#[derive(Debug, Default)]
struct Tables {
    claims: HashMap<ClaimId, Claim>,
    compliances: HashMap<ComplianceId, Compliance>,
}

/// Dispute store kept in process memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryDisputeStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDisputeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored claims
    pub async fn claim_count(&self) -> usize {
        self.tables.read().await.claims.len()
    }

    /// Number of stored compliances
    pub async fn compliance_count(&self) -> usize {
        self.tables.read().await.compliances.len()
    }
}

fn check_version(
    entity_type: &str,
    id: impl std::fmt::Display,
    stored: u32,
    expected: u32,
) -> Result<(), PortError> {
    if stored != expected {
        return Err(PortError::version_conflict(entity_type, id, expected, stored));
    }
    Ok(())
}

impl DomainPort for InMemoryDisputeStore {}

#[async_trait]
impl HealthCheckable for InMemoryDisputeStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult {
            adapter_id: "memory-dispute-store".to_string(),
            status: AdapterHealth::Healthy,
            latency_ms: 0,
            message: Some("In-memory store always healthy".to_string()),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl ClaimStore for InMemoryDisputeStore {
    async fn insert_claim(&self, claim: &Claim) -> Result<(), PortError> {
        let mut tables = self.tables.write().await;
        if tables.claims.contains_key(&claim.id()) {
            return Err(PortError::Conflict {
                message: format!("claim {} already exists", claim.id()),
            });
        }
        tables.claims.insert(claim.id(), claim.clone());
        Ok(())
    }

    async fn get_claim(&self, id: ClaimId) -> Result<Claim, PortError> {
        self.tables
            .read()
            .await
            .claims
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Claim", id))
    }

    async fn update_claim(&self, claim: &Claim, expected_version: u32) -> Result<(), PortError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .claims
            .get_mut(&claim.id())
            .ok_or_else(|| PortError::not_found("Claim", claim.id()))?;
        check_version("Claim", claim.id(), stored.version(), expected_version)?;
        *stored = claim.clone();
        Ok(())
    }

    async fn delete_claim(&self, id: ClaimId) -> Result<(), PortError> {
        let mut tables = self.tables.write().await;
        if tables.claims.remove(&id).is_none() {
            return Err(PortError::not_found("Claim", id));
        }
        tables.compliances.retain(|_, c| c.claim_id() != id);
        Ok(())
    }
}

#[async_trait]
impl ComplianceStore for InMemoryDisputeStore {
    async fn get_compliance(&self, id: ComplianceId) -> Result<Compliance, PortError> {
        self.tables
            .read()
            .await
            .compliances
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Compliance", id))
    }

    async fn list_compliances(&self, claim_id: ClaimId) -> Result<Vec<Compliance>, PortError> {
        let tables = self.tables.read().await;
        let mut compliances: Vec<_> = tables
            .compliances
            .values()
            .filter(|c| c.claim_id() == claim_id)
            .cloned()
            .collect();
        compliances.sort_by_key(|c| (c.created_at(), c.id()));
        Ok(compliances)
    }

    async fn list_open_compliances(&self) -> Result<Vec<Compliance>, PortError> {
        let tables = self.tables.read().await;
        let mut compliances: Vec<_> = tables
            .compliances
            .values()
            .filter(|c| !c.is_terminal())
            .cloned()
            .collect();
        compliances.sort_by_key(|c| (c.created_at(), c.id()));
        Ok(compliances)
    }

    async fn update_compliance(
        &self,
        compliance: &Compliance,
        expected_version: u32,
    ) -> Result<(), PortError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .compliances
            .get_mut(&compliance.id())
            .ok_or_else(|| PortError::not_found("Compliance", compliance.id()))?;
        check_version("Compliance", compliance.id(), stored.version(), expected_version)?;
        *stored = compliance.clone();
        Ok(())
    }
}

#[async_trait]
impl DisputeStore for InMemoryDisputeStore {
    async fn commit_verdict(
        &self,
        claim: &Claim,
        expected_version: u32,
        compliances: &[Compliance],
    ) -> Result<(), PortError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .claims
            .get(&claim.id())
            .ok_or_else(|| PortError::not_found("Claim", claim.id()))?;
        check_version("Claim", claim.id(), stored.version(), expected_version)?;
        let duplicate = compliances
            .iter()
            .find(|c| tables.compliances.contains_key(&c.id()));
        if let Some(existing) = duplicate {
            return Err(PortError::Conflict {
                message: format!("compliance {} already exists", existing.id()),
            });
        }

        tables.claims.insert(claim.id(), claim.clone());
        for compliance in compliances {
            tables.compliances.insert(compliance.id(), compliance.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimType, NewClaim, PartySide};
    use core_kernel::{Actor, HiringId, UserId};

    fn claim() -> Claim {
        let claimant = Actor::user(UserId::new(), "client@example.com");
        let new = NewClaim {
            hiring_id: HiringId::new(),
            claimant_side: PartySide::Client,
            respondent_id: UserId::new(),
            claim_type: ClaimType::PoorQuality,
            other_reason: None,
            description: "The delivered website is missing the checkout and the admin panel."
                .to_string(),
            evidence: vec![],
        };
        Claim::open(&claimant, new, Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn test_stale_update_is_refused() {
        let store = InMemoryDisputeStore::new();
        let claim = claim();
        store.insert_claim(&claim).await.unwrap();

        let moderator = Actor::moderator(UserId::new(), "mod@example.com");
        let mut first = store.get_claim(claim.id()).await.unwrap();
        let mut second = first.clone();

        first.mark_in_review(&moderator, Utc::now()).unwrap();
        store.update_claim(&first, 1).await.unwrap();

        second.cancel(&moderator, None, Utc::now()).unwrap();
        let err = store.update_claim(&second, 1).await.unwrap_err();
        assert!(err.is_version_conflict());
    }

    #[tokio::test]
    async fn test_missing_claim_is_not_found() {
        let store = InMemoryDisputeStore::new();
        let err = store.get_claim(ClaimId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
