//! Dispute repository implementation
//!
//! Claims and compliances are stored as JSONB documents with a version
//! column. Every write is conditional on the version the caller loaded.

use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use core_kernel::{ClaimId, ComplianceId};
use domain_claims::Claim;
use domain_compliance::Compliance;

use crate::error::DatabaseError;

/// Result of a version-checked write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The row matched the expected version and was replaced
    Applied,
    /// No row with that identifier exists
    Missing,
    /// The row exists with a different version
    Stale { found: u32 },
}

#[derive(Debug, FromRow)]
struct ClaimDocument {
    body: Json<Claim>,
}

#[derive(Debug, FromRow)]
struct ComplianceDocument {
    body: Json<Compliance>,
}

/// Repository for dispute aggregates
#[derive(Debug, Clone)]
pub struct DisputeRepository {
    pool: PgPool,
}

impl DisputeRepository {
    /// Creates a new DisputeRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ========================================================================
    // Claims
    // ========================================================================

    /// Inserts a new claim document
    pub async fn insert_claim(&self, claim: &Claim) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO dispute_claims (
                claim_id, hiring_id, claimant_id, respondent_id,
                status, body, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(Uuid::from(claim.id()))
        .bind(Uuid::from(claim.hiring_id()))
        .bind(Uuid::from(claim.claimant_id()))
        .bind(Uuid::from(claim.respondent_id()))
        .bind(claim.status().as_str())
        .bind(Json(claim))
        .bind(i64::from(claim.version()))
        .bind(claim.created_at())
        .bind(claim.updated_at())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Retrieves a claim by its identifier
    pub async fn get_claim(&self, id: ClaimId) -> Result<Claim, DatabaseError> {
        let row: Option<ClaimDocument> =
            sqlx::query_as("SELECT body FROM dispute_claims WHERE claim_id = $1")
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.body.0)
            .ok_or_else(|| DatabaseError::not_found("Claim", id))
    }

    /// Replaces a claim when the stored version equals `expected_version`
    pub async fn update_claim(
        &self,
        claim: &Claim,
        expected_version: u32,
    ) -> Result<WriteOutcome, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        update_claim_on(&mut conn, claim, expected_version).await
    }

    /// Deletes a claim; its compliances cascade
    pub async fn delete_claim(&self, id: ClaimId) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM dispute_claims WHERE claim_id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    // ========================================================================
    // Compliances
    // ========================================================================

    /// Retrieves a compliance by its identifier
    pub async fn get_compliance(&self, id: ComplianceId) -> Result<Compliance, DatabaseError> {
        let row: Option<ComplianceDocument> =
            sqlx::query_as("SELECT body FROM dispute_compliances WHERE compliance_id = $1")
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| r.body.0)
            .ok_or_else(|| DatabaseError::not_found("Compliance", id))
    }

    /// Lists the compliances of a claim, oldest first
    pub async fn list_compliances(
        &self,
        claim_id: ClaimId,
    ) -> Result<Vec<Compliance>, DatabaseError> {
        let rows: Vec<ComplianceDocument> = sqlx::query_as(
            r#"
            SELECT body FROM dispute_compliances
            WHERE claim_id = $1
            ORDER BY created_at, compliance_id
            "#,
        )
        .bind(Uuid::from(claim_id))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.body.0).collect())
    }

    /// Lists compliances that are not terminal yet
    pub async fn list_open_compliances(&self) -> Result<Vec<Compliance>, DatabaseError> {
        let rows: Vec<ComplianceDocument> = sqlx::query_as(
            r#"
            SELECT body FROM dispute_compliances
            WHERE is_open
            ORDER BY created_at, compliance_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.body.0).collect())
    }

    /// Replaces a compliance when the stored version equals `expected_version`
    pub async fn update_compliance(
        &self,
        compliance: &Compliance,
        expected_version: u32,
    ) -> Result<WriteOutcome, DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE dispute_compliances
            SET status = $2, is_open = $3, body = $4, version = $5, updated_at = $6
            WHERE compliance_id = $1 AND version = $7
            "#,
        )
        .bind(Uuid::from(compliance.id()))
        .bind(compliance.status().as_str())
        .bind(!compliance.is_terminal())
        .bind(Json(compliance))
        .bind(i64::from(compliance.version()))
        .bind(compliance.updated_at())
        .bind(i64::from(expected_version))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(WriteOutcome::Applied);
        }

        let mut conn = self.pool.acquire().await?;
        stored_version(
            &mut conn,
            "SELECT version FROM dispute_compliances WHERE compliance_id = $1",
            Uuid::from(compliance.id()),
        )
        .await
    }

    // ========================================================================
    // Verdicts
    // ========================================================================

    /// Updates the claim and inserts its new compliances in one transaction
    ///
    /// Nothing is written unless the claim update applies.
    pub async fn commit_verdict(
        &self,
        claim: &Claim,
        expected_version: u32,
        compliances: &[Compliance],
    ) -> Result<WriteOutcome, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let outcome = update_claim_on(&mut *tx, claim, expected_version).await?;
        if outcome != WriteOutcome::Applied {
            tx.rollback().await?;
            return Ok(outcome);
        }

        for compliance in compliances {
            sqlx::query(
                r#"
                INSERT INTO dispute_compliances (
                    compliance_id, claim_id, responsible_user_id, status,
                    is_open, body, version, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(Uuid::from(compliance.id()))
            .bind(Uuid::from(compliance.claim_id()))
            .bind(Uuid::from(compliance.responsible_user_id()))
            .bind(compliance.status().as_str())
            .bind(!compliance.is_terminal())
            .bind(Json(compliance))
            .bind(i64::from(compliance.version()))
            .bind(compliance.created_at())
            .bind(compliance.updated_at())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(WriteOutcome::Applied)
    }
}

async fn update_claim_on(
    conn: &mut PgConnection,
    claim: &Claim,
    expected_version: u32,
) -> Result<WriteOutcome, DatabaseError> {
    let result = sqlx::query(
        r#"
        UPDATE dispute_claims
        SET status = $2, body = $3, version = $4, updated_at = $5
        WHERE claim_id = $1 AND version = $6
        "#,
    )
    .bind(Uuid::from(claim.id()))
    .bind(claim.status().as_str())
    .bind(Json(claim))
    .bind(i64::from(claim.version()))
    .bind(claim.updated_at())
    .bind(i64::from(expected_version))
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        return Ok(WriteOutcome::Applied);
    }
    stored_version(
        conn,
        "SELECT version FROM dispute_claims WHERE claim_id = $1",
        Uuid::from(claim.id()),
    )
    .await
}

/// Explains a write that matched no row
async fn stored_version(
    conn: &mut PgConnection,
    sql: &'static str,
    id: Uuid,
) -> Result<WriteOutcome, DatabaseError> {
    let found: Option<i64> = sqlx::query_scalar(sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match found {
        None => Ok(WriteOutcome::Missing),
        Some(version) => u32::try_from(version)
            .map(|found| WriteOutcome::Stale { found })
            .map_err(|_| {
                DatabaseError::SerializationError(format!("version {} out of range", version))
            }),
    }
}
