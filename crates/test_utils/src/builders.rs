//! Test Data Builders
//!
//! Builders for claim and compliance inputs with valid defaults, so tests
//! only spell out the fields they care about.

use chrono::{DateTime, Utc};

use core_kernel::{Actor, ClaimId, EvidenceFile, HiringId, UserId};
use domain_claims::{Claim, ClaimError, ClaimType, NewClaim, PartySide};
use domain_compliance::{Compliance, ComplianceError, ComplianceTerms, ComplianceType};

use crate::fixtures::{EvidenceFixtures, TemporalFixtures, TextFixtures};

/// Builder for [`NewClaim`]
#[derive(Debug, Clone)]
pub struct NewClaimBuilder {
    hiring_id: HiringId,
    claimant_side: PartySide,
    respondent_id: UserId,
    claim_type: ClaimType,
    other_reason: Option<String>,
    description: String,
    evidence: Vec<EvidenceFile>,
}

impl NewClaimBuilder {
    /// Creates a client-side claim against `respondent`
    pub fn against(respondent: &Actor) -> Self {
        Self {
            hiring_id: HiringId::new(),
            claimant_side: PartySide::Client,
            respondent_id: respondent.user_id,
            claim_type: ClaimType::IncompleteWork,
            other_reason: None,
            description: TextFixtures::description().to_string(),
            evidence: vec![EvidenceFixtures::pdf()],
        }
    }

    pub fn with_hiring_id(mut self, id: HiringId) -> Self {
        self.hiring_id = id;
        self
    }

    /// Sets the claim type and the matching side
    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = claim_type;
        if let Some(side) = claim_type.side() {
            self.claimant_side = side;
        }
        self
    }

    /// Sets an `other` claim with a free-text reason
    pub fn with_other_reason(mut self, reason: impl Into<String>) -> Self {
        self.claim_type = ClaimType::Other;
        self.other_reason = Some(reason.into());
        self
    }

    pub fn with_side(mut self, side: PartySide) -> Self {
        self.claimant_side = side;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_evidence(mut self, evidence: Vec<EvidenceFile>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn build(self) -> NewClaim {
        NewClaim {
            hiring_id: self.hiring_id,
            claimant_side: self.claimant_side,
            respondent_id: self.respondent_id,
            claim_type: self.claim_type,
            other_reason: self.other_reason,
            description: self.description,
            evidence: self.evidence,
        }
    }

    /// Opens the claim as `claimant`
    pub fn open(self, claimant: &Actor, now: DateTime<Utc>) -> Result<Claim, ClaimError> {
        Claim::open(claimant, self.build(), now)
    }
}

/// Builder for [`ComplianceTerms`]
#[derive(Debug, Clone)]
pub struct ComplianceTermsBuilder {
    responsible_user_id: UserId,
    compliance_type: ComplianceType,
    deadline: DateTime<Utc>,
    moderator_instructions: String,
}

impl ComplianceTermsBuilder {
    /// Terms for `responsible` due five days after the reference instant
    pub fn for_party(responsible: &Actor) -> Self {
        Self {
            responsible_user_id: responsible.user_id,
            compliance_type: ComplianceType::DeliverWork,
            deadline: TemporalFixtures::deadline_in(5),
            moderator_instructions: TextFixtures::instructions().to_string(),
        }
    }

    pub fn with_type(mut self, compliance_type: ComplianceType) -> Self {
        self.compliance_type = compliance_type;
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.moderator_instructions = instructions.into();
        self
    }

    pub fn build(self) -> ComplianceTerms {
        ComplianceTerms {
            responsible_user_id: self.responsible_user_id,
            compliance_type: self.compliance_type,
            deadline: self.deadline,
            moderator_instructions: self.moderator_instructions,
        }
    }

    /// Imposes the compliance directly, outside any claim flow
    pub fn impose(
        self,
        claim_id: ClaimId,
        counterpart: &Actor,
        max_attempts: u32,
        now: DateTime<Utc>,
    ) -> Result<Compliance, ComplianceError> {
        Compliance::impose(claim_id, self.build(), counterpart.user_id, max_attempts, now)
    }
}
