//! Claims DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use core_kernel::{HiringId, UserId};
use domain_claims::{ClaimType, NewClaim, PartySide, ResolutionType, ResolveClaim};
use domain_compliance::{ComplianceTerms, ComplianceType};

use super::{into_files, EvidenceFileDto};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClaimRequest {
    pub hiring_id: Uuid,
    pub claimant_side: PartySide,
    pub respondent_id: Uuid,
    pub claim_type: ClaimType,
    #[validate(length(min = 1, max = 30))]
    pub other_reason: Option<String>,
    #[validate(length(min = 50, max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 5), nested)]
    pub evidence: Vec<EvidenceFileDto>,
}

impl From<CreateClaimRequest> for NewClaim {
    fn from(request: CreateClaimRequest) -> Self {
        NewClaim {
            hiring_id: HiringId::from(request.hiring_id),
            claimant_side: request.claimant_side,
            respondent_id: UserId::from(request.respondent_id),
            claim_type: request.claim_type,
            other_reason: request.other_reason,
            description: request.description,
            evidence: into_files(request.evidence),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ObservationsRequest {
    #[validate(length(min = 20, max = 2000))]
    pub observations: String,
}

/// Clarification from the party the observations were addressed to
#[derive(Debug, Deserialize, Validate)]
pub struct ReplyRequest {
    #[validate(length(min = 20, max = 2000))]
    pub clarification_response: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5), nested)]
    pub evidence: Vec<EvidenceFileDto>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ComplianceTermsDto {
    pub responsible_user_id: Uuid,
    pub compliance_type: ComplianceType,
    pub deadline: DateTime<Utc>,
    #[validate(length(min = 20, max = 2000))]
    pub moderator_instructions: String,
}

impl From<ComplianceTermsDto> for ComplianceTerms {
    fn from(dto: ComplianceTermsDto) -> Self {
        ComplianceTerms {
            responsible_user_id: UserId::from(dto.responsible_user_id),
            compliance_type: dto.compliance_type,
            deadline: dto.deadline,
            moderator_instructions: dto.moderator_instructions,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResolveRequest {
    #[validate(length(min = 20, max = 2000))]
    pub resolution: String,
    pub resolution_type: ResolutionType,
    #[serde(default)]
    #[validate(nested)]
    pub compliances: Vec<ComplianceTermsDto>,
}

impl From<ResolveRequest> for ResolveClaim {
    fn from(request: ResolveRequest) -> Self {
        ResolveClaim {
            resolution: request.resolution,
            resolution_type: request.resolution_type,
            compliances: request.compliances.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(min = 20, max = 2000))]
    pub resolution: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CancelRequest {
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}
