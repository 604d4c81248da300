//! Compliance handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Actor, ComplianceId};
use domain_claims::ComplianceView;

use crate::dto::compliances::*;
use crate::dto::into_files;
use crate::{error::ApiError, AppState};

/// Gets a compliance, applying any overdue stage that has come due
pub async fn get_compliance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ComplianceView>, ApiError> {
    Ok(Json(
        state
            .service
            .get_compliance(&actor, ComplianceId::from(id))
            .await?,
    ))
}

/// Evidence upload by the responsible party; served on `evidence` and `upload`
pub async fn submit_evidence(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<EvidenceRequest>,
) -> Result<Json<ComplianceView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .submit_compliance_evidence(
            &actor,
            ComplianceId::from(id),
            into_files(request.evidence),
            &request.user_notes,
        )
        .await?;
    Ok(Json(view))
}

pub async fn peer_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<PeerReviewRequest>,
) -> Result<Json<ComplianceView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .peer_review(
            &actor,
            ComplianceId::from(id),
            request.approved,
            request.reason.as_deref(),
        )
        .await?;
    Ok(Json(view))
}

pub async fn peer_approve(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    body: Option<Json<PeerApproveRequest>>,
) -> Result<Json<ComplianceView>, ApiError> {
    let Json(request) = body.unwrap_or_default();
    request.validate()?;
    let view = state
        .service
        .peer_approve(&actor, ComplianceId::from(id), request.reason.as_deref())
        .await?;
    Ok(Json(view))
}

pub async fn peer_object(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<PeerObjectRequest>,
) -> Result<Json<ComplianceView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .peer_object(&actor, ComplianceId::from(id), &request.reason)
        .await?;
    Ok(Json(view))
}

/// Moderator decision on the latest submission
pub async fn review_compliance(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ComplianceView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .review_compliance(
            &actor,
            ComplianceId::from(id),
            request.decision,
            &request.moderator_notes,
        )
        .await?;
    Ok(Json(view))
}
