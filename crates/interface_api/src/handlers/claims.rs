//! Claims handlers
//!
//! Every handler answers with the updated claim as the caller sees it,
//! including the actions the caller may take next.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Actor, ClaimId};
use domain_claims::{ClaimView, ComplianceView};

use crate::dto::claims::*;
use crate::dto::into_files;
use crate::{error::ApiError, AppState};

/// Opens a claim; the caller becomes the claimant
pub async fn create_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(request): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ClaimView>), ApiError> {
    request.validate()?;
    let view = state.service.create_claim(&actor, request.into()).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Gets a claim with its compliances
pub async fn get_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimView>, ApiError> {
    Ok(Json(state.service.get_claim(&actor, ClaimId::from(id)).await?))
}

/// Lists the compliances imposed on a claim
pub async fn list_compliances(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ComplianceView>>, ApiError> {
    Ok(Json(
        state
            .service
            .list_claim_compliances(&actor, ClaimId::from(id))
            .await?,
    ))
}

pub async fn mark_in_review(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClaimView>, ApiError> {
    Ok(Json(state.service.mark_in_review(&actor, ClaimId::from(id)).await?))
}

/// Moderator observations addressed to the parties
pub async fn add_observations(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ObservationsRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .add_observations(&actor, ClaimId::from(id), &request.observations)
        .await?;
    Ok(Json(view))
}

/// Party reply to observations; served on both `reply` and `subsanar`
pub async fn submit_observations(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .submit_observations(
            &actor,
            ClaimId::from(id),
            request.clarification_response.as_deref(),
            into_files(request.evidence),
        )
        .await?;
    Ok(Json(view))
}

/// Records the verdict, imposing compliances when given
pub async fn resolve_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .resolve_claim(&actor, ClaimId::from(id), request.into())
        .await?;
    Ok(Json(view))
}

pub async fn reject_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<ClaimView>, ApiError> {
    request.validate()?;
    let view = state
        .service
        .reject_claim(&actor, ClaimId::from(id), &request.resolution)
        .await?;
    Ok(Json(view))
}

pub async fn cancel_claim(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelRequest>>,
) -> Result<Json<ClaimView>, ApiError> {
    let Json(request) = body.unwrap_or_default();
    request.validate()?;
    let view = state
        .service
        .cancel_claim(&actor, ClaimId::from(id), request.reason.as_deref())
        .await?;
    Ok(Json(view))
}
