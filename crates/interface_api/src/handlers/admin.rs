//! Staff operations

use axum::{extract::State, Extension, Json};

use core_kernel::Actor;

use crate::dto::compliances::SweepResponse;
use crate::{error::ApiError, AppState};

/// Evaluates every open compliance against its deadline
pub async fn sweep_overdue(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<SweepResponse>, ApiError> {
    let report = state.service.sweep_overdue(&actor).await?;
    Ok(Json(report.into()))
}
