//! HTTP API Layer
//!
//! This crate provides the REST API for the dispute engine using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: One per engine action; each returns the updated view
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Validated request bodies and sweep responses
//! - **Error Handling**: Engine error kinds mapped to HTTP statuses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(Arc::new(service), config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_claims::DisputeService;

use crate::config::ApiConfig;
use crate::handlers::{admin, claims, compliances, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DisputeService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - The dispute engine
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: Arc<DisputeService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claims_routes = Router::new()
        .route("/", post(claims::create_claim))
        .route("/:id", get(claims::get_claim))
        .route("/:id/compliances", get(claims::list_compliances))
        .route("/:id/mark-in-review", post(claims::mark_in_review))
        .route("/:id/observations", post(claims::add_observations))
        .route("/:id/reply", post(claims::submit_observations))
        .route("/:id/subsanar", post(claims::submit_observations))
        .route("/:id/resolve", post(claims::resolve_claim))
        .route("/:id/reject", post(claims::reject_claim))
        .route("/:id/cancel", post(claims::cancel_claim));

    let compliance_routes = Router::new()
        .route("/:id", get(compliances::get_compliance))
        .route("/:id/evidence", post(compliances::submit_evidence))
        .route("/:id/upload", post(compliances::submit_evidence))
        .route("/:id/peer-review", post(compliances::peer_review))
        .route("/:id/peer-approve", post(compliances::peer_approve))
        .route("/:id/peer-object", post(compliances::peer_object))
        .route("/:id/review", post(compliances::review_compliance));

    let admin_routes = Router::new().route("/sweep-overdue", post(admin::sweep_overdue));

    // Protected API routes; auth runs first so audit sees the actor
    let api_routes = Router::new()
        .nest("/claims", claims_routes)
        .nest("/compliances", compliance_routes)
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
