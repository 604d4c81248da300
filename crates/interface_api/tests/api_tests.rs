//! HTTP API tests against the in-memory store

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use core_kernel::{Actor, FixedClock};
use domain_claims::{DisputeService, InMemoryDisputeStore};
use interface_api::auth::create_token;
use interface_api::config::ApiConfig;
use interface_api::create_router;
use test_utils::{Parties, TemporalFixtures, TextFixtures};

struct Api {
    server: TestServer,
    config: ApiConfig,
    parties: Parties,
}

impl Api {
    fn new() -> Self {
        let service = DisputeService::new(
            Arc::new(InMemoryDisputeStore::new()),
            Arc::new(FixedClock::new(TemporalFixtures::t0())),
        );
        let config = ApiConfig::default();
        let server = TestServer::new(create_router(Arc::new(service), config.clone())).unwrap();
        Self {
            server,
            config,
            parties: Parties::new(),
        }
    }

    fn token(&self, actor: &Actor) -> String {
        create_token(actor, &self.config.jwt_secret, 600).unwrap()
    }

    async fn post(&self, actor: &Actor, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self
            .server
            .post(path)
            .authorization_bearer(self.token(actor))
            .json(&body)
            .await;
        (response.status_code(), response.json::<Value>())
    }

    async fn get(&self, actor: &Actor, path: &str) -> (StatusCode, Value) {
        let response = self
            .server
            .get(path)
            .authorization_bearer(self.token(actor))
            .await;
        (response.status_code(), response.json::<Value>())
    }

    fn claim_body(&self) -> Value {
        json!({
            "hiring_id": uuid::Uuid::new_v4(),
            "claimant_side": "client",
            "respondent_id": self.parties.respondent.user_id,
            "claim_type": "incomplete_work",
            "description": TextFixtures::description(),
            "evidence": [{
                "url": "https://files.example.com/brief.pdf",
                "file_name": "brief.pdf",
                "size_bytes": 2048
            }]
        })
    }

    /// Opens a claim and takes it for review; returns the claim id
    async fn claim_in_review(&self) -> String {
        let (status, claim) = self
            .post(&self.parties.claimant, "/api/v1/claims", self.claim_body())
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = claim["id"].as_str().unwrap().to_string();

        let (status, _) = self
            .post(
                &self.parties.moderator,
                &format!("/api/v1/claims/{id}/mark-in-review"),
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    /// Resolves with one compliance on the respondent; returns its id
    async fn impose_on_respondent(&self, claim_id: &str) -> String {
        let (status, claim) = self
            .post(
                &self.parties.moderator,
                &format!("/api/v1/claims/{claim_id}/resolve"),
                json!({
                    "resolution": TextFixtures::resolution(),
                    "resolution_type": "client_favor",
                    "compliances": [{
                        "responsible_user_id": self.parties.respondent.user_id,
                        "compliance_type": "deliver_work",
                        "deadline": TemporalFixtures::deadline_in(5),
                        "moderator_instructions": TextFixtures::instructions()
                    }]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(claim["status"], "in_review");
        claim["compliances"][0]["id"].as_str().unwrap().to_string()
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_is_public() {
        let api = Api::new();
        api.server.get("/health").await.assert_status_ok();
        api.server.get("/health/ready").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let api = Api::new();
        let response = api.server.post("/api/v1/claims").json(&api.claim_body()).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let api = Api::new();
        let response = api
            .server
            .get("/api/v1/compliances/00000000-0000-0000-0000-000000000000")
            .authorization_bearer("not-a-jwt")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

mod claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_claim_returns_view() {
        let api = Api::new();
        let (status, claim) = api
            .post(&api.parties.claimant, "/api/v1/claims", api.claim_body())
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(claim["status"], "open");
        assert_eq!(claim["viewer"], "claimant");
        assert_eq!(claim["version"], 1);
        let actions = claim["available_actions"].as_array().unwrap();
        assert!(actions.contains(&json!("cancel_claim")));
    }

    #[tokio::test]
    async fn test_short_description_is_422() {
        let api = Api::new();
        let mut body = api.claim_body();
        body["description"] = json!("Too short");

        let (status, error) = api.post(&api.parties.claimant, "/api/v1/claims", body).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_outsider_cannot_read_claim() {
        let api = Api::new();
        let id = api.claim_in_review().await;

        let (status, error) = api
            .get(&api.parties.outsider, &format!("/api/v1/claims/{id}"))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(error["error"], "unauthorized");
    }

    #[tokio::test]
    async fn test_party_cannot_take_for_review() {
        let api = Api::new();
        let (_, claim) = api
            .post(&api.parties.claimant, "/api/v1/claims", api.claim_body())
            .await;
        let id = claim["id"].as_str().unwrap();

        let (status, _) = api
            .post(
                &api.parties.respondent,
                &format!("/api/v1/claims/{id}/mark-in-review"),
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_claim_is_404() {
        let api = Api::new();
        let (status, error) = api
            .get(
                &api.parties.moderator,
                &format!("/api/v1/claims/{}", uuid::Uuid::new_v4()),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error["error"], "not_found");
    }

    #[tokio::test]
    async fn test_observation_round_trip_via_subsanar() {
        let api = Api::new();
        let id = api.claim_in_review().await;

        let (status, claim) = api
            .post(
                &api.parties.moderator,
                &format!("/api/v1/claims/{id}/observations"),
                json!({ "observations": TextFixtures::observations() }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(claim["status"], "pending_clarification");

        let (status, claim) = api
            .post(
                &api.parties.claimant,
                &format!("/api/v1/claims/{id}/subsanar"),
                json!({ "clarification_response": TextFixtures::reply() }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(claim["status"], "requires_staff_response");
    }

    #[tokio::test]
    async fn test_cancelled_claim_rejects_further_actions() {
        let api = Api::new();
        let (_, claim) = api
            .post(&api.parties.claimant, "/api/v1/claims", api.claim_body())
            .await;
        let id = claim["id"].as_str().unwrap();

        let response = api
            .server
            .post(&format!("/api/v1/claims/{id}/cancel"))
            .authorization_bearer(api.token(&api.parties.claimant))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], "cancelled");

        let (status, error) = api
            .post(
                &api.parties.moderator,
                &format!("/api/v1/claims/{id}/mark-in-review"),
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error["error"], "invalid_state_transition");
    }
}

mod compliance_tests {
    use super::*;

    #[tokio::test]
    async fn test_submit_peer_approve_and_review() {
        let api = Api::new();
        let claim_id = api.claim_in_review().await;
        let id = api.impose_on_respondent(&claim_id).await;

        let (status, compliance) = api
            .post(
                &api.parties.respondent,
                &format!("/api/v1/compliances/{id}/upload"),
                json!({
                    "evidence": [{
                        "url": "https://files.example.com/form.png",
                        "file_name": "form.png",
                        "size_bytes": 4096
                    }],
                    "user_notes": TextFixtures::evidence_notes()
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compliance["status"], "submitted");

        let (status, compliance) = api
            .post(
                &api.parties.claimant,
                &format!("/api/v1/compliances/{id}/peer-approve"),
                json!({}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compliance["peer_approved"], true);

        let (status, compliance) = api
            .post(
                &api.parties.moderator,
                &format!("/api/v1/compliances/{id}/review"),
                json!({
                    "decision": "approve",
                    "moderator_notes": TextFixtures::review_notes()
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(compliance["status"], "approved");
    }

    #[tokio::test]
    async fn test_counterpart_cannot_upload() {
        let api = Api::new();
        let claim_id = api.claim_in_review().await;
        let id = api.impose_on_respondent(&claim_id).await;

        let (status, _) = api
            .post(
                &api.parties.claimant,
                &format!("/api/v1/compliances/{id}/evidence"),
                json!({
                    "evidence": [{
                        "url": "https://files.example.com/x.pdf",
                        "file_name": "x.pdf",
                        "size_bytes": 10
                    }],
                    "user_notes": TextFixtures::evidence_notes()
                }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_sweep_requires_staff() {
        let api = Api::new();
        let claim_id = api.claim_in_review().await;
        api.impose_on_respondent(&claim_id).await;

        let (status, _) = api
            .post(&api.parties.claimant, "/api/v1/admin/sweep-overdue", json!({}))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, report) = api
            .post(&api.parties.moderator, "/api/v1/admin/sweep-overdue", json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["evaluated"], 1);
        assert!(report["advanced"].as_array().unwrap().is_empty());
        assert!(report["failed"].as_array().unwrap().is_empty());
    }
}
