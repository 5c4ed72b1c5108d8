// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// JWKS (token verification keys) status: "ok" or "unavailable".
    pub jwks: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Check if the JWKS is cached or can be fetched now. A recent failed
/// fetch is reported without contacting the endpoint again.
async fn check_jwks(state: &AppState) -> bool {
    let jwks = state.verifier.jwks();
    if jwks.is_cached().await {
        return true;
    }
    match jwks.refresh().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "JWKS unavailable for health check");
            false
        }
    }
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let jwks_ok = check_jwks(&state).await;

    let response = ReadyResponse {
        status: if jwks_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            jwks: if jwks_ok { "ok" } else { "unavailable" }.to_string(),
        },
    };

    let status = if jwks_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{
        test_settings, test_state, StaticKeySet, TEST_JWKS_URL,
    };
    use crate::auth::{JwksManager, TokenVerifier};
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn healthy_when_jwks_reachable() {
        let (status, Json(body)) = health(State(test_state())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.checks.jwks, "ok");
    }

    #[tokio::test]
    async fn degraded_when_jwks_unreachable() {
        let jwks = JwksManager::with_source(TEST_JWKS_URL, Arc::new(StaticKeySet::failing()));
        let verifier = TokenVerifier::new(Arc::new(jwks), &test_settings());
        let state = AppState::new(InMemoryStore::new(), verifier);

        let (status, Json(body)) = health(State(state)).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.checks.jwks, "unavailable");
    }

    #[tokio::test]
    async fn repeated_checks_during_outage_fetch_once() {
        let source = Arc::new(StaticKeySet::failing());
        let jwks = JwksManager::with_source(TEST_JWKS_URL, source.clone());
        let verifier = TokenVerifier::new(Arc::new(jwks), &test_settings());
        let state = AppState::new(InMemoryStore::new(), verifier);

        for _ in 0..3 {
            let (status, _) = health(State(state.clone())).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        }
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let Json(body) = liveness().await;
        assert_eq!(body.status, "ok");
    }
}
