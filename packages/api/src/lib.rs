use std::sync::Arc;

use axum::{routing::get, Router};
use shared::repositories::match_repository::MatchRepository;
use shared::services::access_policy::JwtAccessPolicy;
use shared::services::admin_service::MatchAdminService;
use shared::services::match_service::{MatchService, MatchServiceConfig};
use shared::services::move_oracle::ChessMoveOracle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use config::ApiConfig;
use state::AppState;

/// Wires the services around `repository` with standard chess rules and JWT
/// access control.
pub fn build_state(
    config: &ApiConfig,
    repository: Arc<dyn MatchRepository + Send + Sync>,
) -> AppState {
    let match_service = MatchService::new(repository.clone(), Arc::new(ChessMoveOracle::new()))
        .with_config(MatchServiceConfig {
            max_move_attempts: config.max_move_attempts,
        });

    AppState {
        match_service: Arc::new(match_service),
        admin_service: Arc::new(MatchAdminService::new(repository)),
        access_policy: Arc::new(JwtAccessPolicy::new(config.jwt_secret.clone())),
        request_timeout: config.request_timeout,
    }
}

pub fn create_app(state: AppState) -> Router {
    // ToDo: Tighten this up
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::matches::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use config::{LogFormat, MatchStore};
    use shared::repositories::memory_match_repository::InMemoryMatchRepository;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let config = ApiConfig {
            jwt_secret: "router-secret".to_string(),
            store: MatchStore::Memory,
            request_timeout: Duration::from_secs(5),
            max_move_attempts: 3,
            local_bind_addr: None,
            log_format: LogFormat::Text,
        };
        create_app(build_state(&config, Arc::new(InMemoryMatchRepository::new())))
    }

    #[tokio::test]
    async fn test_health_needs_no_credentials() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_match_routes_require_credentials() {
        let response = test_app()
            .oneshot(Request::get("/matches").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["kind"], "unauthenticated");
    }

    #[tokio::test]
    async fn test_malformed_bearer_is_rejected() {
        let request = Request::get("/matches/all")
            .header("Authorization", "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
