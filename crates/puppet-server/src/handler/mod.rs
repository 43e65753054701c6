use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::service::director::Director;

pub mod health;
pub mod sequence;

#[derive(Clone)]
pub struct AppState {
    pub director: Arc<Director>,
}

/// API routes, static directories and the index page.
pub fn router(config: &ServerConfig, director: Director) -> Router {
    let state = AppState {
        director: Arc::new(director),
    };

    Router::new()
        .route("/api/sequence", post(sequence::create_sequence))
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .route_service("/", ServeFile::new(config.public_dir.join("index.html")))
        .nest_service("/public", ServeDir::new(&config.public_dir))
        .nest_service("/assets", ServeDir::new(&config.assets_dir))
        .nest_service("/shared", ServeDir::new(&config.shared_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use puppet_core::prompt::PromptOutcome;
    use tower::ServiceExt;

    fn offline(content: &str) -> Router {
        router(
            &ServerConfig::default(),
            Director::Offline {
                content: content.to_string(),
            },
        )
    }

    async fn post_prompt(app: Router, body: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::post("/api/sequence")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_sequence_roundtrip_into_outcome() {
        let app = offline(
            r#"{"ordered_sequence": ["walk", "twerk"], "vibe": "silly", "control_suggestion": "button:twerk"}"#,
        );
        let (status, body) = post_prompt(app, r#"{"prompt": "  trump twerking  "}"#).await;
        assert_eq!(status, StatusCode::OK);

        let outcome = PromptOutcome::from_body(&body);
        assert!(outcome.error.is_none());
        assert_eq!(outcome.sequence, ["walk", "twerk"]);
        assert_eq!(outcome.action_buttons(), ["twerk"]);
    }

    #[tokio::test]
    async fn test_empty_prompt_is_bad_request() {
        let (status, body) = post_prompt(offline("{}"), r#"{"prompt": "   "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Missing or empty prompt");
    }

    #[tokio::test]
    async fn test_garbage_model_output_falls_back() {
        let (status, body) = post_prompt(offline("not json"), r#"{"prompt": "hmm"}"#).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["ordered_sequence"], serde_json::json!(["idle"]));
        assert_eq!(json["vibe"], "neutral");
        assert_eq!(json["control_suggestion"], "auto");
        assert_eq!(json["inferred_mechanic"], "idle");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_server_error() {
        let config = ServerConfig::default();
        let app = router(
            &config,
            Director::OpenAi(crate::service::director::OpenAiDirector::new(&config)),
        );
        let (status, body) = post_prompt(app, r#"{"prompt": "dance"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // The client surfaces the error field as its status text.
        let outcome = PromptOutcome::from_body(&body);
        assert_eq!(
            outcome.error.as_deref(),
            Some("OPENAI_API_KEY environment variable is not set")
        );
        assert!(outcome.sequence.is_empty());
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        for path in ["/health", "/api/health"] {
            let response = offline("{}")
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(json["status"], "healthy");
            assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        }
    }

    #[tokio::test]
    async fn test_missing_asset_is_not_found() {
        let response = offline("{}")
            .oneshot(
                Request::get("/assets/does-not-exist.atlas")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
