use axum::Json;
use serde::Serialize;

pub const SERVICE_NAME: &str = "prompt-puppet";

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Answers without touching the static directories or the provider.
pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
