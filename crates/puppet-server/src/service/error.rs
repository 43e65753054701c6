use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectorError {
    #[error("Missing or empty prompt")]
    EmptyPrompt,

    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider returned no choices")]
    NoChoices,
}

impl DirectorError {
    fn to_status(&self) -> StatusCode {
        match self {
            DirectorError::EmptyPrompt => StatusCode::BAD_REQUEST,
            DirectorError::MissingApiKey
            | DirectorError::Request(_)
            | DirectorError::NoChoices => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DirectorError {
    fn into_response(self) -> Response {
        let status = self.to_status();
        if status.is_server_error() {
            tracing::error!("[server] error processing prompt: {self}");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
