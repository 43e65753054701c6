use axum::{Json, extract::State};
use puppet_core::prompt::{SequenceRequest, SequenceResponse, prepare_request};

use crate::handler::AppState;
use crate::service::error::DirectorError;

pub async fn create_sequence(
    State(state): State<AppState>,
    Json(request): Json<SequenceRequest>,
) -> Result<Json<SequenceResponse>, DirectorError> {
    let request = prepare_request(&request.prompt).map_err(|_| DirectorError::EmptyPrompt)?;
    tracing::info!("[server] processing prompt: {}", request.prompt);
    let response = state.director.create_sequence(&request.prompt).await?;
    Ok(Json(response))
}
