//! Turns a prompt into a [`SequenceResponse`] by asking a chat model.

use puppet_core::prompt::{ControlSuggestion, SequenceResponse};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::service::error::DirectorError;
use crate::service::library;

const TEMPERATURE: f32 = 0.8;

/// Where sequences come from.
pub enum Director {
    /// OpenAI chat completions in JSON mode.
    OpenAi(OpenAiDirector),
    /// Answers every prompt with the same model output. Lets the server
    /// run without a provider.
    Offline { content: String },
}

impl Director {
    pub async fn create_sequence(&self, prompt: &str) -> Result<SequenceResponse, DirectorError> {
        let raw = match self {
            Director::OpenAi(director) => director.complete(prompt).await?,
            Director::Offline { content } => content.clone(),
        };
        let response = parse_content(&raw);
        tracing::info!(
            "[server] created sequence {:?} ({}, {})",
            response.ordered_sequence,
            response.vibe,
            response.control_suggestion
        );
        Ok(response)
    }
}

/// Reply used when the model output is not a JSON object.
pub fn fallback_response() -> SequenceResponse {
    SequenceResponse {
        ordered_sequence: vec!["idle".to_string()],
        vibe: "neutral".to_string(),
        control_suggestion: ControlSuggestion::Auto,
        inferred_mechanic: Some("idle".to_string()),
        animation_candidates: Some(vec!["idle".to_string()]),
    }
}

/// Parses model output. Missing fields take the wire defaults.
pub fn parse_content(raw: &str) -> SequenceResponse {
    match serde_json::from_str(raw.trim()) {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("[server] model output is not a sequence ({e}), using fallback");
            fallback_response()
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiDirector {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    system_prompt: String,
}

impl OpenAiDirector {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.openai_api_key.clone(),
            model: config.openai_model.clone(),
            base_url: config.openai_base_url.clone(),
            system_prompt: library::system_prompt(),
        }
    }

    /// Raw content of the first choice.
    async fn complete(&self, prompt: &str) -> Result<String, DirectorError> {
        let api_key = self.api_key.as_deref().ok_or(DirectorError::MissingApiKey)?;
        let request = ChatRequest {
            model: &self.model,
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response: ChatResponse = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(DirectorError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}
