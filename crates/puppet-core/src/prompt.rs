//! Prompt service wire types and client-side response handling.
//!
//! The server and the session share these types. The session never talks to
//! the network itself: the host posts a [`SequenceRequest`], then hands the
//! raw body (or the failure) back as a [`PromptOutcome`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::is_movement_animation;

/// Separator used when listing a sequence in status text.
pub const SEQUENCE_ARROW: &str = " → ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceRequest {
    pub prompt: String,
}

fn default_sequence() -> Vec<String> {
    vec!["idle".to_string()]
}

fn default_vibe() -> String {
    "neutral".to_string()
}

fn default_control_suggestion() -> ControlSuggestion {
    ControlSuggestion::Auto
}

/// Body of a successful `POST /api/sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceResponse {
    #[serde(default = "default_sequence")]
    pub ordered_sequence: Vec<String>,
    #[serde(default = "default_vibe")]
    pub vibe: String,
    #[serde(default = "default_control_suggestion")]
    pub control_suggestion: ControlSuggestion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inferred_mechanic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation_candidates: Option<Vec<String>>,
}

impl Default for SequenceResponse {
    fn default() -> Self {
        Self {
            ordered_sequence: default_sequence(),
            vibe: default_vibe(),
            control_suggestion: ControlSuggestion::Auto,
            inferred_mechanic: None,
            animation_candidates: None,
        }
    }
}

/// How the player should interact with a sequence.
///
/// Wire form is a plain string: `auto`, `interactive`, `movement` or
/// `button:<label>`. Anything unrecognised reads as `auto`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ControlSuggestion {
    #[default]
    Auto,
    Interactive,
    Movement,
    /// One button that plays the named animation once.
    Button(String),
}

impl ControlSuggestion {
    pub fn parse(s: &str) -> Self {
        if let Some(rest) = s.strip_prefix("button:") {
            let label = rest.split(':').next().unwrap_or_default();
            if label.is_empty() {
                return Self::Auto;
            }
            return Self::Button(label.to_string());
        }
        match s {
            "interactive" => Self::Interactive,
            "movement" => Self::Movement,
            _ => Self::Auto,
        }
    }
}

impl From<String> for ControlSuggestion {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<ControlSuggestion> for String {
    fn from(c: ControlSuggestion) -> Self {
        c.to_string()
    }
}

impl fmt::Display for ControlSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Interactive => f.write_str("interactive"),
            Self::Movement => f.write_str("movement"),
            Self::Button(label) => write!(f, "button:{label}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("Enter a prompt")]
    Empty,
    #[error("{0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The service answered with an `error` field.
    #[error("{0}")]
    Service(String),
}

/// Trims the prompt text and builds the request body.
pub fn prepare_request(text: &str) -> Result<SequenceRequest, PromptError> {
    let prompt = text.trim();
    if prompt.is_empty() {
        return Err(PromptError::Empty);
    }
    Ok(SequenceRequest {
        prompt: prompt.to_string(),
    })
}

/// What the session applies after a prompt round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOutcome {
    /// Raw labels, unresolved.
    pub sequence: Vec<String>,
    pub vibe: String,
    pub control: ControlSuggestion,
    /// Failure to surface to the player. Set only on fallback outcomes.
    pub error: Option<String>,
}

impl PromptOutcome {
    /// Neutral, auto, empty. Used when anything went wrong.
    pub fn fallback(error: Option<String>) -> Self {
        Self {
            sequence: Vec::new(),
            vibe: default_vibe(),
            control: ControlSuggestion::Auto,
            error,
        }
    }

    pub fn from_error(error: &PromptError) -> Self {
        Self::fallback(Some(error.to_string()))
    }

    pub fn from_response(response: SequenceResponse) -> Self {
        Self {
            sequence: response.ordered_sequence,
            vibe: response.vibe,
            control: response.control_suggestion,
            error: None,
        }
    }

    /// Interprets a response body from the prompt service.
    ///
    /// A non-null `error` field is a failure even next to a sequence, and
    /// becomes [`PromptError::Service`]. A body without an
    /// `ordered_sequence` array otherwise reads as the neutral fallback.
    pub fn decode(body: &str) -> Result<Self, PromptError> {
        let value: serde_json::Value = serde_json::from_str(body)?;

        match value.get("error") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(msg)) => return Err(PromptError::Service(msg.clone())),
            Some(other) => return Err(PromptError::Service(other.to_string())),
        }

        let Some(list) = value.get("ordered_sequence").and_then(|v| v.as_array()) else {
            return Ok(Self::fallback(None));
        };

        let sequence = list
            .iter()
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect();
        let vibe = value
            .get("vibe")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map_or_else(default_vibe, str::to_owned);
        let control = value
            .get("control_suggestion")
            .and_then(|v| v.as_str())
            .map(ControlSuggestion::parse)
            .unwrap_or_default();

        Ok(Self {
            sequence,
            vibe,
            control,
            error: None,
        })
    }

    /// [`decode`](Self::decode), falling back on failure.
    pub fn from_body(body: &str) -> Self {
        Self::decode(body).unwrap_or_else(|e| Self::from_error(&e))
    }

    /// Labels the sequencer should auto-play. A button's own label is held
    /// back for the button.
    pub fn playable_sequence(&self) -> Vec<String> {
        match &self.control {
            ControlSuggestion::Button(action) => {
                let action = action.to_lowercase();
                self.sequence
                    .iter()
                    .filter(|label| label.to_lowercase() != action)
                    .cloned()
                    .collect()
            }
            _ => self.sequence.clone(),
        }
    }

    /// Labels to offer as one-shot buttons. These do not need to resolve.
    pub fn action_buttons(&self) -> Vec<String> {
        match &self.control {
            ControlSuggestion::Button(action) => vec![action.clone()],
            ControlSuggestion::Interactive => self
                .sequence
                .iter()
                .filter(|label| !is_movement_animation(label))
                .cloned()
                .collect(),
            ControlSuggestion::Auto | ControlSuggestion::Movement => Vec::new(),
        }
    }

    /// Status line shown once the outcome is applied.
    pub fn status_line(&self) -> String {
        match &self.control {
            ControlSuggestion::Button(action) => format!(
                "Playing ({}): {} | Click button to {action}",
                self.vibe,
                self.playable_sequence().join(SEQUENCE_ARROW)
            ),
            _ => format!(
                "Playing ({}): {}",
                self.vibe,
                self.sequence.join(SEQUENCE_ARROW)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_control_suggestion_parse() {
        assert_eq!(ControlSuggestion::parse("auto"), ControlSuggestion::Auto);
        assert_eq!(
            ControlSuggestion::parse("interactive"),
            ControlSuggestion::Interactive
        );
        assert_eq!(ControlSuggestion::parse("movement"), ControlSuggestion::Movement);
        assert_eq!(
            ControlSuggestion::parse("button:twerk"),
            ControlSuggestion::Button("twerk".into())
        );
        assert_eq!(ControlSuggestion::parse("button:"), ControlSuggestion::Auto);
        assert_eq!(ControlSuggestion::parse("whatever"), ControlSuggestion::Auto);
        assert_eq!(ControlSuggestion::Button("dab".into()).to_string(), "button:dab");
    }

    #[test]
    fn test_response_defaults() {
        let r: SequenceResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r, SequenceResponse::default());

        let r: SequenceResponse =
            serde_json::from_str(r#"{"ordered_sequence":["walk"],"control_suggestion":"button:dab"}"#)
                .unwrap();
        assert_eq!(r.control_suggestion, ControlSuggestion::Button("dab".into()));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["control_suggestion"], "button:dab");
        assert!(json.get("inferred_mechanic").is_none());
    }

    #[test]
    fn test_prepare_request_trims() {
        assert_eq!(prepare_request("  dance  ").unwrap().prompt, "dance");
        assert!(matches!(prepare_request("   "), Err(PromptError::Empty)));
        assert_eq!(PromptError::Empty.to_string(), "Enter a prompt");
    }

    #[test]
    fn test_decode_success() {
        let outcome = PromptOutcome::decode(
            r#"{"ordered_sequence":["walk","twerk"],"vibe":"","control_suggestion":"interactive"}"#,
        )
        .unwrap();
        assert_eq!(outcome.sequence, labels(&["walk", "twerk"]));
        assert_eq!(outcome.vibe, "neutral");
        assert_eq!(outcome.control, ControlSuggestion::Interactive);
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_decode_failures_fall_back() {
        let outcome = PromptOutcome::from_body(r#"{"error":"quota exceeded"}"#);
        assert!(outcome.sequence.is_empty());
        assert_eq!(outcome.vibe, "neutral");
        assert_eq!(outcome.control, ControlSuggestion::Auto);
        assert_eq!(outcome.error.as_deref(), Some("quota exceeded"));

        let outcome = PromptOutcome::from_body("not json");
        assert!(outcome.sequence.is_empty());
        assert!(outcome.error.unwrap().starts_with("invalid response"));

        let outcome = PromptOutcome::from_body(r#"{"detail":"nope"}"#);
        assert!(outcome.sequence.is_empty());
        assert!(outcome.error.is_none());
    }

    #[test]
    fn test_error_field_wins_over_sequence() {
        let outcome = PromptOutcome::from_body(
            r#"{"ordered_sequence":["walk"],"vibe":"happy","error":"rate limited"}"#,
        );
        assert!(outcome.sequence.is_empty());
        assert_eq!(outcome.vibe, "neutral");
        assert_eq!(outcome.error.as_deref(), Some("rate limited"));

        let outcome = PromptOutcome::decode(r#"{"ordered_sequence":["walk"],"error":null}"#).unwrap();
        assert_eq!(outcome.sequence, labels(&["walk"]));
    }

    #[test]
    fn test_button_suggestion_holds_back_its_label() {
        let outcome = PromptOutcome {
            sequence: labels(&["idle", "Twerk", "unknownmove", "twerk"]),
            vibe: "silly".into(),
            control: ControlSuggestion::Button("twerk".into()),
            error: None,
        };
        assert_eq!(outcome.playable_sequence(), labels(&["idle", "unknownmove"]));
        assert_eq!(outcome.action_buttons(), labels(&["twerk"]));
        assert_eq!(
            outcome.status_line(),
            "Playing (silly): idle → unknownmove | Click button to twerk"
        );
    }

    #[test]
    fn test_interactive_buttons_skip_movement() {
        let outcome = PromptOutcome {
            sequence: labels(&["walk", "dab", "run", "shrug"]),
            vibe: "happy".into(),
            control: ControlSuggestion::Interactive,
            error: None,
        };
        assert_eq!(outcome.action_buttons(), labels(&["dab", "shrug"]));
        assert_eq!(outcome.playable_sequence().len(), 4);
        assert_eq!(
            outcome.status_line(),
            "Playing (happy): walk → dab → run → shrug"
        );

        let auto = PromptOutcome {
            control: ControlSuggestion::Auto,
            ..outcome
        };
        assert!(auto.action_buttons().is_empty());
    }
}
