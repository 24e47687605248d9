//! Bedrock adapter types and provider-agnostic conversion logic.

use std::fmt::Formatter;

use crate::{ANTHROPIC_VERSION, InvokeRequest, Role, SecretString, Turn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockRequest {
    pub model_id: String,
    pub region: String,
    pub messages: Vec<BedrockMessage>,
    pub max_tokens: u32,
    pub anthropic_version: Option<String>,
    pub stream: bool,
}

impl BedrockRequest {
    pub(crate) fn from_invoke(request: InvokeRequest, stream: bool) -> Self {
        let anthropic_version = request
            .config
            .is_anthropic_family()
            .then(|| ANTHROPIC_VERSION.to_string());

        Self {
            model_id: request.config.model_id.trim().to_string(),
            region: request.config.region.trim().to_string(),
            messages: request.turns.into_iter().map(BedrockMessage::from).collect(),
            max_tokens: request.config.max_tokens,
            anthropic_version,
            stream,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockMessage {
    pub role: Role,
    pub content: String,
}

impl From<Turn> for BedrockMessage {
    fn from(value: Turn) -> Self {
        Self {
            role: value.role,
            content: value.content,
        }
    }
}

#[derive(PartialEq, Eq)]
pub enum BedrockAuth {
    ApiKey(SecretString),
}

impl std::fmt::Debug for BedrockAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("BedrockAuth::ApiKey([REDACTED])"),
        }
    }
}
