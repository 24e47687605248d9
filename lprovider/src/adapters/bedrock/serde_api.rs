//! Bedrock HTTP payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};

use crate::ProviderError;

use super::types::{BedrockMessage, BedrockRequest};

pub(crate) fn build_api_body(request: BedrockRequest) -> Result<BedrockApiBody, ProviderError> {
    let messages = request
        .messages
        .into_iter()
        .map(BedrockApiMessage::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if messages.is_empty() {
        return Err(ProviderError::invalid_request(
            "Bedrock request requires at least one message",
        ));
    }

    Ok(BedrockApiBody {
        anthropic_version: request.anthropic_version,
        messages,
        max_tokens: request.max_tokens,
    })
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<BedrockApiErrorBody>(body).ok()?;
    parsed.message.or(parsed.capitalized_message)
}

#[derive(Debug, Deserialize)]
pub(crate) struct BedrockApiErrorBody {
    pub message: Option<String>,
    #[serde(rename = "Message")]
    pub capitalized_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BedrockApiBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_version: Option<String>,
    pub messages: Vec<BedrockApiMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct BedrockApiMessage {
    pub role: String,
    pub content: String,
}

impl TryFrom<BedrockMessage> for BedrockApiMessage {
    type Error = ProviderError;

    fn try_from(value: BedrockMessage) -> Result<Self, Self::Error> {
        if value.content.trim().is_empty() && value.role == crate::Role::User {
            return Err(ProviderError::invalid_request(
                "Bedrock user message content must not be empty",
            ));
        }

        Ok(Self {
            role: value.role.as_str().to_string(),
            content: value.content,
        })
    }
}

/// Payload of an event-stream `chunk` event.
#[derive(Debug, Deserialize)]
pub(crate) struct BedrockChunkPayload {
    pub bytes: String,
}

/// Payload of an event-stream exception frame.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct BedrockExceptionPayload {
    pub message: Option<String>,
    #[serde(rename = "Message")]
    pub capitalized_message: Option<String>,
}

impl BedrockExceptionPayload {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message.or(self.capitalized_message)
    }
}
