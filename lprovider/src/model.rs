//! Provider-agnostic conversation and request types.
//!
//! ```rust
//! use lprovider::{DeliveryMode, InvokeRequest, RequestConfig, Turn};
//!
//! let config = RequestConfig::default();
//! assert_eq!(config.delivery_mode(), DeliveryMode::Streaming);
//!
//! let request = InvokeRequest::new(vec![Turn::user("hello")], config);
//! assert!(request.validate().is_ok());
//! ```

use std::fmt::{Display, Formatter};

use crate::ProviderError;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20241022-v2:0";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

const CROSS_REGION_PREFIXES: &[&str] = &["us.", "eu.", "apac.", "global."];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message of the conversation. Immutable once appended to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Whether a model family delivers output incrementally or in one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Streaming,
    Complete,
}

/// Per-call parameters, passed through to the gateway unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub model_id: String,
    pub region: String,
    pub max_tokens: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            region: DEFAULT_REGION.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl RequestConfig {
    pub fn new(model_id: impl Into<String>, region: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model_id: model_id.into(),
            region: region.into(),
            max_tokens,
        }
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Anthropic models stream; every other family uses the complete path.
    ///
    /// Cross-region inference profile prefixes such as `us.` are ignored.
    pub fn delivery_mode(&self) -> DeliveryMode {
        if self.is_anthropic_family() {
            DeliveryMode::Streaming
        } else {
            DeliveryMode::Complete
        }
    }

    pub fn is_anthropic_family(&self) -> bool {
        let model_id = self.model_id.trim();
        let model_id = CROSS_REGION_PREFIXES
            .iter()
            .find_map(|prefix| model_id.strip_prefix(prefix))
            .unwrap_or(model_id);

        model_id.starts_with("anthropic")
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model_id.trim().is_empty() {
            return Err(ProviderError::invalid_request("model_id must not be empty"));
        }

        if self.region.trim().is_empty() {
            return Err(ProviderError::invalid_request("region must not be empty"));
        }

        if self.max_tokens == 0 {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// A full conversation snapshot plus the configuration to send it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    pub turns: Vec<Turn>,
    pub config: RequestConfig,
}

impl InvokeRequest {
    pub fn new(turns: Vec<Turn>, config: RequestConfig) -> Self {
        Self { turns, config }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        self.config.validate()?;

        if self.turns.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one turn is required",
            ));
        }

        if self.turns.first().map(|turn| turn.role) != Some(Role::User) {
            return Err(ProviderError::invalid_request(
                "conversation must start with a user turn",
            ));
        }

        Ok(())
    }
}
