//! Session configuration with serde defaults and environment overrides.
//!
//! ```rust
//! use lantern::ChatConfig;
//!
//! let config = ChatConfig::from_json_str(r#"{"region":"eu-central-1"}"#).expect("valid config");
//! assert_eq!(config.region, "eu-central-1");
//! assert_eq!(config.max_tokens, 4096);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

use lprovider::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_REGION, RequestConfig};
use serde::{Deserialize, Serialize};

pub const REGION_ENV: &str = "LANTERN_REGION";
pub const AWS_REGION_ENV: &str = "AWS_REGION";
pub const MODEL_ID_ENV: &str = "LANTERN_MODEL_ID";
pub const MAX_TOKENS_ENV: &str = "LANTERN_MAX_TOKENS";
pub const ENDPOINT_ENV: &str = "LANTERN_ENDPOINT";
pub const TIMEOUT_ENV: &str = "LANTERN_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    Parse,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub kind: ConfigErrorKind,
    pub message: String,
}

impl ConfigError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            kind: ConfigErrorKind::Parse,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: ConfigErrorKind::Invalid,
            message: message.into(),
        }
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub region: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ChatConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(json)
            .map_err(|err| ConfigError::parse(format!("invalid config JSON: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `LANTERN_*` variables; `AWS_REGION` is the region fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(region) = lookup(REGION_ENV).or_else(|| lookup(AWS_REGION_ENV)) {
            self.region = region;
        }

        if let Some(model_id) = lookup(MODEL_ID_ENV) {
            self.model_id = model_id;
        }

        if let Some(max_tokens) = lookup(MAX_TOKENS_ENV) {
            self.max_tokens = max_tokens.parse().map_err(|_| {
                ConfigError::parse(format!("{MAX_TOKENS_ENV} must be a positive integer"))
            })?;
        }

        if let Some(endpoint) = lookup(ENDPOINT_ENV) {
            self.endpoint = Some(endpoint);
        }

        if let Some(timeout) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = timeout.parse().map_err(|_| {
                ConfigError::parse(format!("{TIMEOUT_ENV} must be a number of seconds"))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.trim().is_empty() {
            return Err(ConfigError::invalid("region must not be empty"));
        }

        if self.model_id.trim().is_empty() {
            return Err(ConfigError::invalid("model_id must not be empty"));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::invalid("max_tokens must be greater than zero"));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn to_request_config(&self) -> RequestConfig {
        RequestConfig::new(self.model_id.trim(), self.region.trim(), self.max_tokens)
    }
}
