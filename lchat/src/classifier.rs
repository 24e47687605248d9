//! Maps turn faults to fixed, user-safe messages.
//!
//! ```rust
//! use lchat::{ChatError, ErrorCategory, classify};
//! use lprovider::ProviderError;
//!
//! let message = classify(&ChatError::from(ProviderError::authentication("bad token")));
//! assert_eq!(message.category, ErrorCategory::Credentials);
//! assert!(!message.text.contains("bad token"));
//! ```

use std::sync::Arc;
use std::time::Duration;

use lcommon::{SessionId, sanitize_for_display};
use lprovider::ProviderErrorKind;

use crate::{ChatError, ChatRuntimeHooks};

const PREFIX: &str = "Unable to connect to AWS Bedrock.";
const MAX_DETAIL_CHARS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Credentials,
    AccessDenied,
    ModelNotFound,
    Generic,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::AccessDenied => "access_denied",
            Self::ModelNotFound => "model_not_found",
            Self::Generic => "generic",
        }
    }
}

/// Text safe to show in the chat panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub category: ErrorCategory,
    pub text: String,
}

pub fn categorize(error: &ChatError) -> ErrorCategory {
    match error.provider_kind() {
        Some(ProviderErrorKind::Authentication) => ErrorCategory::Credentials,
        Some(ProviderErrorKind::AccessDenied) => ErrorCategory::AccessDenied,
        Some(ProviderErrorKind::NotFound) => ErrorCategory::ModelNotFound,
        _ => ErrorCategory::Generic,
    }
}

/// Only the generic template carries the fault's own text, reduced to one
/// scrubbed line.
pub fn classify(error: &ChatError) -> UserMessage {
    let category = categorize(error);
    let text = match category {
        ErrorCategory::Credentials => format!(
            "{PREFIX} Please ensure your Bedrock API key is configured correctly, \
             for example through the AWS_BEARER_TOKEN_BEDROCK environment variable."
        ),
        ErrorCategory::AccessDenied => format!(
            "{PREFIX} Access denied. Please ensure you have Bedrock access enabled in your \
             AWS account and the selected model is available in your region."
        ),
        ErrorCategory::ModelNotFound => format!(
            "{PREFIX} Model not found. Please check the model ID in your configuration."
        ),
        ErrorCategory::Generic => {
            let detail = sanitize_for_display(&error.message, MAX_DETAIL_CHARS);
            if detail.is_empty() {
                format!("{PREFIX} An unexpected error occurred.")
            } else {
                format!("{PREFIX} {detail}")
            }
        }
    };

    UserMessage { category, text }
}

/// Classifies a failed turn and forwards the raw fault to the diagnostic hooks.
#[derive(Clone)]
pub struct ErrorClassifier {
    hooks: Arc<dyn ChatRuntimeHooks>,
}

impl ErrorClassifier {
    pub fn new(hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        Self { hooks }
    }

    pub fn report(
        &self,
        session_id: &SessionId,
        error: &ChatError,
        elapsed: Duration,
    ) -> UserMessage {
        let message = classify(error);
        self.hooks
            .on_turn_failure(session_id, message.category, error, elapsed);
        message
    }
}
