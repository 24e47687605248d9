//! Chat-layer errors and classification.

use std::error::Error;
use std::fmt::{Display, Formatter};

use lprovider::{ProviderError, ProviderErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    InvalidState,
    Decode,
    Provider(ProviderErrorKind),
    Editor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidState, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Decode, message)
    }

    pub fn provider(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider(kind), message)
    }

    pub fn editor(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Editor, message)
    }

    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self.kind {
            ChatErrorKind::Provider(kind) => Some(kind),
            _ => None,
        }
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        match value.kind {
            ProviderErrorKind::Decode => ChatError::decode(value.message),
            kind => ChatError::provider(kind, value.message),
        }
    }
}
