//! Secure in-memory credential management.

use std::sync::{Mutex, MutexGuard};

use crate::ProviderError;

pub const BEDROCK_API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";

const LONG_TERM_KEY_PREFIX: &str = "ABSK";
const SHORT_TERM_KEY_PREFIX: &str = "bedrock-api-key-";

#[derive(PartialEq, Eq)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn expose(&self) -> &str {
        self.value.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        // Zeroing bytes in place keeps the buffer valid UTF-8.
        unsafe {
            self.value.as_mut_vec().fill(0);
        }
    }
}

/// Holds the API key used to authenticate gateway calls.
///
/// The key never leaves this type except through [`Self::with_api_key`], whose
/// closure receives a borrowed view for the duration of one request.
#[derive(Default)]
pub struct SecureCredentialManager {
    api_key: Mutex<Option<SecretString>>,
}

impl std::fmt::Debug for SecureCredentialManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let configured = self.has_credentials().unwrap_or(false);
        f.debug_struct("SecureCredentialManager")
            .field("configured", &configured)
            .finish()
    }
}

impl SecureCredentialManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the key from `AWS_BEARER_TOKEN_BEDROCK` when it is set and non-empty.
    ///
    /// A set key goes through the same prefix check as
    /// [`Self::set_bedrock_api_key`].
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_env_value(std::env::var(BEDROCK_API_KEY_ENV).ok())
    }

    fn from_env_value(value: Option<String>) -> Result<Self, ProviderError> {
        let manager = Self::new();
        if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
            manager.set_bedrock_api_key(value)?;
        }

        Ok(manager)
    }

    /// Stores a Bedrock API key for bearer-authenticated requests.
    ///
    /// Long-term keys start with `ABSK`; short-term keys start with
    /// `bedrock-api-key-`.
    pub fn set_bedrock_api_key(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        let api_key = api_key.into();
        let api_key = api_key.trim();
        if !api_key.starts_with(LONG_TERM_KEY_PREFIX) && !api_key.starts_with(SHORT_TERM_KEY_PREFIX)
        {
            return Err(ProviderError::authentication(
                "Bedrock API key must start with 'ABSK' or 'bedrock-api-key-'",
            ));
        }

        self.set_api_key(api_key)
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) -> Result<(), ProviderError> {
        let api_key = SecretString::new(api_key);
        if api_key.is_empty() {
            return Err(ProviderError::authentication("api key must not be empty"));
        }

        *self.api_key_mut()? = Some(api_key);
        Ok(())
    }

    pub fn has_credentials(&self) -> Result<bool, ProviderError> {
        Ok(self.api_key_ref()?.is_some())
    }

    pub fn with_api_key<R>(&self, f: impl FnOnce(&str) -> R) -> Result<Option<R>, ProviderError> {
        let api_key = self.api_key_ref()?;
        Ok(api_key.as_ref().map(|secret| f(secret.expose())))
    }

    pub fn clear(&self) -> Result<bool, ProviderError> {
        Ok(self.api_key_mut()?.take().is_some())
    }

    fn api_key_ref(&self) -> Result<MutexGuard<'_, Option<SecretString>>, ProviderError> {
        self.api_key
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }

    fn api_key_mut(&self) -> Result<MutexGuard<'_, Option<SecretString>>, ProviderError> {
        self.api_key
            .lock()
            .map_err(|_| ProviderError::other("credential manager lock poisoned"))
    }
}
