//! Bedrock auth resolution policy.

use crate::{ProviderError, SecretString, SecureCredentialManager};

use super::types::BedrockAuth;

pub(crate) fn resolve_bedrock_auth(
    credentials: &SecureCredentialManager,
) -> Result<BedrockAuth, ProviderError> {
    credentials
        .with_api_key(|value| BedrockAuth::ApiKey(SecretString::new(value)))?
        .ok_or_else(|| ProviderError::authentication("no Bedrock API key configured"))
}
