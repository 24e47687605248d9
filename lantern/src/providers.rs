//! Stable gateway construction surface for facade consumers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{ChatConfig, ProviderError, ProviderGateway, SecureCredentialManager};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct GatewayBuildConfig {
    pub api_key: String,
    pub timeout: Duration,
    pub endpoint: Option<String>,
}

impl GatewayBuildConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            timeout: Duration::from_secs(90),
            endpoint: None,
        }
    }

    pub fn from_chat_config(config: &ChatConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            timeout: config.timeout(),
            endpoint: config.endpoint.clone(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

pub fn build_gateway_from_api_key(
    api_key: impl Into<String>,
) -> Result<Arc<dyn ProviderGateway>, ProviderError> {
    build_gateway_with_config(GatewayBuildConfig::new(api_key))
}

pub fn build_gateway_with_config(
    config: GatewayBuildConfig,
) -> Result<Arc<dyn ProviderGateway>, ProviderError> {
    let api_key = config.api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(ProviderError::authentication(
            "Bedrock API key must not be empty",
        ));
    }

    let credentials = Arc::new(SecureCredentialManager::new());
    credentials.set_bedrock_api_key(api_key)?;

    let http = http_client(config.timeout)?;
    build_bedrock_gateway(credentials, http, config.endpoint, config.timeout)
}

/// Builds a gateway whose key comes from `AWS_BEARER_TOKEN_BEDROCK`.
///
/// A missing key is not an error here: every request then fails with an
/// authentication fault, which sessions surface as a credentials message.
pub fn build_gateway_from_env(
    config: &ChatConfig,
) -> Result<Arc<dyn ProviderGateway>, ProviderError> {
    let credentials = Arc::new(SecureCredentialManager::from_env()?);
    if !credentials.has_credentials()? {
        tracing::warn!(
            phase = "startup",
            event = "credentials_missing",
            "no Bedrock API key found in the environment"
        );
    }

    let http = http_client(config.timeout())?;
    build_bedrock_gateway(credentials, http, config.endpoint.clone(), config.timeout())
}

/// `timeout` bounds connecting and each idle gap between body reads. The total
/// deadline is applied per request by the transport, on the complete path only.
fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Client::builder()
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .read_timeout(timeout)
        .build()
        .map_err(|err| ProviderError::transport(err.to_string()))
}

#[cfg(feature = "provider-bedrock")]
fn build_bedrock_gateway(
    credentials: Arc<SecureCredentialManager>,
    http: Client,
    endpoint: Option<String>,
    timeout: Duration,
) -> Result<Arc<dyn ProviderGateway>, ProviderError> {
    use lprovider::adapters::bedrock::BedrockGateway;

    let mut transport =
        BedrockGateway::default_http_transport(http).with_request_timeout(timeout);
    if let Some(endpoint) = endpoint {
        transport = transport.with_endpoint(endpoint);
    }

    Ok(Arc::new(BedrockGateway::new(credentials, Arc::new(transport))))
}

#[cfg(not(feature = "provider-bedrock"))]
fn build_bedrock_gateway(
    _credentials: Arc<SecureCredentialManager>,
    _http: Client,
    _endpoint: Option<String>,
    _timeout: Duration,
) -> Result<Arc<dyn ProviderGateway>, ProviderError> {
    Err(ProviderError::invalid_request(
        "provider-bedrock feature is not enabled on lantern",
    ))
}
