//! Bedrock gateway implemented over a pluggable transport.

use std::sync::Arc;

use reqwest::Client;

use crate::{
    BoxedUnitStream, InvokeRequest, ProviderError, ProviderFuture, ProviderGateway, RawResponse,
    SecureCredentialManager,
};

use super::auth::resolve_bedrock_auth;
use super::transport::{BedrockHttpTransport, BedrockTransport};
use super::types::BedrockRequest;

#[derive(Clone)]
pub struct BedrockGateway {
    credentials: Arc<SecureCredentialManager>,
    transport: Arc<dyn BedrockTransport>,
}

impl BedrockGateway {
    pub fn new(
        credentials: Arc<SecureCredentialManager>,
        transport: Arc<dyn BedrockTransport>,
    ) -> Self {
        Self {
            credentials,
            transport,
        }
    }

    pub fn default_http_transport(client: Client) -> BedrockHttpTransport {
        BedrockHttpTransport::new(client)
    }

    pub(crate) fn build_request(&self, request: InvokeRequest, stream: bool) -> BedrockRequest {
        BedrockRequest::from_invoke(request, stream)
    }
}

impl ProviderGateway for BedrockGateway {
    fn name(&self) -> &'static str {
        "bedrock"
    }

    fn invoke_streaming<'a>(
        &'a self,
        request: InvokeRequest,
    ) -> ProviderFuture<'a, Result<BoxedUnitStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_bedrock_auth(&self.credentials)?;
            let bedrock_request = self.build_request(request, true);
            self.transport.stream(bedrock_request, auth).await
        })
    }

    fn invoke_complete<'a>(
        &'a self,
        request: InvokeRequest,
    ) -> ProviderFuture<'a, Result<RawResponse, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let auth = resolve_bedrock_auth(&self.credentials)?;
            let bedrock_request = self.build_request(request, false);
            self.transport.complete(bedrock_request, auth).await
        })
    }
}
