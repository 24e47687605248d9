//! Bedrock transport trait and reqwest-based HTTP implementation.

use async_stream::try_stream;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::time::Duration;

use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, Url};

use crate::{BoxedUnitStream, ProviderError, ProviderFuture, RawResponse, RawUnit};

use super::errors::{map_http_error, map_stream_exception};
use super::eventstream::{EventStreamDecoder, EventStreamMessage};
use super::serde_api::{
    BedrockChunkPayload, BedrockExceptionPayload, build_api_body, extract_error_message,
};
use super::types::{BedrockAuth, BedrockRequest};

const EVENT_STREAM_CONTENT_TYPE: &str = "application/vnd.amazon.eventstream";
const JSON_CONTENT_TYPE: &str = "application/json";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

pub trait BedrockTransport: Send + Sync + std::fmt::Debug {
    fn complete<'a>(
        &'a self,
        request: BedrockRequest,
        auth: BedrockAuth,
    ) -> ProviderFuture<'a, Result<RawResponse, ProviderError>>;

    fn stream<'a>(
        &'a self,
        request: BedrockRequest,
        auth: BedrockAuth,
    ) -> ProviderFuture<'a, Result<BoxedUnitStream<'a>, ProviderError>>;
}

#[derive(Debug, Clone)]
pub struct BedrockHttpTransport {
    client: Client,
    endpoint: Option<String>,
    request_timeout: Option<Duration>,
}

impl BedrockHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            endpoint: None,
            request_timeout: None,
        }
    }

    /// Total deadline for non-streaming calls. Streams are bounded only by the
    /// client's idle read timeout, so long replies are never cut off.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub(crate) fn request_timeout(&self, stream: bool) -> Option<Duration> {
        if stream { None } else { self.request_timeout }
    }

    /// Overrides the regional endpoint, e.g. for a VPC interface endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub(crate) fn invoke_url(
        &self,
        region: &str,
        model_id: &str,
        action: &str,
    ) -> Result<Url, ProviderError> {
        let base = match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => {
                if region.is_empty()
                    || !region
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                {
                    return Err(ProviderError::invalid_request(format!(
                        "invalid Bedrock region '{region}'"
                    )));
                }

                format!("https://bedrock-runtime.{region}.amazonaws.com")
            }
        };

        let mut url = Url::parse(&base).map_err(|err| {
            ProviderError::invalid_request(format!("invalid Bedrock endpoint: {err}"))
        })?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::invalid_request("Bedrock endpoint must be an http(s) URL"))?
            .pop_if_empty()
            .extend(["model", model_id, action]);

        Ok(url)
    }

    fn apply_auth(
        &self,
        builder: reqwest::RequestBuilder,
        auth: &BedrockAuth,
    ) -> reqwest::RequestBuilder {
        match auth {
            BedrockAuth::ApiKey(key) => builder.bearer_auth(key.expose()),
        }
    }

    async fn send(
        &self,
        request: BedrockRequest,
        auth: &BedrockAuth,
        action: &str,
        accept: &str,
    ) -> Result<Response, ProviderError> {
        let url = self.invoke_url(&request.region, &request.model_id, action)?;
        let timeout = self.request_timeout(request.stream);
        let body = build_api_body(request)?;
        let mut builder = self.client.post(url).header(ACCEPT, accept).json(&body);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = self
            .apply_auth(builder, auth)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let error_type = response
            .headers()
            .get(ERROR_TYPE_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body)
            .unwrap_or_else(|| format!("Bedrock request failed with status {status}"));

        map_http_error(status.as_u16(), error_type.as_deref(), message)
    }
}

impl BedrockTransport for BedrockHttpTransport {
    fn complete<'a>(
        &'a self,
        request: BedrockRequest,
        auth: BedrockAuth,
    ) -> ProviderFuture<'a, Result<RawResponse, ProviderError>> {
        Box::pin(async move {
            let response = self
                .send(request, &auth, "invoke", JSON_CONTENT_TYPE)
                .await?;
            let body = response.bytes().await.map_err(map_reqwest_error)?;
            Ok(RawResponse::new(body.to_vec()))
        })
    }

    fn stream<'a>(
        &'a self,
        request: BedrockRequest,
        auth: BedrockAuth,
    ) -> ProviderFuture<'a, Result<BoxedUnitStream<'a>, ProviderError>> {
        Box::pin(async move {
            let response = self
                .send(
                    request,
                    &auth,
                    "invoke-with-response-stream",
                    EVENT_STREAM_CONTENT_TYPE,
                )
                .await?;

            let chunks = response
                .bytes_stream()
                .map(|item| item.map_err(map_reqwest_error));

            Ok(Box::pin(decode_unit_stream(chunks)) as BoxedUnitStream<'a>)
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProviderError {
    // Strip the URL so the message carries no model path or query.
    let err = err.without_url();
    if err.is_timeout() {
        ProviderError::timeout(err.to_string())
    } else {
        ProviderError::transport(err.to_string())
    }
}

/// Turns raw event-stream bytes into provider units.
///
/// Non-chunk events are skipped, exception frames end the stream with an error,
/// and a stream that stops inside a frame is reported as a transport failure.
pub(crate) fn decode_unit_stream<'a, S, B>(
    chunks: S,
) -> impl Stream<Item = Result<RawUnit, ProviderError>> + Send + 'a
where
    S: Stream<Item = Result<B, ProviderError>> + Send + 'a,
    B: AsRef<[u8]> + Send + 'a,
{
    try_stream! {
        let mut chunks = Box::pin(chunks);
        let mut decoder = EventStreamDecoder::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            decoder.push(chunk.as_ref());

            while let Some(message) = decoder.next_message()? {
                if let Some(unit) = unit_from_message(&message)? {
                    yield unit;
                }
            }
        }

        if !decoder.is_empty() {
            Err::<(), _>(ProviderError::transport(format!(
                "event stream ended inside a frame ({} bytes buffered)",
                decoder.buffered_len()
            )))?;
        }
    }
}

pub(crate) fn unit_from_message(
    message: &EventStreamMessage,
) -> Result<Option<RawUnit>, ProviderError> {
    match message.message_type() {
        Some("exception") => {
            let payload = serde_json::from_slice::<BedrockExceptionPayload>(message.payload())
                .unwrap_or_default();
            let text = payload
                .into_message()
                .unwrap_or_else(|| "Bedrock stream reported an exception".to_string());
            Err(map_stream_exception(message.exception_type(), text))
        }
        Some("error") => {
            let code = message.header_str(":error-code");
            let text = message
                .header_str(":error-message")
                .unwrap_or("Bedrock stream reported an error")
                .to_string();
            Err(map_stream_exception(code, text))
        }
        Some("event") | None => {
            if message.event_type() != Some("chunk") {
                return Ok(None);
            }

            let payload = serde_json::from_slice::<BedrockChunkPayload>(message.payload())
                .map_err(|err| ProviderError::decode(format!("invalid chunk envelope: {err}")))?;
            let bytes = BASE64
                .decode(payload.bytes.as_bytes())
                .map_err(|err| ProviderError::decode(format!("invalid chunk encoding: {err}")))?;

            Ok(Some(RawUnit::new(bytes)))
        }
        Some(_) => Ok(None),
    }
}
