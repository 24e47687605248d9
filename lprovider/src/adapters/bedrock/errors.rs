//! Mapping from Bedrock service error names and HTTP statuses to provider kinds.

use crate::ProviderError;

/// Maps an HTTP failure. The service error type, when present, wins over the status.
pub(crate) fn map_http_error(
    status: u16,
    error_type: Option<&str>,
    message: String,
) -> ProviderError {
    let error = match error_type.and_then(|name| map_error_type(name, &message)) {
        Some(error) => error,
        None => match status {
            401 => ProviderError::authentication(message),
            403 => ProviderError::access_denied(message),
            404 => ProviderError::not_found(message),
            400 | 422 if names_invalid_model(&message) => ProviderError::not_found(message),
            400 | 422 => ProviderError::invalid_request(message),
            429 => ProviderError::throttled(message),
            408 | 504 => ProviderError::timeout(message),
            500 | 502 | 503 => ProviderError::unavailable(message),
            _ => ProviderError::transport(message),
        },
    };

    error.with_status(status)
}

/// Maps an in-stream exception frame.
pub(crate) fn map_stream_exception(exception_type: Option<&str>, message: String) -> ProviderError {
    let fallback = || ProviderError::other(message.clone());
    exception_type
        .and_then(|name| map_error_type(name, &message))
        .unwrap_or_else(fallback)
}

fn map_error_type(error_type: &str, message: &str) -> Option<ProviderError> {
    // Header values look like `AccessDeniedException:http://internal.amazon.com/...`.
    let name = error_type
        .split(':')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    let message = message.to_string();

    let error = match name.as_str() {
        "unrecognizedclientexception"
        | "invalidsignatureexception"
        | "expiredtokenexception"
        | "missingauthenticationtokenexception"
        | "incompletesignatureexception" => ProviderError::authentication(message),
        "accessdeniedexception" => ProviderError::access_denied(message),
        "resourcenotfoundexception" => ProviderError::not_found(message),
        "validationexception" if names_invalid_model(&message) => ProviderError::not_found(message),
        "validationexception" => ProviderError::invalid_request(message),
        "throttlingexception" | "servicequotaexceededexception" => {
            ProviderError::throttled(message)
        }
        "modeltimeoutexception" => ProviderError::timeout(message),
        "internalserverexception" | "serviceunavailableexception" | "modelnotreadyexception" => {
            ProviderError::unavailable(message)
        }
        "modelstreamerrorexception" | "modelerrorexception" => ProviderError::transport(message),
        _ => return None,
    };

    Some(error)
}

fn names_invalid_model(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("model identifier is invalid") || message.contains("model id is invalid")
}
