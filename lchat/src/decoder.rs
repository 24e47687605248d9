//! Typed decoding of provider output into assistant text.
//!
//! Streaming units are parsed into a [`ProviderEnvelope`]; only a non-empty
//! `delta.text` produces a fragment. Complete responses use the first content
//! item's `text`, falling back to the pretty-printed body.
//!
//! ```rust
//! use lchat::decode_unit;
//! use lprovider::RawUnit;
//!
//! let fragment = decode_unit(&RawUnit::from(r#"{"delta":{"text":"It "}}"#))
//!     .expect("unit should decode")
//!     .expect("unit carries text");
//! assert_eq!(fragment.text, "It ");
//!
//! let nothing = decode_unit(&RawUnit::from(r#"{"type":"message_stop"}"#)).expect("decode");
//! assert!(nothing.is_none());
//! ```

use lprovider::{RawResponse, RawUnit};
use serde::Deserialize;
use serde_json::Value;

use crate::{ChatError, StreamFragment};

/// What a provider payload turned out to contain.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderEnvelope {
    StreamingDelta(String),
    CompleteContent(String),
    Unrecognized(Value),
}

impl ProviderEnvelope {
    pub fn from_unit(unit: &RawUnit) -> Result<Self, ChatError> {
        let value = parse_object(unit.as_bytes(), "stream unit")?;
        let chunk = StreamChunkBody::deserialize(&value)
            .map_err(|err| ChatError::decode(format!("unexpected stream unit shape: {err}")))?;

        match chunk.delta.and_then(|delta| delta.text) {
            Some(text) if !text.is_empty() => Ok(Self::StreamingDelta(text)),
            _ => Ok(Self::Unrecognized(value)),
        }
    }

    pub fn from_response(response: &RawResponse) -> Result<Self, ChatError> {
        let value = serde_json::from_slice::<Value>(response.as_bytes())
            .map_err(|err| ChatError::decode(format!("response body is not JSON: {err}")))?;

        let text = CompleteBody::deserialize(&value)
            .ok()
            .and_then(|body| body.content.into_iter().next())
            .and_then(|item| item.text)
            .filter(|text| !text.is_empty());

        match text {
            Some(text) => Ok(Self::CompleteContent(text)),
            None => Ok(Self::Unrecognized(value)),
        }
    }
}

/// Decodes one streaming unit. Units without text yield `None`.
pub fn decode_unit(unit: &RawUnit) -> Result<Option<StreamFragment>, ChatError> {
    match ProviderEnvelope::from_unit(unit)? {
        ProviderEnvelope::StreamingDelta(text) => Ok(Some(StreamFragment::new(text))),
        ProviderEnvelope::CompleteContent(_) | ProviderEnvelope::Unrecognized(_) => Ok(None),
    }
}

/// Extracts the assistant text from a complete response. Never returns an empty string.
pub fn decode_complete(response: &RawResponse) -> Result<String, ChatError> {
    match ProviderEnvelope::from_response(response)? {
        ProviderEnvelope::CompleteContent(text) | ProviderEnvelope::StreamingDelta(text) => {
            Ok(text)
        }
        ProviderEnvelope::Unrecognized(value) => serde_json::to_string_pretty(&value)
            .map_err(|err| ChatError::decode(format!("response body cannot be rendered: {err}"))),
    }
}

fn parse_object(bytes: &[u8], what: &str) -> Result<Value, ChatError> {
    let value = serde_json::from_slice::<Value>(bytes)
        .map_err(|err| ChatError::decode(format!("{what} is not JSON: {err}")))?;

    if !value.is_object() {
        return Err(ChatError::decode(format!("{what} is not a JSON object")));
    }

    Ok(value)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StreamChunkBody {
    delta: Option<DeltaBody>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeltaBody {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompleteBody {
    content: Vec<ContentItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContentItem {
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatErrorKind;

    #[test]
    fn delta_text_becomes_one_fragment() {
        let unit = RawUnit::from(
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"works."}}"#,
        );
        let fragment = decode_unit(&unit).expect("decode").expect("fragment");
        assert_eq!(fragment.text, "works.");
    }

    #[test]
    fn units_without_text_yield_nothing() {
        for body in [
            r#"{"type":"message_start","message":{"role":"assistant"}}"#,
            r#"{"type":"message_delta","delta":{"stop_reason":"end_turn"}}"#,
            r#"{"delta":{"text":""}}"#,
            r#"{"delta":null}"#,
        ] {
            let decoded = decode_unit(&RawUnit::from(body)).expect("decode");
            assert!(decoded.is_none(), "{body} should not yield a fragment");
        }
    }

    #[test]
    fn malformed_units_fail_with_decode_error() {
        for body in ["not json", "[1,2,3]", r#""text""#, r#"{"delta":"oops"}"#] {
            let err = decode_unit(&RawUnit::from(body)).expect_err("decode should fail");
            assert_eq!(err.kind, ChatErrorKind::Decode, "{body}");
        }
    }

    #[test]
    fn complete_response_uses_first_content_text() {
        let response = RawResponse::from(
            r#"{"content":[{"type":"text","text":"first"},{"type":"text","text":"second"}]}"#,
        );
        assert_eq!(decode_complete(&response).expect("decode"), "first");
    }

    #[test]
    fn complete_response_without_text_falls_back_to_pretty_json() {
        let response = RawResponse::from(r#"{"content":[]}"#);
        let text = decode_complete(&response).expect("decode");
        assert_eq!(text, "{\n  \"content\": []\n}");

        let titan = RawResponse::from(r#"{"results":[{"outputText":"hi"}]}"#);
        let text = decode_complete(&titan).expect("decode");
        assert!(text.contains("\"outputText\": \"hi\""));
        assert!(!text.is_empty());
    }

    #[test]
    fn complete_response_that_is_not_json_fails() {
        let err = decode_complete(&RawResponse::from("<html>")).expect_err("decode should fail");
        assert_eq!(err.kind, ChatErrorKind::Decode);
    }

    #[test]
    fn envelope_variants_are_tagged() {
        let streaming = ProviderEnvelope::from_unit(&RawUnit::from(r#"{"delta":{"text":"a"}}"#))
            .expect("decode");
        assert_eq!(streaming, ProviderEnvelope::StreamingDelta("a".to_string()));

        let complete =
            ProviderEnvelope::from_response(&RawResponse::from(r#"{"content":[{"text":"b"}]}"#))
                .expect("decode");
        assert_eq!(complete, ProviderEnvelope::CompleteContent("b".to_string()));

        let other =
            ProviderEnvelope::from_unit(&RawUnit::from(r#"{"ping":true}"#)).expect("decode");
        assert!(matches!(other, ProviderEnvelope::Unrecognized(_)));
    }
}
