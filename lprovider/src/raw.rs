//! Undecoded provider output and in-memory unit stream utilities.
//!
//! ```rust
//! use lprovider::{BoxedUnitStream, RawUnit, VecUnitStream};
//!
//! let stream = VecUnitStream::new(vec![Ok(RawUnit::from(r#"{"delta":{"text":"hi"}}"#))]);
//! let _boxed: BoxedUnitStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::ProviderError;

/// One item of a provider's streaming transport, still provider-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUnit {
    bytes: Vec<u8>,
}

impl RawUnit {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<&str> for RawUnit {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for RawUnit {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

/// A complete, undecoded non-streaming response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    body: Vec<u8>,
}

impl RawResponse {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self { body: body.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }
}

impl From<&str> for RawResponse {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<String> for RawResponse {
    fn from(value: String) -> Self {
        Self::new(value.into_bytes())
    }
}

/// Provider unit stream contract.
///
/// Invariants for consumers:
/// - Units are yielded in transport order.
/// - An `Err` item is terminal; the consumer must stop polling after it.
/// - Once the stream yields `None`, it must not yield additional items.
pub trait RawUnitStream: Stream<Item = Result<RawUnit, ProviderError>> + Send {}

impl<T> RawUnitStream for T where T: Stream<Item = Result<RawUnit, ProviderError>> + Send {}

pub type BoxedUnitStream<'a> = Pin<Box<dyn RawUnitStream + 'a>>;

#[derive(Debug)]
pub struct VecUnitStream {
    units: VecDeque<Result<RawUnit, ProviderError>>,
}

impl VecUnitStream {
    pub fn new(units: Vec<Result<RawUnit, ProviderError>>) -> Self {
        Self {
            units: units.into(),
        }
    }
}

impl Stream for VecUnitStream {
    type Item = Result<RawUnit, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<RawUnit, ProviderError>>> {
        Poll::Ready(self.units.pop_front())
    }
}
