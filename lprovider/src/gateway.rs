use std::future::Future;
use std::pin::Pin;

use crate::{BoxedUnitStream, InvokeRequest, ProviderError, RawResponse};

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Boundary to a remote inference backend.
///
/// Both calls receive the full conversation snapshot. Implementations own
/// transport concerns such as timeouts and authentication; they never retry on
/// behalf of the caller.
pub trait ProviderGateway: Send + Sync {
    fn name(&self) -> &'static str;

    fn invoke_streaming<'a>(
        &'a self,
        request: InvokeRequest,
    ) -> ProviderFuture<'a, Result<BoxedUnitStream<'a>, ProviderError>>;

    fn invoke_complete<'a>(
        &'a self,
        request: InvokeRequest,
    ) -> ProviderFuture<'a, Result<RawResponse, ProviderError>>;
}
