//! Common `lprovider` imports for downstream crates.

pub use crate::{
    BoxedUnitStream, DeliveryMode, InvokeRequest, ProviderError, ProviderErrorKind,
    ProviderFuture, ProviderGateway, RawResponse, RawUnit, RequestConfig, Role,
    SecureCredentialManager, Turn, VecUnitStream,
};
pub use lcommon::BoxFuture;
