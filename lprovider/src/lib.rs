//! Provider gateway abstractions and the Bedrock runtime adapter.
//!
//! ```rust
//! use lprovider::{InvokeRequest, RequestConfig, Turn};
//!
//! let turns = vec![Turn::user("Explain this code")];
//! let request = InvokeRequest::new(turns, RequestConfig::default());
//! assert!(request.validate().is_ok());
//! ```

mod credentials;
mod error;
mod gateway;
mod model;
mod raw;

pub mod adapters;
pub mod prelude;

pub use credentials::{BEDROCK_API_KEY_ENV, SecretString, SecureCredentialManager};
pub use error::{ProviderError, ProviderErrorKind};
pub use gateway::{ProviderFuture, ProviderGateway};
pub use lcommon::BoxFuture;
pub use model::{
    ANTHROPIC_VERSION, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_REGION, DeliveryMode,
    InvokeRequest, RequestConfig, Role, Turn,
};
pub use raw::{BoxedUnitStream, RawResponse, RawUnit, RawUnitStream, VecUnitStream};
