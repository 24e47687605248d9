mod auth;
mod errors;
mod eventstream;
mod gateway;
mod serde_api;
mod transport;
mod types;

pub use eventstream::{EventStreamDecoder, EventStreamMessage, HeaderValue};
pub use gateway::BedrockGateway;
pub use transport::{BedrockHttpTransport, BedrockTransport};
pub use types::{BedrockAuth, BedrockMessage, BedrockRequest};
