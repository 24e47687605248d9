//! Unified facade over the Lantern workspace crates.
//!
//! This crate is the single dependency for most editor integrations. It
//! re-exports the core lantern crates, builds Bedrock gateways from config and
//! credentials, and spawns chat sessions behind command and signal channels.

mod macros;

pub mod config;
pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod util;

pub use lchat;
pub use lcommon;
pub use lobserve;
pub use lprovider;

pub use lchat::{
    ChannelRelay, ChatError, ChatErrorKind, ChatRuntimeHooks, ChatSession, ChatSessionBuilder,
    Conversation, EditorSink, ErrorCategory, ErrorClassifier, NoopChatHooks, ProviderEnvelope,
    StreamFragment, TurnOutcome, TurnState, UiCommand, UiRelay, UiSignal, UserMessage, categorize,
    classify, decode_complete, decode_unit,
};
pub use lcommon::{BoxFuture, SessionId, redact_secrets, sanitize_for_display};
pub use lobserve::{
    FanoutChatHooks, MetricsObservabilityHooks, SafeChatHooks, TracingObservabilityHooks,
};
pub use lprovider::{
    BEDROCK_API_KEY_ENV, BoxedUnitStream, DEFAULT_MAX_TOKENS, DEFAULT_MODEL_ID, DEFAULT_REGION,
    DeliveryMode, InvokeRequest, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderGateway, RawResponse, RawUnit, RequestConfig, Role, SecretString,
    SecureCredentialManager, Turn, VecUnitStream,
};

pub use config::{ChatConfig, ConfigError, ConfigErrorKind};
pub use providers::{
    GatewayBuildConfig, build_gateway_from_api_key, build_gateway_from_env,
    build_gateway_with_config,
};
pub use runtime::{
    SessionHandle, default_hooks, session_builder, spawn_session, spawn_session_with,
};
pub use util::{
    assistant_turn, conversation_from, parse_command, request_config, user_turn,
};
