//! Common imports for most Lantern applications.

pub use crate::{
    assistant_turn, conversation_from, default_hooks, parse_command, request_config,
    session_builder, spawn_session, spawn_session_with, user_turn,
};
pub use crate::{
    build_gateway_from_api_key, build_gateway_from_env, build_gateway_with_config,
    GatewayBuildConfig,
};
pub use crate::{turn, turns};
pub use crate::{
    BoxFuture, ChatConfig, ChatError, ChatErrorKind, ChatRuntimeHooks, ChatSession,
    ChatSessionBuilder, ConfigError, Conversation, DeliveryMode, EditorSink, ErrorCategory,
    ProviderError, ProviderErrorKind, ProviderGateway, RequestConfig, Role, SessionHandle,
    SessionId, Turn, TurnOutcome, TurnState, UiCommand, UiRelay, UiSignal, UserMessage,
};
