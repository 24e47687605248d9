//! Conversation sessions over a provider gateway.
//!
//! ```rust
//! use lchat::{Conversation, UiCommand};
//!
//! let conversation = Conversation::new();
//! assert!(conversation.is_empty());
//! assert_eq!(UiCommand::ClearConversation.name(), "clear_conversation");
//! ```

mod classifier;
mod decoder;
mod error;
mod hooks;
mod relay;
mod session;
mod store;
mod types;

pub mod prelude {
    pub use crate::{
        ChannelRelay, ChatError, ChatErrorKind, ChatRuntimeHooks, ChatSession,
        ChatSessionBuilder, Conversation, EditorSink, ErrorCategory, NoopChatHooks, TurnOutcome,
        TurnState, UiCommand, UiRelay, UiSignal, UserMessage,
    };
    pub use lcommon::SessionId;
}

pub use classifier::{ErrorCategory, ErrorClassifier, UserMessage, categorize, classify};
pub use decoder::{ProviderEnvelope, decode_complete, decode_unit};
pub use error::{ChatError, ChatErrorKind};
pub use hooks::{ChatRuntimeHooks, NoopChatHooks};
pub use lcommon::SessionId;
pub use relay::{ChannelRelay, EditorSink, UiRelay};
pub use session::{ChatSession, ChatSessionBuilder};
pub use store::Conversation;
pub use types::{StreamFragment, TurnOutcome, TurnState, UiCommand, UiSignal};
