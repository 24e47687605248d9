//! Runtime hook contracts for observing chat turns.
//!
//! Hooks are the operator diagnostic channel: failures arrive with the raw
//! fault, which is never relayed to the UI.
//!
//! ```rust
//! use lchat::{ChatRuntimeHooks, NoopChatHooks};
//!
//! fn accepts_hooks(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! let hooks = NoopChatHooks;
//! accepts_hooks(&hooks);
//! ```

use std::time::Duration;

use lcommon::SessionId;
use lprovider::DeliveryMode;

use crate::{ChatError, ErrorCategory};

pub trait ChatRuntimeHooks: Send + Sync {
    fn on_turn_start(&self, _session_id: &SessionId, _mode: DeliveryMode, _history_len: usize) {}

    fn on_fragment(&self, _session_id: &SessionId, _chars: usize) {}

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        _mode: DeliveryMode,
        _chars: usize,
        _elapsed: Duration,
    ) {
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        _category: ErrorCategory,
        _error: &ChatError,
        _elapsed: Duration,
    ) {
    }

    fn on_conversation_cleared(&self, _session_id: &SessionId, _removed_turns: usize) {}

    fn on_command_rejected(
        &self,
        _session_id: &SessionId,
        _command: &'static str,
        _error: &ChatError,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatHooks;

impl ChatRuntimeHooks for NoopChatHooks {}
