//! Broadcasts every hook call to several hook implementations in order.

use std::sync::Arc;
use std::time::Duration;

use lchat::{ChatError, ChatRuntimeHooks, ErrorCategory};
use lcommon::SessionId;
use lprovider::DeliveryMode;

#[derive(Clone, Default)]
pub struct FanoutChatHooks {
    hooks: Vec<Arc<dyn ChatRuntimeHooks>>,
}

impl FanoutChatHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks.push(hooks);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl ChatRuntimeHooks for FanoutChatHooks {
    fn on_turn_start(&self, session_id: &SessionId, mode: DeliveryMode, history_len: usize) {
        for hooks in &self.hooks {
            hooks.on_turn_start(session_id, mode, history_len);
        }
    }

    fn on_fragment(&self, session_id: &SessionId, chars: usize) {
        for hooks in &self.hooks {
            hooks.on_fragment(session_id, chars);
        }
    }

    fn on_turn_complete(
        &self,
        session_id: &SessionId,
        mode: DeliveryMode,
        chars: usize,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_turn_complete(session_id, mode, chars, elapsed);
        }
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        category: ErrorCategory,
        error: &ChatError,
        elapsed: Duration,
    ) {
        for hooks in &self.hooks {
            hooks.on_turn_failure(session_id, category, error, elapsed);
        }
    }

    fn on_conversation_cleared(&self, session_id: &SessionId, removed_turns: usize) {
        for hooks in &self.hooks {
            hooks.on_conversation_cleared(session_id, removed_turns);
        }
    }

    fn on_command_rejected(
        &self,
        session_id: &SessionId,
        command: &'static str,
        error: &ChatError,
    ) {
        for hooks in &self.hooks {
            hooks.on_command_rejected(session_id, command, error);
        }
    }
}
