//! Tracing-based observability hooks for chat turns.
//!
//! ```rust
//! use lchat::ChatRuntimeHooks;
//! use lobserve::TracingObservabilityHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use lchat::{ChatError, ChatRuntimeHooks, ErrorCategory};
use lcommon::SessionId;
use lprovider::DeliveryMode;

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ChatRuntimeHooks for TracingObservabilityHooks {
    fn on_turn_start(&self, session_id: &SessionId, mode: DeliveryMode, history_len: usize) {
        tracing::info!(
            phase = "turn",
            event = "start",
            session_id = %session_id,
            delivery_mode = ?mode,
            history_len
        );
    }

    fn on_fragment(&self, session_id: &SessionId, chars: usize) {
        tracing::trace!(
            phase = "turn",
            event = "fragment",
            session_id = %session_id,
            chars
        );
    }

    fn on_turn_complete(
        &self,
        session_id: &SessionId,
        mode: DeliveryMode,
        chars: usize,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "turn",
            event = "complete",
            session_id = %session_id,
            delivery_mode = ?mode,
            chars,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        category: ErrorCategory,
        error: &ChatError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "turn",
            event = "failure",
            session_id = %session_id,
            category = category.as_str(),
            error_kind = ?error.kind,
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error
        );
    }

    fn on_conversation_cleared(&self, session_id: &SessionId, removed_turns: usize) {
        tracing::info!(
            phase = "conversation",
            event = "cleared",
            session_id = %session_id,
            removed_turns
        );
    }

    fn on_command_rejected(
        &self,
        session_id: &SessionId,
        command: &'static str,
        error: &ChatError,
    ) {
        tracing::warn!(
            phase = "command",
            event = "rejected",
            session_id = %session_id,
            command,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
