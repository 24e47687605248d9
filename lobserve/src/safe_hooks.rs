use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use lchat::{ChatError, ChatRuntimeHooks, ErrorCategory};
use lcommon::SessionId;
use lprovider::DeliveryMode;

/// Keeps a panicking hook from taking the session down with it.
pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatRuntimeHooks for SafeChatHooks<H>
where
    H: ChatRuntimeHooks,
{
    fn on_turn_start(&self, session_id: &SessionId, mode: DeliveryMode, history_len: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_turn_start(session_id, mode, history_len)
        }));
    }

    fn on_fragment(&self, session_id: &SessionId, chars: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_fragment(session_id, chars)));
    }

    fn on_turn_complete(
        &self,
        session_id: &SessionId,
        mode: DeliveryMode,
        chars: usize,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_turn_complete(session_id, mode, chars, elapsed)
        }));
    }

    fn on_turn_failure(
        &self,
        session_id: &SessionId,
        category: ErrorCategory,
        error: &ChatError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_turn_failure(session_id, category, error, elapsed)
        }));
    }

    fn on_conversation_cleared(&self, session_id: &SessionId, removed_turns: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_conversation_cleared(session_id, removed_turns)
        }));
    }

    fn on_command_rejected(
        &self,
        session_id: &SessionId,
        command: &'static str,
        error: &ChatError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_command_rejected(session_id, command, error)
        }));
    }
}
