//! Metrics-based observability hooks for chat turns.

use std::time::Duration;

use lchat::{ChatError, ChatRuntimeHooks, ErrorCategory};
use lcommon::SessionId;
use lprovider::DeliveryMode;

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

fn mode_label(mode: DeliveryMode) -> &'static str {
    match mode {
        DeliveryMode::Streaming => "streaming",
        DeliveryMode::Complete => "complete",
    }
}

impl ChatRuntimeHooks for MetricsObservabilityHooks {
    fn on_turn_start(&self, _session_id: &SessionId, mode: DeliveryMode, _history_len: usize) {
        metrics::counter!("lantern_turn_start_total", "delivery_mode" => mode_label(mode))
            .increment(1);
    }

    fn on_fragment(&self, _session_id: &SessionId, chars: usize) {
        metrics::counter!("lantern_fragment_total").increment(1);
        metrics::counter!("lantern_fragment_chars_total").increment(chars as u64);
    }

    fn on_turn_complete(
        &self,
        _session_id: &SessionId,
        mode: DeliveryMode,
        chars: usize,
        elapsed: Duration,
    ) {
        metrics::counter!("lantern_turn_success_total", "delivery_mode" => mode_label(mode))
            .increment(1);
        metrics::histogram!(
            "lantern_turn_duration_seconds",
            "delivery_mode" => mode_label(mode),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
        metrics::histogram!("lantern_turn_response_chars", "delivery_mode" => mode_label(mode))
            .record(chars as f64);
    }

    fn on_turn_failure(
        &self,
        _session_id: &SessionId,
        category: ErrorCategory,
        error: &ChatError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "lantern_turn_failure_total",
            "category" => category.as_str(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "lantern_turn_duration_seconds",
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_conversation_cleared(&self, _session_id: &SessionId, _removed_turns: usize) {
        metrics::counter!("lantern_conversation_cleared_total").increment(1);
    }

    fn on_command_rejected(
        &self,
        _session_id: &SessionId,
        command: &'static str,
        error: &ChatError,
    ) {
        metrics::counter!(
            "lantern_command_rejected_total",
            "command" => command,
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }
}
