//! Production-friendly observability hooks for chat turns.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lchat::ChatRuntimeHooks;
//! use lobserve::{MetricsObservabilityHooks, SafeChatHooks, TracingObservabilityHooks};
//!
//! let _hooks: Arc<dyn ChatRuntimeHooks> = Arc::new(SafeChatHooks::new(TracingObservabilityHooks));
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutChatHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeChatHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutChatHooks, MetricsObservabilityHooks, SafeChatHooks, TracingObservabilityHooks,
    };
}
