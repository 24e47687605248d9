//! Collaborators the session talks to: the UI relay and the editor sink.
//!
//! ```rust
//! use lchat::{ChannelRelay, UiRelay, UiSignal};
//!
//! let (relay, mut signals) = ChannelRelay::new();
//! relay.send(UiSignal::ResponseStarted);
//! assert_eq!(signals.try_recv().ok(), Some(UiSignal::ResponseStarted));
//! ```

use lcommon::BoxFuture;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::{ChatError, UiSignal};

/// Fire-and-forget delivery of signals to the UI.
pub trait UiRelay: Send + Sync {
    fn send(&self, signal: UiSignal);
}

#[derive(Debug, Clone)]
pub struct ChannelRelay {
    sender: UnboundedSender<UiSignal>,
}

impl ChannelRelay {
    pub fn new() -> (Self, UnboundedReceiver<UiSignal>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn from_sender(sender: UnboundedSender<UiSignal>) -> Self {
        Self { sender }
    }
}

impl UiRelay for ChannelRelay {
    fn send(&self, signal: UiSignal) {
        // A closed panel just stops listening.
        let _ = self.sender.send(signal);
    }
}

/// Inserts exported text into the active editor.
pub trait EditorSink: Send + Sync {
    fn insert<'a>(&'a self, text: String) -> BoxFuture<'a, Result<(), ChatError>>;
}
