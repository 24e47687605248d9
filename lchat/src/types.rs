//! UI protocol, turn state, and outcome types.

use crate::UserMessage;

/// A piece of assistant output relayed as soon as it is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFragment {
    pub text: String,
}

impl StreamFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Signals sent to the chat panel.
///
/// `Error` ends a failed response. `CommandRejected` reports a refused command
/// and never ends the response that may be streaming alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSignal {
    ResponseStarted,
    Fragment(String),
    ResponseEnded,
    Error(String),
    CommandRejected {
        command: &'static str,
        message: String,
    },
}

/// Commands received from the chat panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    SubmitPrompt(String),
    ClearConversation,
    ExportToEditor(String),
}

impl UiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitPrompt(_) => "submit_prompt",
            Self::ClearConversation => "clear_conversation",
            Self::ExportToEditor(_) => "export_to_editor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    AwaitingResponse,
    Streaming,
    Finalizing,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Completed { assistant_text: String },
    Failed(UserMessage),
}
