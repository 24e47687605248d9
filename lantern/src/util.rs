//! Small convenience constructors and the REPL command grammar.

use crate::{ChatError, Conversation, RequestConfig, Role, Turn, UiCommand};

pub const CLEAR_COMMAND: &str = "/clear";
pub const EXPORT_COMMAND: &str = "/export";

pub fn user_turn(content: impl Into<String>) -> Turn {
    Turn::new(Role::User, content)
}

pub fn assistant_turn(content: impl Into<String>) -> Turn {
    Turn::new(Role::Assistant, content)
}

pub fn request_config(model_id: impl Into<String>, region: impl Into<String>) -> RequestConfig {
    RequestConfig::default()
        .with_model_id(model_id)
        .with_region(region)
}

/// Seeds a conversation from a history that alternates user and assistant turns.
pub fn conversation_from(turns: impl IntoIterator<Item = Turn>) -> Result<Conversation, ChatError> {
    let mut conversation = Conversation::new();
    for (index, turn) in turns.into_iter().enumerate() {
        let expected = if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        };
        if turn.role != expected {
            return Err(ChatError::invalid_request(format!(
                "turn {index} must be a {} turn",
                expected.as_str()
            )));
        }
        conversation.append(turn)?;
    }
    Ok(conversation)
}

/// Maps one input line to a command. Blank lines map to nothing.
///
/// ```rust
/// use lantern::{UiCommand, parse_command};
///
/// assert_eq!(parse_command("/clear"), Some(UiCommand::ClearConversation));
/// assert_eq!(
///     parse_command("/export fn main() {}"),
///     Some(UiCommand::ExportToEditor("fn main() {}".to_string()))
/// );
/// assert_eq!(parse_command("   "), None);
/// ```
pub fn parse_command(line: &str) -> Option<UiCommand> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed == CLEAR_COMMAND {
        return Some(UiCommand::ClearConversation);
    }

    let body = line.trim_end_matches(['\r', '\n']);
    if let Some(rest) = body.trim_start().strip_prefix(EXPORT_COMMAND) {
        if rest.is_empty() {
            return Some(UiCommand::ExportToEditor(String::new()));
        }
        if let Some(text) = rest.strip_prefix(' ') {
            return Some(UiCommand::ExportToEditor(text.to_string()));
        }
    }

    Some(UiCommand::SubmitPrompt(body.to_string()))
}
