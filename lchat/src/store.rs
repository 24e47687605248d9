//! In-memory conversation history owned by a single session.
//!
//! ```rust
//! use lchat::Conversation;
//! use lprovider::Turn;
//!
//! let mut conversation = Conversation::new();
//! conversation.append(Turn::user("Explain this code")).expect("idle append");
//! conversation.begin_request().expect("idle session");
//! conversation.append(Turn::assistant("It works.")).expect("first reply");
//! conversation.finish_request();
//!
//! assert_eq!(conversation.len(), 2);
//! ```

use lprovider::{Role, Turn};

use crate::ChatError;

/// Ordered turn history plus the in-flight marker for the current request.
///
/// While a request is in flight the only accepted append is the single
/// assistant turn that answers it, and the history cannot be cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
    in_flight: bool,
    assistant_appended: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) -> Result<(), ChatError> {
        if self.in_flight {
            match turn.role {
                Role::User => {
                    return Err(ChatError::invalid_state(
                        "cannot add a user turn while a request is in flight",
                    ));
                }
                Role::Assistant if self.assistant_appended => {
                    return Err(ChatError::invalid_state(
                        "the in-flight request already has an assistant turn",
                    ));
                }
                Role::Assistant => self.assistant_appended = true,
            }
        }

        self.turns.push(turn);
        Ok(())
    }

    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn clear(&mut self) -> Result<(), ChatError> {
        if self.in_flight {
            return Err(ChatError::invalid_state(
                "cannot clear the conversation while a request is in flight",
            ));
        }

        self.turns.clear();
        Ok(())
    }

    pub fn begin_request(&mut self) -> Result<(), ChatError> {
        if self.in_flight {
            return Err(ChatError::invalid_state("a request is already in flight"));
        }

        self.in_flight = true;
        self.assistant_appended = false;
        Ok(())
    }

    pub fn finish_request(&mut self) {
        self.in_flight = false;
        self.assistant_appended = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatErrorKind;

    #[test]
    fn snapshot_preserves_append_order() {
        let mut conversation = Conversation::new();
        conversation.append(Turn::user("one")).expect("append");
        conversation.append(Turn::assistant("two")).expect("append");
        conversation.append(Turn::user("three")).expect("append");

        let contents = conversation
            .snapshot()
            .into_iter()
            .map(|turn| turn.content)
            .collect::<Vec<_>>();
        assert_eq!(contents, vec!["one", "two", "three"]);
        assert_eq!(conversation.last().map(|turn| turn.role), Some(Role::User));
    }

    #[test]
    fn in_flight_request_accepts_exactly_one_assistant_turn() {
        let mut conversation = Conversation::new();
        conversation.append(Turn::user("question")).expect("append");
        conversation.begin_request().expect("begin");

        let err = conversation
            .append(Turn::user("another question"))
            .expect_err("user turn must be rejected");
        assert_eq!(err.kind, ChatErrorKind::InvalidState);

        conversation.append(Turn::assistant("answer")).expect("first reply");
        let err = conversation
            .append(Turn::assistant("second answer"))
            .expect_err("second reply must be rejected");
        assert_eq!(err.kind, ChatErrorKind::InvalidState);

        conversation.finish_request();
        assert_eq!(conversation.len(), 2);
    }

    #[test]
    fn clear_is_rejected_while_in_flight() {
        let mut conversation = Conversation::new();
        conversation.append(Turn::user("question")).expect("append");
        conversation.begin_request().expect("begin");

        let err = conversation.clear().expect_err("clear must be rejected");
        assert_eq!(err.kind, ChatErrorKind::InvalidState);
        assert_eq!(conversation.len(), 1);

        conversation.finish_request();
        conversation.clear().expect("clear after finish");
        assert!(conversation.is_empty());
    }

    #[test]
    fn begin_request_rejects_nested_requests() {
        let mut conversation = Conversation::new();
        conversation.begin_request().expect("begin");
        assert!(conversation.is_in_flight());
        assert!(conversation.begin_request().is_err());
    }
}
