//! Inbound events as delivered by a transport.

use crate::model::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A slash command such as `/start`.
    Command,
    /// An inline button press carrying an action token.
    Button,
    /// Any other text message.
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub user_id: UserId,
    pub kind: EventKind,
    pub payload: String,
}

impl InboundEvent {
    pub fn command(user_id: UserId, command: impl Into<String>) -> Self {
        Self::new(user_id, EventKind::Command, command)
    }

    pub fn button(user_id: UserId, token: impl Into<String>) -> Self {
        Self::new(user_id, EventKind::Button, token)
    }

    pub fn text(user_id: UserId, text: impl Into<String>) -> Self {
        Self::new(user_id, EventKind::Text, text)
    }

    fn new(user_id: UserId, kind: EventKind, payload: impl Into<String>) -> Self {
        Self {
            user_id,
            kind,
            payload: payload.into(),
        }
    }

    /// Command name without the slash, arguments or `@botname` suffix: `/start@shop x` → `start`.
    pub fn command_name(&self) -> &str {
        let word = self.payload.split_whitespace().next().unwrap_or_default();
        let word = word.strip_prefix('/').unwrap_or(word);
        word.split('@').next().unwrap_or_default()
    }
}
