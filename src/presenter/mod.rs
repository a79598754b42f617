//! # Outbound Presenter
//!
//! The storefront never talks to a chat platform directly. Handlers produce [`Reply`] values
//! (a message with an optional inline keyboard, or a short-lived notice) and a [`Presenter`]
//! delivers them. A real transport maps [`SendMode::Edit`] to editing the message that carried
//! the pressed button, and [`Notice`] to a callback answer or toast.

use crate::model::UserId;
use async_trait::async_trait;
use thiserror::Error;

/// One inline button: what the user sees and the action token sent back when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: String,
}

impl Button {
    pub fn new(label: impl Into<String>, action: impl ToString) -> Self {
        Self {
            label: label.into(),
            action: action.to_string(),
        }
    }
}

/// Ordered grid of buttons, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row; empty rows are skipped.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        if !buttons.is_empty() {
            self.rows.push(buttons);
        }
        self
    }

    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.rows.iter().flatten()
    }

    /// Looks a button up by its action token.
    pub fn find(&self, action: &str) -> Option<&Button> {
        self.buttons().find(|b| b.action == action)
    }
}

/// Whether a message replaces the one the user interacted with or is sent fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    New,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub target: UserId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
    pub mode: SendMode,
}

/// Transient acknowledgement of a button press, optionally shown as an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: UserId,
    pub text: String,
    pub alert: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Message(OutboundMessage),
    Notice(Notice),
}

impl Reply {
    pub fn send(target: UserId, text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        Self::message(target, text, keyboard, SendMode::New)
    }

    pub fn edit(target: UserId, text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        Self::message(target, text, keyboard, SendMode::Edit)
    }

    fn message(
        target: UserId,
        text: impl Into<String>,
        keyboard: Option<Keyboard>,
        mode: SendMode,
    ) -> Self {
        Reply::Message(OutboundMessage {
            target,
            text: text.into(),
            keyboard,
            mode,
        })
    }

    pub fn notice(target: UserId, text: impl Into<String>) -> Self {
        Reply::Notice(Notice {
            target,
            text: text.into(),
            alert: false,
        })
    }

    pub fn alert(target: UserId, text: impl Into<String>) -> Self {
        Reply::Notice(Notice {
            target,
            text: text.into(),
            alert: true,
        })
    }

    pub fn target(&self) -> UserId {
        match self {
            Reply::Message(m) => m.target,
            Reply::Notice(n) => n.target,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Reply::Message(m) => &m.text,
            Reply::Notice(n) => &n.text,
        }
    }
}

#[derive(Debug, Error)]
pub enum PresenterError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Delivers replies to users. Failures are logged by the caller and never retried.
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn present(&self, reply: &Reply) -> Result<(), PresenterError>;
}
