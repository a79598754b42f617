//! Console transport.
//!
//! Input, one event per line:
//!
//! ```text
//! /start                 command from the default user
//! !cart:add:iphone_15    button press
//! Ivan Petrov            free text
//! @42 /start             any of the above on behalf of user 42
//! ```
//!
//! Replies are written to stdout, with keyboards rendered as `[label](token)` rows.

use crate::model::UserId;
use crate::notifier::{OperatorChat, OrderSink, SinkError};
use crate::presenter::{Presenter, PresenterError, Reply, SendMode};
use crate::router::{EventRouter, InboundEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Write as _;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// User id assumed for lines without an `@<id>` prefix.
pub const CONSOLE_USER: UserId = UserId(1);

/// Parses one console line. Blank lines yield `None`.
pub fn parse_console_line(line: &str) -> Option<InboundEvent> {
    let mut rest = line.trim();
    let mut user = CONSOLE_USER;
    if let Some(tail) = rest.strip_prefix('@') {
        let (id, remainder) = tail.split_once(char::is_whitespace).unwrap_or((tail, ""));
        if let Ok(id) = id.parse::<i64>() {
            user = UserId(id);
            rest = remainder.trim_start();
        }
    }

    if rest.is_empty() {
        return None;
    }
    let event = if rest.starts_with('/') {
        InboundEvent::command(user, rest)
    } else if let Some(token) = rest.strip_prefix('!') {
        InboundEvent::button(user, token.trim())
    } else {
        InboundEvent::text(user, rest)
    };
    Some(event)
}

/// Renders a reply the way the console shows it.
pub fn render_reply(reply: &Reply) -> String {
    let mut out = String::new();
    match reply {
        Reply::Message(message) => {
            let mode = match message.mode {
                SendMode::New => "new",
                SendMode::Edit => "edit",
            };
            let _ = writeln!(out, "── to {} ({mode}) ──", message.target);
            let _ = writeln!(out, "{}", message.text);
            if let Some(keyboard) = &message.keyboard {
                for row in &keyboard.rows {
                    let cells: Vec<String> = row
                        .iter()
                        .map(|b| format!("[{}]({})", b.label, b.action))
                        .collect();
                    let _ = writeln!(out, "  {}", cells.join(" "));
                }
            }
        }
        Reply::Notice(notice) => {
            let kind = if notice.alert { "alert" } else { "notice" };
            let _ = writeln!(out, "── {kind} to {}: {}", notice.target, notice.text);
        }
    }
    out
}

/// Writes replies to any async writer, one whole reply at a time.
pub struct ConsolePresenter<W> {
    out: Mutex<W>,
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl<W> Presenter for ConsolePresenter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn present(&self, reply: &Reply) -> Result<(), PresenterError> {
        let text = render_reply(reply);
        let mut out = self.out.lock().await;
        out.write_all(text.as_bytes()).await?;
        out.flush().await?;
        Ok(())
    }
}

/// Prints operator notifications to stderr.
#[derive(Debug, Default)]
pub struct ConsoleOrderSink;

#[async_trait]
impl OrderSink for ConsoleOrderSink {
    async fn deliver(&self, destination: &OperatorChat, text: &str) -> Result<(), SinkError> {
        let mut err = io::stderr();
        err.write_all(format!("══ operator {destination} ══\n{text}\n").as_bytes())
            .await?;
        err.flush().await?;
        Ok(())
    }
}

/// Events buffered per user before the reader waits for that user's queue to drain.
const USER_QUEUE_CAPACITY: usize = 32;

/// Reads events from stdin until EOF.
pub async fn run_console(router: EventRouter) -> Result<(), std::io::Error> {
    info!("Reading events from stdin");
    dispatch_lines(&router, BufReader::new(io::stdin())).await?;
    info!("Input closed");
    Ok(())
}

/// Parses and dispatches every line of `input`, returning once all of them have been handled.
///
/// Each user gets a queue drained by a single task, so one user's events are dispatched in the
/// order they were read while different users proceed concurrently.
pub async fn dispatch_lines<R>(router: &EventRouter, input: R) -> Result<(), std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut queues: HashMap<UserId, mpsc::Sender<InboundEvent>> = HashMap::new();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse_console_line(&line) else {
            continue;
        };
        debug!(user = %event.user_id, kind = ?event.kind, "Event received");
        let queue = queues.entry(event.user_id).or_insert_with(|| {
            let (tx, mut rx) = mpsc::channel::<InboundEvent>(USER_QUEUE_CAPACITY);
            let router = router.clone();
            tasks.spawn(async move {
                while let Some(event) = rx.recv().await {
                    router.dispatch(&event).await;
                }
            });
            tx
        });
        if let Err(e) = queue.send(event).await {
            warn!(user = %e.0.user_id, "User queue closed, event dropped");
        }
    }

    // Closing the queues lets every user task finish what it already holds
    drop(queues);
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            warn!(error = %e, "User event task failed");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{Button, Keyboard};
    use crate::router::EventKind;

    #[test]
    fn test_parse_console_line() {
        let event = parse_console_line("/start").unwrap();
        assert_eq!(event.user_id, CONSOLE_USER);
        assert_eq!(event.kind, EventKind::Command);

        let event = parse_console_line("@42 !cart:view").unwrap();
        assert_eq!(event.user_id, UserId(42));
        assert_eq!(event.kind, EventKind::Button);
        assert_eq!(event.payload, "cart:view");

        let event = parse_console_line("  Main St 1 ").unwrap();
        assert_eq!(event.kind, EventKind::Text);
        assert_eq!(event.payload, "Main St 1");

        // not a user prefix, so plain text
        let event = parse_console_line("@shop hello").unwrap();
        assert_eq!(event.user_id, CONSOLE_USER);
        assert_eq!(event.payload, "@shop hello");

        assert!(parse_console_line("   ").is_none());
        assert!(parse_console_line("@7").is_none());
    }

    #[tokio::test]
    async fn test_presenter_renders_keyboard_rows() {
        let presenter = ConsolePresenter::new(Vec::<u8>::new());
        let keyboard = Keyboard::new().row(vec![
            Button::new("✅ Confirm", "checkout:confirm"),
            Button::new("❌ Cancel", "checkout:cancel"),
        ]);

        presenter
            .present(&Reply::edit(UserId(5), "Review", Some(keyboard)))
            .await
            .unwrap();
        presenter
            .present(&Reply::alert(UserId(5), "Cart is empty"))
            .await
            .unwrap();

        let out = String::from_utf8(presenter.out.lock().await.clone()).unwrap();
        assert!(out.contains("── to 5 (edit) ──\nReview\n"));
        assert!(out.contains("[✅ Confirm](checkout:confirm) [❌ Cancel](checkout:cancel)"));
        assert!(out.contains("── alert to 5: Cart is empty"));
    }

    #[tokio::test]
    async fn test_one_users_script_is_dispatched_in_order() {
        use crate::catalog::Catalog;
        use crate::lifecycle::{StorefrontSystem, SystemConfig};
        use crate::model::ValidationError;
        use crate::router::texts;
        use keyed_actors::ActorClient;
        use std::sync::Arc;

        let presenter = Arc::new(ConsolePresenter::new(Vec::<u8>::new()));
        let system = StorefrontSystem::start(
            SystemConfig::default(),
            Catalog::default(),
            presenter.clone(),
            Arc::new(ConsoleOrderSink),
        );

        let mut script = String::new();
        for _ in 0..50 {
            for line in [
                "!cart:add:iphone_15",
                "!checkout",
                "Ivan Petrov",
                "+79991234567",
                "!checkout:delivery:pickup",
                "!checkout:confirm",
            ] {
                script.push_str(line);
                script.push('\n');
            }
            // a second user interleaved with the first
            script.push_str("@2 !cart:add:airpods_pro_2\n");
        }

        dispatch_lines(&system.router, script.as_bytes()).await.unwrap();

        let out = String::from_utf8(presenter.out.lock().await.clone()).unwrap();
        assert_eq!(out.matches(" placed!").count(), 50);
        assert!(out.contains("Order #50 placed!"));
        for refusal in [
            texts::CART_IS_EMPTY_ALERT,
            texts::STEP_NOT_ACTIVE,
            texts::CHECKOUT_EXPIRED,
            texts::invalid_input(&ValidationError::InvalidPhone),
        ] {
            assert!(!out.contains(refusal), "{refusal}");
        }

        let other = system.sessions.get(UserId(2)).await.unwrap().unwrap();
        assert_eq!(other.cart.count(), 50);

        system.shutdown().await.unwrap();
    }
}
