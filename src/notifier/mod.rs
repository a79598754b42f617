//! # Order Notifier
//!
//! Forwards placed orders to the shop operator without making the buyer wait.
//!
//! The router calls [`OrderNotifier::notify`], which only enqueues. A background worker drains
//! the queue and hands each summary to the [`OrderSink`], retrying a bounded number of times
//! with a linearly growing delay. Failures end in a log line and never reach the buyer.
//!
//! ```rust,ignore
//! let (notifier, handle) = OrderNotifier::spawn(sink, NotifierConfig::new(OperatorChat(42)));
//! notifier.notify("New order: ...".to_string());
//! drop(notifier);
//! handle.await?; // worker drains the queue, then exits
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Chat the operator receives order notifications in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorChat(pub i64);

impl Display for OperatorChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Destination for order summaries, e.g. a message to the owner's chat.
#[async_trait]
pub trait OrderSink: Send + Sync {
    async fn deliver(&self, destination: &OperatorChat, text: &str) -> Result<(), SinkError>;
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub destination: OperatorChat,
    /// Total delivery attempts per order, at least one.
    pub max_attempts: u32,
    /// Delay before the second attempt; attempt `n + 1` waits `n` times this.
    pub retry_delay: Duration,
    pub queue_capacity: usize,
}

impl NotifierConfig {
    pub fn new(destination: OperatorChat) -> Self {
        Self {
            destination,
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
            queue_capacity: 64,
        }
    }
}

/// Handle used to enqueue notifications. Cheap to clone; the worker stops once every handle is
/// dropped and the queue is empty.
#[derive(Debug, Clone)]
pub struct OrderNotifier {
    sender: mpsc::Sender<String>,
}

impl OrderNotifier {
    /// Starts the delivery worker.
    pub fn spawn(sink: Arc<dyn OrderSink>, config: NotifierConfig) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let handle = tokio::spawn(run_worker(receiver, sink, config));
        (Self { sender }, handle)
    }

    /// Queues `text` for delivery. Never waits; a full or closed queue drops the notification.
    ///
    /// Returns whether the notification was queued.
    pub fn notify(&self, text: String) -> bool {
        match self.sender.try_send(text) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Notification queue full, dropping order notification");
                false
            }
            Err(TrySendError::Closed(_)) => {
                warn!("Notifier stopped, dropping order notification");
                false
            }
        }
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<String>,
    sink: Arc<dyn OrderSink>,
    config: NotifierConfig,
) {
    info!(destination = %config.destination, "Notifier started");
    while let Some(text) = receiver.recv().await {
        deliver_with_retry(sink.as_ref(), &config, &text).await;
    }
    info!("Notifier shutdown");
}

/// Returns whether the sink eventually accepted the text.
async fn deliver_with_retry(sink: &dyn OrderSink, config: &NotifierConfig, text: &str) -> bool {
    let attempts = config.max_attempts.max(1);
    for attempt in 1..=attempts {
        match sink.deliver(&config.destination, text).await {
            Ok(()) => {
                debug!(attempt, "Order notification delivered");
                return true;
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, error = %e, "Order notification failed, retrying");
                tokio::time::sleep(config.retry_delay * attempt).await;
            }
            Err(e) => {
                warn!(attempts, error = %e, "Giving up on order notification");
            }
        }
    }
    false
}
