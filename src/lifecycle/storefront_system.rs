use crate::catalog::Catalog;
use crate::clients::SessionClient;
use crate::config::Settings;
use crate::notifier::{NotifierConfig, OrderNotifier, OrderSink};
use crate::presenter::Presenter;
use crate::router::EventRouter;
use crate::session_actor::{self, SessionContext};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Delay before the second notification attempt; later attempts wait proportionally longer.
const NOTIFY_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Knobs for [`StorefrontSystem::start`].
#[derive(Debug, Clone)]
pub struct SystemConfig {
    pub session_shards: usize,
    /// `None` disables operator notifications.
    pub notifier: Option<NotifierConfig>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            session_shards: 8,
            notifier: None,
        }
    }
}

impl From<&Settings> for SystemConfig {
    fn from(settings: &Settings) -> Self {
        let notifier = settings.owner_chat_id.map(|destination| NotifierConfig {
            destination,
            max_attempts: settings.notify_max_attempts,
            retry_delay: NOTIFY_RETRY_DELAY,
            queue_capacity: settings.notify_queue_capacity,
        });
        Self {
            session_shards: settings.session_shards,
            notifier,
        }
    }
}

/// The running storefront: session shards, the notifier worker and the router wired to both.
///
/// # Example
///
/// ```ignore
/// let system = StorefrontSystem::start(
///     SystemConfig::default(),
///     Catalog::default(),
///     Arc::new(ConsolePresenter::stdout()),
///     Arc::new(ConsoleOrderSink),
/// );
/// system.router.dispatch(&InboundEvent::command(UserId(1), "/start")).await;
/// system.shutdown().await?;
/// ```
pub struct StorefrontSystem {
    /// Entry point for inbound events
    pub router: EventRouter,

    /// Direct access to the session registry
    pub sessions: SessionClient,

    /// Task handles for the session shards (used for graceful shutdown)
    handles: Vec<JoinHandle<()>>,

    notifier_handle: Option<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Spawns every task and wires the router. Must be called inside a Tokio runtime.
    pub fn start(
        config: SystemConfig,
        catalog: Catalog,
        presenter: Arc<dyn Presenter>,
        sink: Arc<dyn OrderSink>,
    ) -> Self {
        let catalog = Arc::new(catalog);

        // Session shards share the catalog and the order number sequence
        let (shards, sessions) = session_actor::new(config.session_shards);
        let context = SessionContext::new(Arc::clone(&catalog));
        let handles = shards
            .into_iter()
            .map(|shard| tokio::spawn(shard.run(context.clone())))
            .collect();

        let (notifier, notifier_handle) = match config.notifier {
            Some(notifier_config) => {
                let (notifier, handle) = OrderNotifier::spawn(sink, notifier_config);
                (Some(notifier), Some(handle))
            }
            None => {
                info!("OWNER_CHAT_ID not set, order notifications disabled");
                (None, None)
            }
        };

        let router = EventRouter::new(sessions.clone(), catalog, presenter, notifier);
        info!(shards = config.session_shards, "Storefront started");

        Self {
            router,
            sessions,
            handles,
            notifier_handle,
        }
    }

    /// Gracefully shuts down the system.
    ///
    /// Dropping the router and the session client closes every channel; the shards exit their
    /// loops and the notifier delivers whatever is still queued. Router clones held elsewhere
    /// must be dropped first or this waits for them.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");
        drop(self.router);
        drop(self.sessions);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Session shard failed: {:?}", e);
                return Err(format!("Session shard failed: {:?}", e));
            }
        }
        if let Some(handle) = self.notifier_handle {
            if let Err(e) = handle.await {
                error!("Notifier task failed: {:?}", e);
                return Err(format!("Notifier task failed: {:?}", e));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}
