//! Console storefront.
//!
//! Loads [`Settings`] from the environment, starts the [`StorefrontSystem`] and feeds it events
//! read from stdin until EOF.

use chat_storefront::catalog::Catalog;
use chat_storefront::config::Settings;
use chat_storefront::lifecycle::{setup_tracing, StorefrontSystem, SystemConfig};
use chat_storefront::transport::{run_console, ConsoleOrderSink, ConsolePresenter};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let settings = Settings::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e.to_string()
    })?;
    info!(
        token_len = settings.bot_token_len(),
        owner_chat_id = ?settings.owner_chat_id,
        shards = settings.session_shards,
        "Configuration loaded"
    );

    let system = StorefrontSystem::start(
        SystemConfig::from(&settings),
        Catalog::default(),
        Arc::new(ConsolePresenter::stdout()),
        Arc::new(ConsoleOrderSink),
    );

    let result = run_console(system.router.clone()).await;
    if let Err(e) = &result {
        error!(error = %e, "Console input failed");
    }

    // Shutdown system gracefully
    system.shutdown().await?;
    result.map_err(|e| e.to_string())
}
