//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by `RUST_LOG`
//! (`info` when unset). Module paths are hidden (`with_target(false)`); the session shards log
//! with an `entity_type` field instead.
//!
//! ## What Gets Traced
//!
//! - **Shard lifecycle**: start, lazy session creation, shutdown with final size
//! - **Session actions**: one span per client call carrying the user id
//! - **Rejected actions**: validation failures and stale buttons at `info`
//! - **Collaborator faults**: presenter and notifier failures at `warn`
//!
//! ```bash
//! RUST_LOG=debug cargo run    # every action with its payload
//! ```
//!
//! With `RUST_LOG=info` one checkout looks like:
//!
//! ```text
//! INFO Created entity_type="Session" shard=3 id=42 size=1
//! INFO perform: Action rejected entity_type="Session" id=42 error=Checkout error: phone number must have ...
//! INFO perform: Order placed user=42 order=#1 total=179 980 ₽
//! ```

use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
