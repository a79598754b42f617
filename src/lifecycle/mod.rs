//! # System Lifecycle
//!
//! Starting, wiring and stopping the storefront.
//!
//! ## Wiring
//!
//! 1. The catalog is built once and shared behind an `Arc`.
//! 2. The session shards are created without dependencies, then started with a
//!    [`SessionContext`](crate::session_actor::SessionContext) (catalog plus order counter)
//!    injected through `run(context)`.
//! 3. The notifier worker starts only when an operator chat is configured.
//! 4. The router receives the session client, the presenter and the notifier handle.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop the router and clients** - closes the sender side of every channel
//! 2. **Shards detect closure** - `recv()` returns `None`, final size is logged
//! 3. **Notifier drains** - queued notifications are still delivered
//! 4. **Await completion** - every task handle is joined

pub mod storefront_system;
pub mod tracing;

pub use storefront_system::*;
pub use self::tracing::setup_tracing;
