//! # Session Actor
//!
//! The session registry: one [`Session`] per chat user, created on first contact and kept for
//! the life of the process.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](keyed_actors::ActorEntity) implementation for [`Session`]
//! - [`error`] - [`SessionError`]
//! - [`actions`] - [`SessionAction`] and [`SessionActionResult`]
//! - [`new()`] - Factory that creates the shards and their client
//!
//! ## Concurrency
//!
//! Sessions are spread over several shards by user id. A shard handles one request at a time,
//! so two events from the same user can never interleave inside a cart or checkout update,
//! while different users proceed in parallel.
//!
//! ```rust
//! use chat_storefront::model::{ProductId, UserId};
//! use chat_storefront::session_actor::{self, SessionAction, SessionActionResult, SessionContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (shards, client) = session_actor::new(4);
//!     for shard in shards {
//!         tokio::spawn(shard.run(SessionContext::default()));
//!     }
//!
//!     let result = client
//!         .perform(UserId(1), SessionAction::AddToCart(ProductId::from("iphone_15")))
//!         .await?;
//!     assert!(matches!(result, SessionActionResult::Added { quantity: 1, .. }));
//!     Ok(())
//! }
//! ```
//!
//! There is no eviction: memory grows with the number of distinct users seen.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::catalog::Catalog;
use crate::clients::SessionClient;
use crate::model::{OrderNumber, Session};
use keyed_actors::ResourceActor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Per-shard request buffer.
const SHARD_BUFFER: usize = 64;

/// Dependencies shared by every session, injected when the shards start.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub catalog: Arc<Catalog>,
    order_numbers: Arc<AtomicU64>,
}

impl SessionContext {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            order_numbers: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Hands out order numbers 1, 2, 3... across all shards.
    pub fn next_order_number(&self) -> OrderNumber {
        OrderNumber(self.order_numbers.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::default()))
    }
}

/// Creates `shards` session actors and the client routing to them.
pub fn new(shards: usize) -> (Vec<ResourceActor<Session>>, SessionClient) {
    let (actors, generic_client) = ResourceActor::sharded(shards, SHARD_BUFFER);
    (actors, SessionClient::new(generic_client))
}
