//! # Keyed Actors
//!
//! Building blocks for keeping many small pieces of per-key state (one per chat user, one per
//! device, ...) in memory behind an async, type-safe API, using the **Actor Model** on Tokio.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]): the business logic of one keyed entity.
//! 2. **Runtime Layer** ([`ResourceActor`]): a shard task that owns a map of entities and
//!    serves requests sequentially.
//! 3. **Interface Layer** ([`ResourceClient`]): a cloneable handle that hashes each key to its
//!    shard.
//!
//! ## Lifecycle of an Entity
//!
//! Entities are created lazily. The first `get_or_create` or `perform_action` naming a key
//! builds the entity with [`ActorEntity::from_key`], runs [`ActorEntity::on_create`] and keeps
//! it for as long as the shard runs. There is no eviction.
//!
//! ## Concurrency Model
//!
//! - Each shard runs in its own Tokio task.
//! - A key always maps to the same shard, so requests for one entity are processed strictly
//!   one after another and creation cannot race.
//! - Different keys hashed to different shards are served in parallel.
//!
//! ## Context Injection
//!
//! Shared dependencies are passed to [`ResourceActor::run`] and handed to every hook, so they
//! can be wired after construction:
//!
//! ```rust,ignore
//! let (shards, client) = ResourceActor::<Session>::sharded(8, 64);
//! for shard in shards {
//!     tokio::spawn(shard.run(context.clone()));
//! }
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers client requests from scripted expectations so code that
//! depends on a client can be tested without any running shard.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
