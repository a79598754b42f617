//! # Keyed Actor Shard
//!
//! This module defines the `ResourceActor`, the server half of the framework. A shard owns a
//! map of entities and processes its messages one at a time, so every mutation of one entity is
//! serialized and "create if absent" can never race.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that owns a partition of keyed entities.
///
/// **Concurrency Model**:
/// Each shard runs in its own Tokio task and processes requests sequentially. Keys are
/// assigned to shards by hash in [`ResourceClient`], so a given key always lands on the same
/// shard while different keys spread across shards and progress in parallel. No `Mutex` is
/// needed around the store.
///
/// # Usage Pattern
///
/// ```rust
/// use keyed_actors::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug, Default)]
/// struct Counter { hits: u32 }
///
/// #[derive(Debug)] enum CounterAction { Hit }
/// #[derive(Debug, thiserror::Error)] #[error("counter error")] struct CounterError;
///
/// #[async_trait]
/// impl ActorEntity for Counter {
///     type Id = u64;
///     type Action = CounterAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = CounterError;
///
///     fn from_key(_: &u64) -> Self { Self::default() }
///
///     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, CounterError> {
///         self.hits += 1;
///         Ok(self.hits)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (shards, client) = ResourceActor::<Counter>::sharded(4, 16);
///     for shard in shards {
///         tokio::spawn(shard.run(()));
///     }
///
///     assert_eq!(client.perform_action(7, CounterAction::Hit).await.unwrap(), 1);
///     assert_eq!(client.perform_action(7, CounterAction::Hit).await.unwrap(), 2);
///     assert_eq!(client.count().await.unwrap(), 1);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    shard: usize,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a single-shard actor and its client.
    ///
    /// `buffer_size` is the capacity of the MPSC channel; when full, client calls wait.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            shard: 0,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates `shards` actors (at least one) behind a single hash-routing client.
    ///
    /// Every returned actor must be started with [`ResourceActor::run`].
    pub fn sharded(shards: usize, buffer_size: usize) -> (Vec<Self>, ResourceClient<T>) {
        let shards = shards.max(1);
        let mut actors = Vec::with_capacity(shards);
        let mut senders = Vec::with_capacity(shards);
        for shard in 0..shards {
            let (sender, receiver) = mpsc::channel(buffer_size);
            senders.push(sender);
            actors.push(Self {
                receiver,
                store: HashMap::new(),
                shard,
            });
        }
        (actors, ResourceClient::sharded(senders))
    }

    /// Removes the entity from the store, constructing it first if the key is new.
    ///
    /// The caller re-inserts it once the request is served.
    async fn take_or_create(
        &mut self,
        id: &T::Id,
        context: &T::Context,
        entity_type: &str,
    ) -> Result<T, T::Error> {
        if let Some(item) = self.store.remove(id) {
            return Ok(item);
        }
        let mut item = T::from_key(id);
        item.on_create(context).await?;
        info!(entity_type, shard = self.shard, %id, size = self.store.len() + 1, "Created");
        Ok(item)
    }

    /// Runs the shard's event loop until every client has been dropped.
    ///
    /// # Context Injection
    /// `context` is handed to every entity hook, so dependencies can be wired after the actor
    /// was constructed but before the loop starts.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, shard = self.shard, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::GetOrCreate { id, respond_to } => {
                    debug!(entity_type, %id, "GetOrCreate");
                    match self.take_or_create(&id, &context, entity_type).await {
                        Ok(item) => {
                            let snapshot = item.clone();
                            self.store.insert(id, item);
                            let _ = respond_to.send(Ok(snapshot));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "on_create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let mut item = match self.take_or_create(&id, &context, entity_type).await {
                        Ok(item) => item,
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "on_create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => debug!(entity_type, %id, "Action ok"),
                        Err(e) => info!(entity_type, %id, error = %e, "Action rejected"),
                    }
                    self.store.insert(id, item);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Count { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.len()));
                }
            }
        }

        info!(entity_type, shard = self.shard, size = self.store.len(), "Shutdown");
    }
}
