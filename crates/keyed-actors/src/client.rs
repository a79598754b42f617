//! # Generic Client
//!
//! The client half of the framework: routes each request to the shard that owns its key.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// A type-safe, async handle to one or more [`ResourceActor`](crate::ResourceActor) shards.
/// Requests for the same key always go to the same shard. Cloning is cheap; the actors shut
/// down once every clone has been dropped.
pub struct ResourceClient<T: ActorEntity> {
    senders: Arc<[mpsc::Sender<ResourceRequest<T>>]>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            senders: Arc::clone(&self.senders),
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    /// Client for a single shard.
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self {
            senders: Arc::from(vec![sender]),
        }
    }

    /// Client routing over several shards. An empty list yields a client whose every call
    /// fails with [`FrameworkError::ActorClosed`].
    pub fn sharded(senders: Vec<mpsc::Sender<ResourceRequest<T>>>) -> Self {
        Self {
            senders: Arc::from(senders),
        }
    }

    /// Number of shards behind this client.
    pub fn shard_count(&self) -> usize {
        self.senders.len()
    }

    fn route(&self, id: &T::Id) -> Result<&mpsc::Sender<ResourceRequest<T>>, FrameworkError> {
        if self.senders.is_empty() {
            return Err(FrameworkError::ActorClosed);
        }
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        let index = (hasher.finish() % self.senders.len() as u64) as usize;
        self.senders.get(index).ok_or(FrameworkError::ActorClosed)
    }

    async fn request<R>(
        &self,
        id: &T::Id,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.route(id)?
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Snapshot of the entity, or `None` if the key has never been used.
    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let key = id.clone();
        self.request(&key, |respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Snapshot of the entity, creating it on first use.
    pub async fn get_or_create(&self, id: T::Id) -> Result<T, FrameworkError> {
        let key = id.clone();
        self.request(&key, |respond_to| ResourceRequest::GetOrCreate { id, respond_to })
            .await
    }

    /// Runs an action against the entity, creating it on first use.
    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let key = id.clone();
        self.request(&key, |respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Total number of entities across all shards.
    pub async fn count(&self) -> Result<usize, FrameworkError> {
        let mut total = 0;
        for sender in self.senders.iter() {
            let (respond_to, response) = oneshot::channel();
            sender
                .send(ResourceRequest::Count { respond_to })
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            total += response.await.map_err(|_| FrameworkError::ActorDropped)??;
        }
        Ok(total)
    }
}
