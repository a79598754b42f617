//! # Generic Messages
//!
//! Message types exchanged between a [`ResourceClient`](crate::ResourceClient) and the
//! [`ResourceActor`](crate::ResourceActor) shard that owns a key.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to a shard.
///
/// There is no `Create` or `Delete`: entities appear on first use and are never removed.
///
/// - **Get**: read a snapshot without creating the entity.
/// - **GetOrCreate**: read a snapshot, creating the entity if absent.
/// - **Action**: run [`ActorEntity::handle_action`], creating the entity if absent.
/// - **Count**: number of entities held by the shard.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    GetOrCreate {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Count {
        respond_to: Response<usize>,
    },
}
