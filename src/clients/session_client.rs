//! # Session Client
//!
//! High-level API over the session shards. Wraps a `ResourceClient<Session>` and maps framework
//! failures back into [`SessionError`].

use crate::model::{Session, UserId};
use crate::session_actor::{SessionAction, SessionActionResult, SessionError};
use async_trait::async_trait;
use keyed_actors::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for the session registry. Cheap to clone.
#[derive(Clone)]
pub struct SessionClient {
    inner: ResourceClient<Session>,
}

impl SessionClient {
    pub fn new(inner: ResourceClient<Session>) -> Self {
        Self { inner }
    }

    /// Applies `action` to the user's session, creating the session on first contact.
    #[instrument(skip(self), fields(user = %user_id))]
    pub async fn perform(
        &self,
        user_id: UserId,
        action: SessionAction,
    ) -> Result<SessionActionResult, SessionError> {
        debug!("Sending request");
        self.inner
            .perform_action(user_id, action)
            .await
            .map_err(Self::map_error)
    }

    /// Number of users seen so far.
    pub async fn session_count(&self) -> Result<usize, SessionError> {
        self.count().await
    }
}

#[async_trait]
impl ActorClient<Session> for SessionClient {
    type Error = SessionError;

    fn inner(&self) -> &ResourceClient<Session> {
        &self.inner
    }

    /// Entity errors come back as the original [`SessionError`]; everything else is a
    /// communication failure.
    fn map_error(e: FrameworkError) -> SessionError {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<SessionError>() {
                Ok(session_error) => *session_error,
                Err(other) => SessionError::ActorCommunicationError(other.to_string()),
            },
            other => SessionError::ActorCommunicationError(other.to_string()),
        }
    }
}
