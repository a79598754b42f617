//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every keyed resource must satisfy to live inside a
//! [`ResourceActor`](crate::ResourceActor). Unlike a CRUD store, entities here are never created
//! explicitly: the first request that names an unknown key brings the entity into existence via
//! [`ActorEntity::from_key`], and it stays resident for the lifetime of the actor.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs once, right after lazy construction.
//!
//! The default implementation does nothing (`Ok(())`).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any keyed entity must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// The trait is `#[async_trait]` so hooks may await. The `Context` associated type is injected
/// into every hook when the actor starts (`run(context)`), which keeps shared dependencies such
/// as read-only registries out of the entity itself.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Stable key the entity is addressed by (e.g. a chat user id).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// Enum of entity-specific operations.
    type Action: Send + Sync + Debug;

    /// Result returned by [`ActorEntity::handle_action`].
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies shared by every entity of the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per entity type, not per action. Errors cross the actor boundary boxed
    /// inside [`FrameworkError::EntityError`](crate::FrameworkError::EntityError) and can be
    /// recovered with `downcast`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build a fresh entity for a key seen for the first time.
    fn from_key(id: &Self::Id) -> Self;

    /// Called once after [`ActorEntity::from_key`], before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle an entity-specific action.
    ///
    /// Mutations made before an `Err` is returned are kept; the entity is responsible for
    /// leaving itself in a consistent state on every path.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
