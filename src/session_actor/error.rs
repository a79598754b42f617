//! Error types for the Session actor.

use crate::model::{CheckoutError, ProductId};
use thiserror::Error;

/// Errors returned by session actions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The action named a product the catalog does not know.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The checkout dialogue refused the input.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
