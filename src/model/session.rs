//! Per-user conversation state.

use crate::model::{Cart, Checkout};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Stable identity of a chat user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the storefront remembers about one user: their cart and where they are in
/// checkout. Created on first contact and kept for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub cart: Cart,
    pub checkout: Checkout,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            cart: Cart::default(),
            checkout: Checkout::default(),
        }
    }
}
