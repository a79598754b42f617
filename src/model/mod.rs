//! Plain domain data: products, carts, the checkout dialogue, orders and sessions.
//!
//! [`Session`] is the only type managed by an actor (see
//! [`session_actor`](crate::session_actor)); everything else is a value it owns or derives.

pub mod cart;
pub mod checkout;
pub mod order;
pub mod product;
pub mod session;

pub use cart::*;
pub use checkout::*;
pub use order::*;
pub use product::*;
pub use session::*;
