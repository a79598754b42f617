//! Transports connect the router to the outside world.
//!
//! Only a line-oriented console transport ships with the crate; a chat platform adapter would
//! implement [`Presenter`](crate::presenter::Presenter) and
//! [`OrderSink`](crate::notifier::OrderSink) the same way and feed
//! [`InboundEvent`](crate::router::InboundEvent)s into the router.

pub mod console;

pub use console::*;
