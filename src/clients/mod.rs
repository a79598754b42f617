//! Type-safe wrappers around [`ResourceClient`](keyed_actors::ResourceClient).

pub mod session_client;

pub use session_client::*;
