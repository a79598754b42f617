//! # Chat Storefront
//!
//! > **A product catalog, per-user carts and a checkout dialogue behind a chat interface.**
//!
//! The interesting part is the conversation state: for every user the storefront knows what
//! is in their cart and which checkout question they are answering, so a plain text message
//! can mean "my name", "my phone" or nothing at all. The chat platform itself is abstracted
//! away behind [`presenter::Presenter`] and [`router::InboundEvent`].
//!
//! ## 🏗️ Design
//!
//! ### Sessions as Keyed Actors
//! Sessions live in sharded [`keyed_actors::ResourceActor`]s. Each shard owns its sessions in a
//! plain `HashMap` and handles one request at a time, so every update of one user's session is
//! serialized without locks, while users on different shards proceed in parallel.
//!
//! ### Closed Action Grammar
//! Button tokens (`cart:add:iphone_15`, `checkout:delivery:pickup`, ...) are parsed once into
//! [`router::ButtonAction`]; keyboards are built from the same enum.
//!
//! ### Type-Safe Error Handling
//! Each component has its own error enum (`SessionError`, `CheckoutError`, `ConfigError`, ...).
//! Only a missing bot token is fatal; everything else becomes a notice, a re-prompt or a log
//! line.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: products, cart, checkout state machine, orders, sessions
//! - [`catalog`]: the static product registry
//! - [`session_actor`] and [`clients`]: the session registry and its typed client
//! - [`router`]: inbound events → session actions → replies
//! - [`presenter`] and [`notifier`]: outbound seams (replies, operator notifications)
//! - [`config`]: settings from the environment
//! - [`transport`]: the console transport used by the binary
//! - [`lifecycle`]: wiring, tracing setup and graceful shutdown
//!
//! ## 🚀 Running
//!
//! ```bash
//! BOT_TOKEN=dev OWNER_CHAT_ID=1 RUST_LOG=info cargo run
//! ```
//!
//! Then type `/start`, `!menu:catalog`, `!cart:add:iphone_15`, ... (see [`transport::console`]).

pub mod catalog;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod notifier;
pub mod presenter;
pub mod router;
pub mod session_actor;
pub mod transport;
