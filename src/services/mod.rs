//! Domain services used by the websocket route.
//!
//! ARCHITECTURE
//! ============
//! Service modules own raid semantics and fanout so the route handler can
//! stay focused on frame translation. Everything here is synchronous over
//! the store except the pub/sub broker.

pub mod channel;
pub mod pubsub;
pub mod snapshot;
pub mod spawn;
pub mod update;
