//! Shared boss-raid tracking board.
//!
//! SYSTEM CONTEXT
//! ==============
//! Clients on a websocket subscribe to topics, send raid updates, and
//! receive every other client's updates on the topics they watch. All state
//! lives in memory in one `RaidStore`; a restart starts from empty.
//!
//! Module map:
//! - `store` holds canonical state
//! - `services` applies updates, channel lifecycle, spawn timing, snapshots,
//!   and topic fanout
//! - `routes` translates websocket frames into service calls

pub mod config;
pub mod frame;
pub mod message;
pub mod model;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
