//! Room state management for Parkrace.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! room's lot, roster and claim state. All reads and writes go through the
//! [`RoomStore`], which serializes mutations per room while letting
//! different rooms proceed in parallel.
//!
//! # Key types
//!
//! - [`Room`]: one race: a lot snapshot, a roster, claim state
//! - [`RoomStore`]: inserts rooms, hands out snapshots, applies mutations
//! - [`RoomStats`]: occupancy summary and leaderboard ([`project`])
//! - [`StoreConfig`]: actor mailbox sizing

mod actor;
mod config;
mod error;
mod id;
mod room;
mod stats;
mod store;

pub use config::StoreConfig;
pub use error::RoomError;
pub use id::RoomId;
pub use room::Room;
pub use stats::{Leaderboard, RoomStats, project};
pub use store::RoomStore;
