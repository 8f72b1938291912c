//! Service configuration.

use parkrace_room::StoreConfig;
use serde::{Deserialize, Serialize};

/// What to do when the lot source fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPolicy {
    /// Log the failure and carry on as if the source returned no lots.
    #[default]
    Lenient,
    /// Surface the failure as [`ParkraceError::Source`](crate::ParkraceError::Source).
    Strict,
}

/// Configuration for a [`RoomService`](crate::RoomService).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Page fetched when a room is created.
    pub fetch_page: u32,

    /// Lots per page fetched when a room is created. `create_room`'s lot
    /// id indexes into this page.
    pub fetch_per_page: u32,

    pub fetch_policy: FetchPolicy,

    pub store: StoreConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fetch_page: 1,
            fetch_per_page: 10,
            fetch_policy: FetchPolicy::default(),
            store: StoreConfig::default(),
        }
    }
}
