//! Room store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`RoomStore`](crate::RoomStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Bound of each room actor's command channel. When full, callers
    /// wait for the room to catch up. Values below 1 are treated as 1.
    pub channel_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { channel_size: 64 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_default() {
        assert_eq!(StoreConfig::default().channel_size, 64);
    }
}
