//! Room identifiers.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of random bytes in a generated room id (two hex chars each).
const ROOM_ID_BYTES: usize = 4;

/// An opaque short token naming a room, e.g. `"3fa94c07"`.
///
/// Players share this token to meet in the same room, so it is kept short.
/// Uniqueness is enforced by whoever mints ids and again by the store.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps an existing token (e.g. one received from a client).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Mints a random 8-character lowercase hex token.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; ROOM_ID_BYTES] = rng.random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}
