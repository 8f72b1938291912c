//! Error types for the room layer.

use parkrace_lot::{ClaimError, PlayerId};

use crate::RoomId;

/// Errors that can occur during room operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist (never created, or not created yet).
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// A room with this id is already stored.
    #[error("room {0} already exists")]
    DuplicateId(RoomId),

    /// The player has not joined this room.
    #[error("player {0} is not a member of room {1}")]
    NotAMember(PlayerId, RoomId),

    /// The space claim itself was refused.
    #[error(transparent)]
    Claim(#[from] ClaimError),

    /// The room's actor is gone (its task stopped).
    #[error("room {0} is unavailable")]
    Unavailable(RoomId),
}
