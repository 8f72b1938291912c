//! Error types for the lot layer.

use crate::SpaceId;

/// Why a claim on a space was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    /// No space in the lot has this id.
    #[error("space {0} does not exist")]
    NotFound(SpaceId),

    /// The space is not available (already occupied, or reserved).
    #[error("space {0} is already claimed")]
    AlreadyClaimed(SpaceId),
}

/// Why a lot's capacity counters can't be expanded into spaces.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    /// The four counters don't fit in a `u32` when summed.
    #[error("capacity counters overflow")]
    Overflow,

    /// The counters sum to more spaces than one lot may hold.
    #[error("lot has {total} spaces, more than the limit of {max}")]
    TooLarge { total: u32, max: u32 },
}
