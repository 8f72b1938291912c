//! Unified error type for Parkrace.

use parkrace_lot::ClaimError;
use parkrace_room::RoomError;
use parkrace_source::SourceError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ParkraceError {
    /// Fetching lot data upstream failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A room-level error (not found, duplicate, not a member, claim).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The requested lot is not in the fetched page.
    #[error("lot {lot_id} is out of range ({available} lots available)")]
    LotOutOfRange { lot_id: u32, available: usize },

    /// The background room-creation task panicked or was cancelled.
    #[error("room initialization aborted: {0}")]
    InitAborted(String),
}

impl From<ClaimError> for ParkraceError {
    fn from(err: ClaimError) -> Self {
        Self::Room(RoomError::Claim(err))
    }
}
