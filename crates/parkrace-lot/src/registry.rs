//! Space registry: building a lot's spaces and claiming them.
//!
//! Both functions are pure with respect to the outside world. Callers
//! that share a space list between tasks must serialize calls to
//! [`claim`] themselves (the room store does this per room).

use chrono::{DateTime, Utc};

use crate::{
    ClaimError, LotCounters, ParkingSpace, PlayerId, SpaceCategory, SpaceId,
    SpaceStatus,
};

/// Expands capacity counters into individual spaces.
///
/// Categories are emitted in [`SpaceCategory::ALL`] order, each as a run
/// of consecutive ids. Ids start at 1 and continue across category
/// boundaries, so the output is identical for identical counters.
pub fn expand(counters: &LotCounters) -> Vec<ParkingSpace> {
    let mut spaces = Vec::with_capacity(counters.total() as usize);
    let mut next_id: SpaceId = 1;

    for category in SpaceCategory::ALL {
        for _ in 0..counters.get(category) {
            spaces.push(ParkingSpace::new(next_id, category));
            next_id += 1;
        }
    }

    spaces
}

/// Claims `space_id` for `player_id`.
///
/// On success the space is `Occupied`, records the player and `now`, and a
/// copy of the updated space is returned. On failure nothing changes.
///
/// # Errors
/// - [`ClaimError::NotFound`]: no space has this id
/// - [`ClaimError::AlreadyClaimed`]: the space is not available
pub fn claim(
    spaces: &mut [ParkingSpace],
    space_id: SpaceId,
    player_id: &PlayerId,
    now: DateTime<Utc>,
) -> Result<ParkingSpace, ClaimError> {
    let space = spaces
        .iter_mut()
        .find(|s| s.id == space_id)
        .ok_or(ClaimError::NotFound(space_id))?;

    if !space.status.is_available() {
        return Err(ClaimError::AlreadyClaimed(space_id));
    }

    space.status = SpaceStatus::Occupied;
    space.occupied_by = Some(player_id.clone());
    space.occupied_at = Some(now);

    Ok(space.clone())
}
