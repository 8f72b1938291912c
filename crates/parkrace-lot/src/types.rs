//! Core data types for a parking lot snapshot.
//!
//! A [`ParkingLot`] is built once from upstream data and then lives inside
//! a room. Its capacity counters never change; only the per-space claim
//! state does.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CapacityError, registry};

/// Identifier of a space, unique within its lot. Ids start at 1.
pub type SpaceId = u32;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identifier: the display name they joined with.
///
/// Newtype over `String` so a player name can't be passed where some other
/// string is expected. Serialized as the bare string.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a player id from anything string-like.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ---------------------------------------------------------------------------
// SpaceCategory
// ---------------------------------------------------------------------------

/// The four kinds of parking capacity a lot record reports.
///
/// The declaration order is the expansion order: spaces of the first
/// category get the lowest ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpaceCategory {
    IndoorMechanical,
    OutdoorMechanical,
    IndoorSelfPark,
    OutdoorSelfPark,
}

impl SpaceCategory {
    /// All categories, in expansion order.
    pub const ALL: [SpaceCategory; 4] = [
        Self::IndoorMechanical,
        Self::OutdoorMechanical,
        Self::IndoorSelfPark,
        Self::OutdoorSelfPark,
    ];
}

impl fmt::Display for SpaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndoorMechanical => write!(f, "indoor-mechanical"),
            Self::OutdoorMechanical => write!(f, "outdoor-mechanical"),
            Self::IndoorSelfPark => write!(f, "indoor-self-park"),
            Self::OutdoorSelfPark => write!(f, "outdoor-self-park"),
        }
    }
}

// ---------------------------------------------------------------------------
// SpaceStatus
// ---------------------------------------------------------------------------

/// Claim state of a single space.
///
/// The only transition is `Available → Occupied`. There is no release.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpaceStatus {
    #[default]
    Available,
    Occupied,
    /// Placeholder for future reservation support. No operation produces
    /// it; a reserved space is treated as not claimable.
    Reserved,
}

impl SpaceStatus {
    /// Returns `true` if the space can be claimed.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

// ---------------------------------------------------------------------------
// ParkingSpace
// ---------------------------------------------------------------------------

/// One claimable unit within a lot.
///
/// `occupied_by` and `occupied_at` are both `Some` exactly when the status
/// is `Occupied`. Only [`claim`](crate::claim) sets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpace {
    pub id: SpaceId,
    pub category: SpaceCategory,
    pub status: SpaceStatus,
    pub occupied_by: Option<PlayerId>,
    pub occupied_at: Option<DateTime<Utc>>,
}

impl ParkingSpace {
    /// Creates an available space.
    pub fn new(id: SpaceId, category: SpaceCategory) -> Self {
        Self {
            id,
            category,
            status: SpaceStatus::Available,
            occupied_by: None,
            occupied_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// LotCounters
// ---------------------------------------------------------------------------

/// Most spaces a single lot may expand to.
pub const MAX_LOT_SPACES: u32 = 100_000;

/// Per-category capacity counters of a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LotCounters {
    pub indoor_mechanical: u32,
    pub outdoor_mechanical: u32,
    pub indoor_self_park: u32,
    pub outdoor_self_park: u32,
}

impl LotCounters {
    pub fn new(
        indoor_mechanical: u32,
        outdoor_mechanical: u32,
        indoor_self_park: u32,
        outdoor_self_park: u32,
    ) -> Self {
        Self {
            indoor_mechanical,
            outdoor_mechanical,
            indoor_self_park,
            outdoor_self_park,
        }
    }

    /// Capacity reported for one category.
    pub fn get(&self, category: SpaceCategory) -> u32 {
        match category {
            SpaceCategory::IndoorMechanical => self.indoor_mechanical,
            SpaceCategory::OutdoorMechanical => self.outdoor_mechanical,
            SpaceCategory::IndoorSelfPark => self.indoor_self_park,
            SpaceCategory::OutdoorSelfPark => self.outdoor_self_park,
        }
    }

    /// Sum of the four counters, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        SpaceCategory::ALL
            .iter()
            .fold(0u32, |acc, c| acc.saturating_add(self.get(*c)))
    }

    /// Sum of the four counters, if it is at most [`MAX_LOT_SPACES`].
    ///
    /// Counters from outside the process must pass this before they are
    /// handed to [`ParkingLot::new`].
    ///
    /// # Errors
    /// - [`CapacityError::Overflow`]: the sum doesn't fit in a `u32`
    /// - [`CapacityError::TooLarge`]: the sum exceeds [`MAX_LOT_SPACES`]
    pub fn checked_total(&self) -> Result<u32, CapacityError> {
        let total = SpaceCategory::ALL
            .iter()
            .try_fold(0u32, |acc, c| acc.checked_add(self.get(*c)))
            .ok_or(CapacityError::Overflow)?;
        if total > MAX_LOT_SPACES {
            return Err(CapacityError::TooLarge {
                total,
                max: MAX_LOT_SPACES,
            });
        }
        Ok(total)
    }
}

// ---------------------------------------------------------------------------
// ParkingLot
// ---------------------------------------------------------------------------

/// A snapshot of one real-world lot and its expanded spaces.
///
/// `total_capacity` is taken from upstream as-is and is not re-validated
/// against `counters.total()`; the space list always follows the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingLot {
    /// Upstream sequence number of the record.
    pub sequence: u32,
    pub address: String,
    /// Floor area as reported upstream (free-form text).
    pub floor_area: String,
    pub counters: LotCounters,
    pub total_capacity: u32,
    pub spaces: Vec<ParkingSpace>,
}

impl ParkingLot {
    /// Builds a lot and expands its counters into spaces.
    ///
    /// Expansion allocates one space per counted slot. Use
    /// [`ParkingLot::try_new`] for counters that haven't been checked.
    pub fn new(
        sequence: u32,
        address: impl Into<String>,
        floor_area: impl Into<String>,
        counters: LotCounters,
        total_capacity: u32,
    ) -> Self {
        Self {
            sequence,
            address: address.into(),
            floor_area: floor_area.into(),
            counters,
            total_capacity,
            spaces: registry::expand(&counters),
        }
    }

    /// Like [`ParkingLot::new`], but refuses counters that fail
    /// [`LotCounters::checked_total`].
    pub fn try_new(
        sequence: u32,
        address: impl Into<String>,
        floor_area: impl Into<String>,
        counters: LotCounters,
        total_capacity: u32,
    ) -> Result<Self, CapacityError> {
        counters.checked_total()?;
        Ok(Self::new(
            sequence,
            address,
            floor_area,
            counters,
            total_capacity,
        ))
    }

    /// Looks up a space by id.
    pub fn space(&self, id: SpaceId) -> Option<&ParkingSpace> {
        self.spaces.iter().find(|s| s.id == id)
    }
}
