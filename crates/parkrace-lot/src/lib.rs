//! Parking lot data model for Parkrace.
//!
//! This crate knows nothing about rooms, players racing, or where lot
//! data comes from. It defines:
//!
//! - **Types** ([`ParkingLot`], [`ParkingSpace`], [`LotCounters`], etc.):
//!   a snapshot of one real-world lot, expanded into claimable spaces.
//! - **Registry** ([`expand`], [`claim`]): building the space list from
//!   capacity counters and the one-way `available → occupied` transition.
//! - **Errors** ([`ClaimError`], [`CapacityError`]): why a claim was
//!   refused, or why counters can't become a lot.
//!
//! ```text
//! Source (upstream records) → Lot (spaces) → Room (players + claims)
//! ```

mod error;
mod registry;
mod types;

pub use error::{CapacityError, ClaimError};
pub use registry::{claim, expand};
pub use types::{
    LotCounters, MAX_LOT_SPACES, ParkingLot, ParkingSpace, PlayerId,
    SpaceCategory, SpaceId, SpaceStatus,
};
