//! Occupancy statistics derived from a room snapshot.

use std::collections::BTreeMap;

use parkrace_lot::{PlayerId, SpaceStatus};
use serde::{Deserialize, Serialize};

use crate::{Room, RoomId};

/// Number of spaces each player holds. Players holding nothing are absent.
pub type Leaderboard = BTreeMap<PlayerId, usize>;

/// Summary of a room's claim state.
///
/// Always `occupied_spaces + available_spaces == total_spaces` and the
/// leaderboard counts add up to `occupied_spaces`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomStats {
    pub room_id: RoomId,
    pub total_spaces: usize,
    pub occupied_spaces: usize,
    pub available_spaces: usize,
    /// Roster in join order.
    pub players: Vec<PlayerId>,
    pub leaderboard: Leaderboard,
}

/// Builds the stats for a room. Pure; the room is only read.
///
/// The leaderboard is unordered by contract. Ranking by count is left to
/// whoever presents it.
pub fn project(room: &Room) -> RoomStats {
    let spaces = &room.lot.spaces;
    let total_spaces = spaces.len();
    let occupied_spaces = spaces
        .iter()
        .filter(|s| s.status == SpaceStatus::Occupied)
        .count();

    let mut leaderboard = Leaderboard::new();
    for claimant in spaces.iter().filter_map(|s| s.occupied_by.as_ref()) {
        *leaderboard.entry(claimant.clone()).or_insert(0) += 1;
    }

    RoomStats {
        room_id: room.id.clone(),
        total_spaces,
        occupied_spaces,
        available_spaces: total_spaces - occupied_spaces,
        players: room.players.clone(),
        leaderboard,
    }
}
