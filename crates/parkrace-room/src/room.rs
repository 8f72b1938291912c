//! The room model: one race over one lot snapshot.

use chrono::{DateTime, Utc};
use parkrace_lot::{ParkingLot, ParkingSpace, PlayerId, SpaceId, claim};
use serde::{Deserialize, Serialize};

use crate::{RoomError, RoomId};

/// A live race: a lot snapshot, the players who joined, and who holds
/// which space.
///
/// Rooms are owned by the [`RoomStore`](crate::RoomStore). Values handed
/// to callers are snapshots; changing one has no effect on the stored
/// room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub lot: ParkingLot,
    /// Distinct player ids in join order.
    pub players: Vec<PlayerId>,
    pub created_at: DateTime<Utc>,
    /// Always `true`; nothing deactivates a room yet.
    pub active: bool,
}

impl Room {
    /// Creates an active room with an empty roster.
    pub fn new(id: RoomId, lot: ParkingLot, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            lot,
            players: Vec::new(),
            created_at,
            active: true,
        }
    }

    /// Returns `true` if the player has joined.
    pub fn is_member(&self, player_id: &PlayerId) -> bool {
        self.players.contains(player_id)
    }

    /// Adds a player to the roster.
    ///
    /// Joining twice is harmless: returns `false` and leaves the roster
    /// as it was. Returns `true` if the player was added.
    pub fn join(&mut self, player_id: PlayerId) -> bool {
        if self.is_member(&player_id) {
            return false;
        }
        self.players.push(player_id);
        true
    }

    /// Claims a space for a member.
    ///
    /// Checks, in order: membership, space existence, availability. The
    /// first failing check decides the error and nothing is changed.
    pub fn occupy(
        &mut self,
        space_id: SpaceId,
        player_id: &PlayerId,
        now: DateTime<Utc>,
    ) -> Result<ParkingSpace, RoomError> {
        if !self.is_member(player_id) {
            return Err(RoomError::NotAMember(
                player_id.clone(),
                self.id.clone(),
            ));
        }
        Ok(claim(&mut self.lot.spaces, space_id, player_id, now)?)
    }
}

#[cfg(test)]
mod tests {
    use parkrace_lot::{ClaimError, LotCounters, SpaceStatus};

    use super::*;

    fn room() -> Room {
        let lot = ParkingLot::new(1, "Mapo-gu", "210", LotCounters::new(1, 0, 1, 0), 2);
        Room::new(RoomId::from("r1"), lot, Utc::now())
    }

    fn pid(name: &str) -> PlayerId {
        PlayerId::from(name)
    }

    #[test]
    fn test_new_room_is_active_and_empty() {
        let room = room();
        assert!(room.active);
        assert!(room.players.is_empty());
        assert_eq!(room.lot.spaces.len(), 2);
    }

    #[test]
    fn test_join_appends_in_order() {
        let mut room = room();
        assert!(room.join(pid("A")));
        assert!(room.join(pid("B")));
        assert_eq!(room.players, vec![pid("A"), pid("B")]);
    }

    #[test]
    fn test_join_twice_keeps_single_entry() {
        let mut room = room();
        room.join(pid("A"));

        assert!(!room.join(pid("A")));
        assert_eq!(room.players.len(), 1);
    }

    #[test]
    fn test_occupy_non_member_returns_not_a_member() {
        let mut room = room();

        let result = room.occupy(1, &pid("ghost"), Utc::now());

        assert_eq!(
            result,
            Err(RoomError::NotAMember(pid("ghost"), RoomId::from("r1")))
        );
        assert!(room.lot.spaces[0].status.is_available(), "space untouched");
    }

    #[test]
    fn test_occupy_membership_checked_before_space() {
        // A non-member asking for a missing space hears about membership.
        let mut room = room();

        let result = room.occupy(99, &pid("ghost"), Utc::now());

        assert!(matches!(result, Err(RoomError::NotAMember(..))));
    }

    #[test]
    fn test_occupy_member_claims_space() {
        let mut room = room();
        room.join(pid("A"));

        let space = room.occupy(2, &pid("A"), Utc::now()).expect("should succeed");

        assert_eq!(space.status, SpaceStatus::Occupied);
        assert_eq!(space.occupied_by, Some(pid("A")));
        assert_eq!(room.lot.spaces[1], space);
    }

    #[test]
    fn test_occupy_missing_space_returns_claim_not_found() {
        let mut room = room();
        room.join(pid("A"));

        let result = room.occupy(3, &pid("A"), Utc::now());

        assert_eq!(result, Err(RoomError::Claim(ClaimError::NotFound(3))));
    }

    #[test]
    fn test_occupy_taken_space_returns_already_claimed() {
        let mut room = room();
        room.join(pid("A"));
        room.join(pid("B"));
        room.occupy(1, &pid("A"), Utc::now()).unwrap();

        let result = room.occupy(1, &pid("B"), Utc::now());

        assert_eq!(result, Err(RoomError::Claim(ClaimError::AlreadyClaimed(1))));
    }
}
