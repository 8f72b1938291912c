//! Integration tests for `RoomService`: two-phase creation, joining,
//! claiming, and stats.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parkrace::prelude::*;
use parkrace_source::decode_lots;
use tokio::sync::Notify;

// =========================================================================
// Mock sources
// =========================================================================

/// Serves its lots only after `release` is notified.
struct GatedSource {
    lots: Vec<ParkingLot>,
    release: Arc<Notify>,
}

impl LotSource for GatedSource {
    async fn fetch_lots(
        &self,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<ParkingLot>, SourceError> {
        self.release.notified().await;
        Ok(self.lots.clone())
    }
}

/// Always fails as if the upstream were down.
struct FailingSource;

impl LotSource for FailingSource {
    async fn fetch_lots(
        &self,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<ParkingLot>, SourceError> {
        Err(SourceError::Status(500))
    }
}

/// Panics mid-fetch, as a buggy source would.
struct PanickingSource;

impl LotSource for PanickingSource {
    async fn fetch_lots(
        &self,
        _page: u32,
        _per_page: u32,
    ) -> Result<Vec<ParkingLot>, SourceError> {
        panic!("lot source blew up")
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn pid(name: &str) -> PlayerId {
    PlayerId::from(name)
}

fn lot(sequence: u32, counters: LotCounters) -> ParkingLot {
    ParkingLot::new(sequence, format!("lot {sequence}"), "100", counters, counters.total())
}

fn static_service(lots: Vec<ParkingLot>) -> RoomService<StaticLotSource> {
    RoomService::new(StaticLotSource::new(lots), ServiceConfig::default())
}

/// Polls until room creation has settled.
async fn wait_settled<S: LotSource>(service: &RoomService<S>, room_id: &RoomId) -> RoomStatus {
    for _ in 0..400 {
        match service.room_status(room_id).await {
            Some(status) if status.is_settled() => return status,
            _ => tokio::time::sleep(Duration::from_millis(5)).await,
        }
    }
    panic!("room {room_id} never settled");
}

/// Creates a room on lot 1 and waits for it to be ready.
async fn ready_room(service: &RoomService<StaticLotSource>) -> RoomId {
    let room_id = service.create_room(1).await;
    assert_eq!(wait_settled(service, &room_id).await, RoomStatus::Ready);
    room_id
}

// =========================================================================
// End-to-end scenario
// =========================================================================

#[tokio::test]
async fn test_two_players_race_for_one_space() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 1, 0))]);
    let room_id = ready_room(&service).await;

    let room = service.get_room(&room_id).await.expect("room should be ready");
    let ids: Vec<SpaceId> = room.lot.spaces.iter().map(|s| s.id).collect();
    let categories: Vec<SpaceCategory> = room.lot.spaces.iter().map(|s| s.category).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(
        categories,
        vec![SpaceCategory::IndoorMechanical, SpaceCategory::IndoorSelfPark]
    );

    // A joins and claims space 1.
    assert!(service.join_room(&room_id, pid("A")).await);
    let (ok, message, space) = service.occupy_space(&room_id, 1, &pid("A")).await.into_parts();
    assert!(ok);
    assert!(!message.is_empty());
    let space = space.expect("winner gets the space");
    assert_eq!(space.status, SpaceStatus::Occupied);
    assert_eq!(space.occupied_by, Some(pid("A")));
    assert!(space.occupied_at.is_some());

    // B joins and tries the same space.
    assert!(service.join_room(&room_id, pid("B")).await);
    let (ok, message, space) = service.occupy_space(&room_id, 1, &pid("B")).await.into_parts();
    assert!(!ok);
    assert!(!message.is_empty());
    assert!(space.is_none());

    let stats = service.get_stats(&room_id).await.expect("stats for ready room");
    assert_eq!(stats.total_spaces, 2);
    assert_eq!(stats.occupied_spaces, 1);
    assert_eq!(stats.available_spaces, 1);
    assert_eq!(stats.players, vec![pid("A"), pid("B")]);
    assert_eq!(stats.leaderboard, Leaderboard::from([(pid("A"), 1)]));
}

// =========================================================================
// create_room / room_status
// =========================================================================

#[tokio::test]
async fn test_create_room_is_not_found_until_populated() {
    let release = Arc::new(Notify::new());
    let service = RoomService::new(
        GatedSource {
            lots: vec![lot(1, LotCounters::new(1, 0, 0, 0))],
            release: Arc::clone(&release),
        },
        ServiceConfig::default(),
    );

    let room_id = service.create_room(1).await;

    // Still fetching: every operation treats the room as missing.
    assert_eq!(service.room_status(&room_id).await, Some(RoomStatus::Pending));
    assert!(service.get_room(&room_id).await.is_none());
    assert!(!service.join_room(&room_id, pid("A")).await);
    let outcome = service.occupy_space(&room_id, 1, &pid("A")).await;
    assert!(!outcome.success);
    assert!(outcome.space.is_none());
    assert_eq!(outcome.message, "Game room not found");
    assert!(service.get_stats(&room_id).await.is_none());

    release.notify_one();

    assert_eq!(wait_settled(&service, &room_id).await, RoomStatus::Ready);
    assert!(service.get_room(&room_id).await.is_some());
    assert!(service.join_room(&room_id, pid("A")).await);
}

#[tokio::test]
async fn test_create_room_lenient_fetch_failure_never_realizes_room() {
    let service = RoomService::new(FailingSource, ServiceConfig::default());

    let room_id = service.create_room(1).await;
    let status = wait_settled(&service, &room_id).await;

    assert!(
        matches!(&status, RoomStatus::Failed { reason } if reason.contains("out of range")),
        "lenient policy sees an empty lot list, got {status:?}"
    );
    assert!(service.get_room(&room_id).await.is_none());
    assert!(!service.occupy_space(&room_id, 1, &pid("A")).await.success);
}

#[tokio::test]
async fn test_create_room_strict_fetch_failure_records_source_error() {
    let config = ServiceConfig {
        fetch_policy: FetchPolicy::Strict,
        ..ServiceConfig::default()
    };
    let service = RoomService::new(FailingSource, config);

    let room_id = service.create_room(1).await;
    let status = wait_settled(&service, &room_id).await;

    assert!(
        matches!(&status, RoomStatus::Failed { reason } if reason.contains("500")),
        "strict policy keeps the upstream error, got {status:?}"
    );
    assert!(service.get_room(&room_id).await.is_none());
}

#[tokio::test]
async fn test_create_room_panicking_source_settles_failed() {
    let service = RoomService::new(PanickingSource, ServiceConfig::default());

    let room_id = service.create_room(1).await;
    let status = wait_settled(&service, &room_id).await;

    assert!(
        matches!(&status, RoomStatus::Failed { reason } if reason.contains("aborted")),
        "got {status:?}"
    );
    assert!(service.get_room(&room_id).await.is_none());
}

#[tokio::test]
async fn test_create_room_overflowing_upstream_counters_fails_cleanly() {
    let body = serde_json::to_vec(&serde_json::json!({
        "data": [{
            "순번": 1,
            "대지위치주소": "서울특별시 중구",
            "건축면적": "100",
            "옥내 기계식 주차대수": u32::MAX,
            "옥외 기계식 주차대수": 1,
            "옥내 자주식 주차대수": 0,
            "옥외 자주식 주차대수": 0,
            "총 주차대수": 0,
        }],
    }))
    .unwrap();
    let lots = decode_lots(&body).unwrap();
    let service = static_service(lots);

    let room_id = service.create_room(1).await;
    let status = wait_settled(&service, &room_id).await;

    assert!(
        matches!(&status, RoomStatus::Failed { reason } if reason.contains("out of range")),
        "the record is skipped, so lot 1 does not exist; got {status:?}"
    );
}

#[tokio::test]
async fn test_create_room_lot_out_of_range_fails() {
    let service = static_service(vec![
        lot(1, LotCounters::new(1, 0, 0, 0)),
        lot(2, LotCounters::new(0, 1, 0, 0)),
    ]);

    let too_high = service.create_room(3).await;
    let zero = service.create_room(0).await;

    for room_id in [too_high, zero] {
        let status = wait_settled(&service, &room_id).await;
        assert!(matches!(status, RoomStatus::Failed { .. }), "got {status:?}");
        assert!(service.get_room(&room_id).await.is_none());
    }
}

#[tokio::test]
async fn test_create_room_selects_lot_by_one_based_id() {
    let service = static_service(vec![
        lot(10, LotCounters::new(1, 0, 0, 0)),
        lot(20, LotCounters::new(0, 0, 0, 4)),
    ]);

    let room_id = service.create_room(2).await;
    wait_settled(&service, &room_id).await;

    let room = service.get_room(&room_id).await.unwrap();
    assert_eq!(room.lot.sequence, 20);
    assert_eq!(room.lot.spaces.len(), 4);
    assert!(room.active);
}

#[tokio::test]
async fn test_create_room_ids_are_unique() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 0, 0))]);

    let mut ids = HashSet::new();
    for _ in 0..20 {
        ids.insert(service.create_room(1).await);
    }

    assert_eq!(ids.len(), 20);
}

#[tokio::test]
async fn test_config_returns_construction_config() {
    let config = ServiceConfig {
        fetch_per_page: 25,
        fetch_policy: FetchPolicy::Strict,
        ..ServiceConfig::default()
    };
    let service = RoomService::new(StaticLotSource::default(), config);

    assert_eq!(service.config().fetch_per_page, 25);
    assert_eq!(service.config().fetch_policy, FetchPolicy::Strict);
}

#[tokio::test]
async fn test_room_status_unknown_id_is_none() {
    let service = static_service(Vec::new());
    assert!(service.room_status(&RoomId::from("deadbeef")).await.is_none());
}

#[tokio::test]
async fn test_rooms_on_same_lot_are_independent() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 0, 0))]);
    let first = ready_room(&service).await;
    let second = ready_room(&service).await;
    service.join_room(&first, pid("A")).await;
    service.join_room(&second, pid("B")).await;

    assert!(service.occupy_space(&first, 1, &pid("A")).await.success);
    assert!(service.occupy_space(&second, 1, &pid("B")).await.success);
}

// =========================================================================
// join_room
// =========================================================================

#[tokio::test]
async fn test_join_room_twice_keeps_roster_length() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 0, 0))]);
    let room_id = ready_room(&service).await;

    assert!(service.join_room(&room_id, pid("A")).await);
    let before = service.get_room(&room_id).await.unwrap().players.len();
    assert!(service.join_room(&room_id, pid("A")).await);
    let after = service.get_room(&room_id).await.unwrap().players.len();

    assert_eq!(before, 1);
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_join_room_unknown_room_returns_false() {
    let service = static_service(Vec::new());
    assert!(!service.join_room(&RoomId::from("nowhere"), pid("A")).await);
}

// =========================================================================
// occupy_space
// =========================================================================

#[tokio::test]
async fn test_occupy_space_requires_membership_even_when_free() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 0, 0))]);
    let room_id = ready_room(&service).await;

    let outcome = service.occupy_space(&room_id, 1, &pid("stranger")).await;

    assert!(!outcome.success);
    assert!(outcome.space.is_none());
    assert_eq!(outcome.message, "Player has not joined this game");
    let stats = service.get_stats(&room_id).await.unwrap();
    assert_eq!(stats.occupied_spaces, 0, "space must stay free");
}

#[tokio::test]
async fn test_occupy_space_missing_space_fails() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 0, 0))]);
    let room_id = ready_room(&service).await;
    service.join_room(&room_id, pid("A")).await;

    let outcome = service.occupy_space(&room_id, 42, &pid("A")).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Parking space does not exist");
}

#[tokio::test]
async fn test_occupy_space_losers_keep_failing() {
    let service = static_service(vec![lot(1, LotCounters::new(1, 0, 0, 0))]);
    let room_id = ready_room(&service).await;
    for name in ["A", "B", "C"] {
        service.join_room(&room_id, pid(name)).await;
    }
    assert!(service.occupy_space(&room_id, 1, &pid("A")).await.success);

    for name in ["B", "C", "A", "B"] {
        let outcome = service.occupy_space(&room_id, 1, &pid(name)).await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Parking space is already occupied");
    }
    let room = service.get_room(&room_id).await.unwrap();
    assert_eq!(room.lot.spaces[0].occupied_by, Some(pid("A")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_occupy_space_concurrent_claims_single_winner() {
    let service = static_service(vec![lot(1, LotCounters::new(0, 0, 3, 0))]);
    let room_id = ready_room(&service).await;
    let players: Vec<PlayerId> = (0..32).map(|i| pid(&format!("racer-{i}"))).collect();
    for player in &players {
        service.join_room(&room_id, player.clone()).await;
    }

    let mut tasks = Vec::new();
    for player in players {
        let service = service.clone();
        let room_id = room_id.clone();
        tasks.push(tokio::spawn(async move {
            let outcome = service.occupy_space(&room_id, 2, &player).await;
            (player, outcome.success)
        }));
    }

    let mut winners = Vec::new();
    for task in tasks {
        let (player, success) = task.await.unwrap();
        if success {
            winners.push(player);
        }
    }

    assert_eq!(winners.len(), 1, "exactly one racer may win space 2");
    let room = service.get_room(&room_id).await.unwrap();
    let space = room.lot.space(2).unwrap();
    assert_eq!(space.occupied_by.as_ref(), Some(&winners[0]));
}

// =========================================================================
// get_stats
// =========================================================================

#[tokio::test]
async fn test_get_stats_invariants_hold_after_mixed_claims() {
    let service = static_service(vec![lot(1, LotCounters::new(2, 2, 2, 2))]);
    let room_id = ready_room(&service).await;
    for name in ["A", "B", "idle"] {
        service.join_room(&room_id, pid(name)).await;
    }
    for (space, name) in [(1, "A"), (2, "B"), (3, "A"), (3, "B"), (8, "A"), (9, "B")] {
        service.occupy_space(&room_id, space, &pid(name)).await;
    }

    let stats = service.get_stats(&room_id).await.unwrap();

    assert_eq!(stats.total_spaces, 8);
    assert_eq!(stats.occupied_spaces, 4);
    assert_eq!(stats.occupied_spaces + stats.available_spaces, stats.total_spaces);
    assert_eq!(stats.leaderboard.values().sum::<usize>(), stats.occupied_spaces);
    assert_eq!(stats.leaderboard.get(&pid("A")), Some(&3));
    assert_eq!(stats.leaderboard.get(&pid("B")), Some(&1));
    assert!(!stats.leaderboard.contains_key(&pid("idle")));
}

#[tokio::test]
async fn test_get_stats_unknown_room_is_none() {
    let service = static_service(Vec::new());
    assert!(service.get_stats(&RoomId::from("missing")).await.is_none());
}

// =========================================================================
// list_lots
// =========================================================================

#[tokio::test]
async fn test_list_lots_pages_through_source() {
    let lots: Vec<ParkingLot> = (1..=5).map(|i| lot(i, LotCounters::new(1, 0, 0, 0))).collect();
    let service = static_service(lots);

    let page = service.list_lots(2, 2).await.unwrap();

    let sequences: Vec<u32> = page.iter().map(|l| l.sequence).collect();
    assert_eq!(sequences, vec![3, 4]);
}

#[tokio::test]
async fn test_list_lots_lenient_failure_is_empty() {
    let service = RoomService::new(FailingSource, ServiceConfig::default());

    let lots = service.list_lots(1, 10).await.expect("lenient never errors");

    assert!(lots.is_empty());
}

#[tokio::test]
async fn test_list_lots_strict_failure_is_error() {
    let config = ServiceConfig {
        fetch_policy: FetchPolicy::Strict,
        ..ServiceConfig::default()
    };
    let service = RoomService::new(FailingSource, config);

    let result = service.list_lots(1, 10).await;

    assert!(matches!(result, Err(ParkraceError::Source(SourceError::Status(500)))));
}
