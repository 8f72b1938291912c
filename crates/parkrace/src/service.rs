//! `RoomService`: the operations a request layer calls.
//!
//! Ties the layers together: source → lot → room store → stats. A service
//! is built once at process start and shared (it is cheap to clone).
//!
//! Room creation is two-phase. [`RoomService::create_room`] returns an id
//! right away and fetches the lot in the background; until that finishes
//! (or if it fails) every other operation treats the id as unknown.
//! [`RoomService::room_status`] tells the two cases apart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parkrace_lot::{ClaimError, ParkingLot, ParkingSpace, PlayerId, SpaceId};
use parkrace_room::{Room, RoomError, RoomId, RoomStats, RoomStore, project};
use parkrace_source::LotSource;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{FetchPolicy, ParkraceError, ServiceConfig};

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// Where a minted room id is in its creation.
///
/// ```text
/// create_room ──→ Pending ──(lot fetched, room stored)──→ Ready
///                    │
///                    └──(fetch failed / lot out of range)──→ Failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoomStatus {
    Pending,
    Ready,
    Failed { reason: String },
}

impl RoomStatus {
    /// Returns `true` once creation has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ---------------------------------------------------------------------------
// OccupyOutcome
// ---------------------------------------------------------------------------

/// Result of a claim attempt, shaped for display.
///
/// `message` is meant for people. Branch on `success`, never on the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupyOutcome {
    pub success: bool,
    pub message: String,
    /// The now-occupied space; `None` on failure.
    pub space: Option<ParkingSpace>,
}

impl OccupyOutcome {
    fn claimed(space: ParkingSpace) -> Self {
        Self {
            success: true,
            message: "Parking space claimed successfully!".to_string(),
            space: Some(space),
        }
    }

    fn rejected(err: &RoomError) -> Self {
        Self {
            success: false,
            message: rejection_message(err),
            space: None,
        }
    }

    /// Splits into `(success, message, space)`.
    pub fn into_parts(self) -> (bool, String, Option<ParkingSpace>) {
        (self.success, self.message, self.space)
    }
}

/// Failure reason recorded for a ready room whose actor has stopped.
const STOPPED_REASON: &str = "room stopped unexpectedly";

fn rejection_message(err: &RoomError) -> String {
    match err {
        RoomError::NotFound(_) | RoomError::Unavailable(_) => {
            "Game room not found".to_string()
        }
        RoomError::NotAMember(..) => {
            "Player has not joined this game".to_string()
        }
        RoomError::Claim(ClaimError::NotFound(_)) => {
            "Parking space does not exist".to_string()
        }
        RoomError::Claim(ClaimError::AlreadyClaimed(_)) => {
            "Parking space is already occupied".to_string()
        }
        RoomError::DuplicateId(_) => err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// RoomService
// ---------------------------------------------------------------------------

/// The public face of Parkrace: create rooms, join, claim, read stats.
///
/// Failures never escape as errors from the game operations: joins report
/// `bool`, claims report an [`OccupyOutcome`], reads report `Option`.
pub struct RoomService<S: LotSource> {
    inner: Arc<Inner<S>>,
}

struct Inner<S: LotSource> {
    source: S,
    store: RoomStore,
    /// Every id this service has minted, with its creation status.
    statuses: Mutex<HashMap<RoomId, RoomStatus>>,
    config: ServiceConfig,
}

impl<S: LotSource> Clone for RoomService<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: LotSource> RoomService<S> {
    /// Creates a service with an empty room store.
    pub fn new(source: S, config: ServiceConfig) -> Self {
        let store = RoomStore::new(config.store.clone());
        Self {
            inner: Arc::new(Inner {
                source,
                store,
                statuses: Mutex::new(HashMap::new()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    /// Fetches one page of lots from the source.
    ///
    /// # Errors
    /// Under [`FetchPolicy::Strict`], returns [`ParkraceError::Source`]
    /// when the source fails. Under [`FetchPolicy::Lenient`] a failure is
    /// logged and an empty list returned.
    pub async fn list_lots(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ParkingLot>, ParkraceError> {
        self.inner.fetch_lots(page, per_page).await
    }

    /// Mints a room id and starts building the room in the background.
    ///
    /// `lot_id` is 1-based into the configured fetch page. The room becomes
    /// visible once the lot is fetched; if the fetch fails or `lot_id` is
    /// out of range it never does, and [`room_status`](Self::room_status)
    /// reports `Failed`. Must be called from within a Tokio runtime.
    pub async fn create_room(&self, lot_id: u32) -> RoomId {
        let room_id = self.inner.mint_room_id().await;

        let inner = Arc::clone(&self.inner);
        let task_room_id = room_id.clone();
        tokio::spawn(async move {
            inner.supervise_initialization(task_room_id, lot_id).await;
        });

        tracing::info!(%room_id, lot_id, "room creation started");
        room_id
    }

    /// Returns the creation status of an id minted by this service, or
    /// `None` if the id was never minted here.
    ///
    /// A room whose actor has stopped after it became ready is reported
    /// as `Failed` from then on.
    pub async fn room_status(&self, room_id: &RoomId) -> Option<RoomStatus> {
        let mut statuses = self.inner.statuses.lock().await;
        let status = statuses.get_mut(room_id)?;
        if *status == RoomStatus::Ready && !self.inner.store.contains(room_id).await {
            *status = RoomStatus::Failed {
                reason: STOPPED_REASON.to_string(),
            };
        }
        Some(status.clone())
    }

    /// Returns a snapshot of the room, or `None` if it isn't ready (still
    /// initializing, failed, or unknown).
    ///
    /// A room is never visible here while its
    /// [`room_status`](Self::room_status) is still `Pending`.
    pub async fn get_room(&self, room_id: &RoomId) -> Option<Room> {
        self.inner.store.get(room_id).await
    }

    /// Adds a player to a room's roster.
    ///
    /// Returns `false` only if the room doesn't exist. Joining a room the
    /// player is already in returns `true` and changes nothing.
    pub async fn join_room(&self, room_id: &RoomId, player_id: PlayerId) -> bool {
        let joiner = player_id.clone();
        match self
            .inner
            .store
            .mutate(room_id, move |room| room.join(joiner))
            .await
        {
            Ok(true) => {
                tracing::info!(%room_id, %player_id, "player joined");
                true
            }
            Ok(false) => {
                tracing::debug!(%room_id, %player_id, "player already in room");
                true
            }
            Err(e) => {
                tracing::debug!(%room_id, %player_id, error = %e, "join rejected");
                false
            }
        }
    }

    /// Claims a space for a player.
    ///
    /// The membership, existence and availability checks and the claim
    /// itself run as one step inside the room's actor, so of any number of
    /// concurrent claims on one space exactly one succeeds.
    pub async fn occupy_space(
        &self,
        room_id: &RoomId,
        space_id: SpaceId,
        player_id: &PlayerId,
    ) -> OccupyOutcome {
        let claimant = player_id.clone();
        let result = self
            .inner
            .store
            .mutate(room_id, move |room| {
                room.occupy(space_id, &claimant, Utc::now())
            })
            .await
            .and_then(|claim| claim);

        match result {
            Ok(space) => {
                tracing::info!(%room_id, %player_id, space_id, "space claimed");
                OccupyOutcome::claimed(space)
            }
            Err(e) => {
                tracing::debug!(
                    %room_id,
                    %player_id,
                    space_id,
                    error = %e,
                    "claim rejected"
                );
                OccupyOutcome::rejected(&e)
            }
        }
    }

    /// Returns occupancy stats and the leaderboard, or `None` if the room
    /// doesn't exist.
    pub async fn get_stats(&self, room_id: &RoomId) -> Option<RoomStats> {
        self.inner
            .store
            .get(room_id)
            .await
            .map(|room| project(&room))
    }
}

impl<S: LotSource> Inner<S> {
    /// Mints an id not yet handed out by this service and marks it pending.
    async fn mint_room_id(&self) -> RoomId {
        let mut statuses = self.statuses.lock().await;
        let room_id = loop {
            let candidate = RoomId::generate();
            if !statuses.contains_key(&candidate) {
                break candidate;
            }
        };
        statuses.insert(room_id.clone(), RoomStatus::Pending);
        room_id
    }

    /// Background half of room creation. Runs the build on its own task so
    /// that a panic there still settles the status as `Failed`.
    async fn supervise_initialization(self: Arc<Self>, room_id: RoomId, lot_id: u32) {
        let build = tokio::spawn({
            let inner = Arc::clone(&self);
            let room_id = room_id.clone();
            async move { inner.build_room(&room_id, lot_id).await }
        });

        let result = match build.await {
            Ok(result) => result,
            Err(e) => Err(ParkraceError::InitAborted(e.to_string())),
        };

        match result {
            Ok(()) => tracing::info!(%room_id, lot_id, "room ready"),
            Err(e) => {
                tracing::warn!(%room_id, lot_id, error = %e, "room creation failed");
                self.statuses.lock().await.insert(
                    room_id,
                    RoomStatus::Failed {
                        reason: e.to_string(),
                    },
                );
            }
        }
    }

    /// Fetches the lot and stores the room. The status lock is held across
    /// the insert, so the room and its `Ready` status appear together.
    async fn build_room(
        &self,
        room_id: &RoomId,
        lot_id: u32,
    ) -> Result<(), ParkraceError> {
        let lots = self
            .fetch_lots(self.config.fetch_page, self.config.fetch_per_page)
            .await?;
        let available = lots.len();
        let lot = select_lot(lots, lot_id)
            .ok_or(ParkraceError::LotOutOfRange { lot_id, available })?;

        let room = Room::new(room_id.clone(), lot, Utc::now());
        let mut statuses = self.statuses.lock().await;
        self.store.insert(room).await?;
        statuses.insert(room_id.clone(), RoomStatus::Ready);
        Ok(())
    }

    async fn fetch_lots(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<ParkingLot>, ParkraceError> {
        match self.source.fetch_lots(page, per_page).await {
            Ok(lots) => Ok(lots),
            Err(e) => match self.config.fetch_policy {
                FetchPolicy::Lenient => {
                    tracing::warn!(page, per_page, error = %e, "lot fetch failed, using no lots");
                    Ok(Vec::new())
                }
                FetchPolicy::Strict => {
                    tracing::warn!(page, per_page, error = %e, "lot fetch failed");
                    Err(e.into())
                }
            },
        }
    }
}

/// Picks the `lot_id`-th lot (1-based). Zero is out of range.
fn select_lot(lots: Vec<ParkingLot>, lot_id: u32) -> Option<ParkingLot> {
    let index = usize::try_from(lot_id).ok()?.checked_sub(1)?;
    lots.into_iter().nth(index)
}
