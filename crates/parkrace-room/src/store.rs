//! Room store: keyed collection of running room actors.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokio::sync::RwLock;

use crate::actor::{RoomHandle, spawn_room};
use crate::{Room, RoomError, RoomId, StoreConfig};

/// Owns every active room and is the only way to read or change one.
///
/// The map lock is held just long enough to look up or insert a handle;
/// the actual work happens inside the room's actor. Two callers touching
/// the same room are served one after the other, while callers touching
/// different rooms never wait on each other.
pub struct RoomStore {
    /// Active rooms, keyed by room ID.
    rooms: RwLock<HashMap<RoomId, RoomHandle>>,
    config: StoreConfig,
}

impl RoomStore {
    /// Creates a new, empty store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Stores a room and starts its actor.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`RoomError::DuplicateId`] if a room with the same id is
    /// already stored; the existing room is left untouched.
    pub async fn insert(&self, room: Room) -> Result<(), RoomError> {
        let mut rooms = self.rooms.write().await;
        match rooms.entry(room.id.clone()) {
            Entry::Occupied(entry) => {
                Err(RoomError::DuplicateId(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                let room_id = entry.key().clone();
                entry.insert(spawn_room(room, self.config.channel_size));
                tracing::info!(%room_id, "room stored");
                Ok(())
            }
        }
    }

    /// Returns a snapshot of the room, or `None` if it doesn't exist.
    ///
    /// The snapshot reflects every mutation that completed before this call
    /// and none that is half-applied.
    pub async fn get(&self, room_id: &RoomId) -> Option<Room> {
        let handle = self.handle(room_id).await.ok()?;
        match handle.snapshot().await {
            Ok(room) => Some(room),
            Err(e) => {
                tracing::warn!(%room_id, error = %e, "room snapshot failed");
                self.evict(room_id, &handle).await;
                None
            }
        }
    }

    /// Applies `f` to the room with exclusive access and returns its result.
    ///
    /// Mutations to one room run strictly one after another, in the order
    /// they reach the room's actor. If the actor has stopped (for example
    /// because an earlier mutation panicked) the room is removed, and later
    /// calls report [`RoomError::NotFound`].
    ///
    /// # Errors
    /// - [`RoomError::NotFound`]: no room with this id
    /// - [`RoomError::Unavailable`]: the room's actor has stopped
    pub async fn mutate<T, F>(
        &self,
        room_id: &RoomId,
        f: F,
    ) -> Result<T, RoomError>
    where
        F: FnOnce(&mut Room) -> T + Send + 'static,
        T: Send + 'static,
    {
        let handle = self.handle(room_id).await?;
        let result = handle.mutate(f).await;
        if matches!(result, Err(RoomError::Unavailable(_))) {
            self.evict(room_id, &handle).await;
        }
        result
    }

    /// Returns `true` if a room with this id is stored.
    pub async fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.read().await.contains_key(room_id)
    }

    /// Returns the number of stored rooms.
    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Returns `true` if no room is stored.
    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }

    /// Lists all stored room IDs.
    pub async fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// Drops the room if its entry still points at the stopped actor.
    async fn evict(&self, room_id: &RoomId, stopped: &RoomHandle) {
        let mut rooms = self.rooms.write().await;
        if rooms.get(room_id).is_some_and(|h| h.same_actor(stopped)) {
            rooms.remove(room_id);
            tracing::warn!(%room_id, "room actor stopped, room removed");
        }
    }

    /// Clones the room's handle so the map lock is released before any
    /// message is sent to the actor.
    async fn handle(&self, room_id: &RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .read()
            .await
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }
}

impl Default for RoomStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
