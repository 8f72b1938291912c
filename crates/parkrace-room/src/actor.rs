//! Room actor: an isolated Tokio task that owns one room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are processed one at a time, so a
//! mutation always sees the result of every mutation queued before it.
//! No lock is ever held on a room.

use tokio::sync::{mpsc, oneshot};

use crate::{Room, RoomError, RoomId};

/// A change to apply to the room. Its result travels back through a reply
/// channel captured inside the closure.
type Mutation = Box<dyn FnOnce(&mut Room) + Send>;

/// Commands sent to a room actor through its channel.
enum RoomCommand {
    /// Apply a change to the room.
    Mutate(Mutation),

    /// Request a copy of the current room.
    Snapshot { reply: oneshot::Sender<Room> },
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone; it's just an `mpsc::Sender` wrapper. The store holds
/// one of these per room.
#[derive(Clone)]
pub(crate) struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Runs `f` against the room inside the actor and returns its result.
    ///
    /// Once the command is queued the change is applied even if the
    /// caller stops waiting for the reply.
    pub(crate) async fn mutate<T, F>(&self, f: F) -> Result<T, RoomError>
    where
        F: FnOnce(&mut Room) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let mutation: Mutation = Box::new(move |room| {
            let _ = reply_tx.send(f(room));
        });
        self.sender
            .send(RoomCommand::Mutate(mutation))
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }

    /// Returns `true` if both handles talk to the same actor.
    pub(crate) fn same_actor(&self, other: &RoomHandle) -> bool {
        self.sender.same_channel(&other.sender)
    }

    /// Requests a copy of the room as of the moment the actor handles it.
    pub(crate) async fn snapshot(&self) -> Result<Room, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id.clone()))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Processes commands until every handle has been dropped.
    async fn run(mut self) {
        tracing::debug!(room_id = %self.room.id, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Mutate(mutation) => mutation(&mut self.room),
                RoomCommand::Snapshot { reply } => {
                    let _ = reply.send(self.room.clone());
                }
            }
        }

        tracing::debug!(room_id = %self.room.id, "room actor stopped");
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `channel_size` controls backpressure: if the channel fills up, senders
/// wait (bounded channel).
pub(crate) fn spawn_room(room: Room, channel_size: usize) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size.max(1));
    let room_id = room.id.clone();

    let actor = RoomActor { room, receiver: rx };
    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
