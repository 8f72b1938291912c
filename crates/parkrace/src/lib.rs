//! # Parkrace
//!
//! Players race to claim parking spaces in a shared room built from a
//! real parking-lot record, then compare who holds the most.
//!
//! A request layer (HTTP, RPC, anything) holds one [`RoomService`] and
//! calls its operations; everything below it is in the sub-crates:
//!
//! ```text
//! RoomService (this crate)
//!     ├── parkrace-source  ← where lot data comes from
//!     ├── parkrace-room    ← room store, per-room actors, stats
//!     └── parkrace-lot     ← lots, spaces, claim rules
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parkrace::prelude::*;
//!
//! # async fn run() {
//! let lots = vec![ParkingLot::new(1, "Jung-gu", "420", LotCounters::new(1, 0, 1, 0), 2)];
//! let service = RoomService::new(StaticLotSource::new(lots), ServiceConfig::default());
//!
//! let room_id = service.create_room(1).await;
//! // ...poll `room_status` until Ready, then:
//! service.join_room(&room_id, PlayerId::from("A")).await;
//! let outcome = service.occupy_space(&room_id, 1, &PlayerId::from("A")).await;
//! assert!(outcome.success);
//! # }
//! ```

mod config;
mod error;
pub mod logging;
mod service;

pub use config::{FetchPolicy, ServiceConfig};
pub use error::ParkraceError;
pub use service::{OccupyOutcome, RoomService, RoomStatus};

/// Everything a request layer usually needs, in one import.
pub mod prelude {
    pub use crate::{
        FetchPolicy, OccupyOutcome, ParkraceError, RoomService, RoomStatus,
        ServiceConfig,
    };
    pub use parkrace_lot::{
        ClaimError, LotCounters, ParkingLot, ParkingSpace, PlayerId,
        SpaceCategory, SpaceId, SpaceStatus,
    };
    pub use parkrace_room::{
        Leaderboard, Room, RoomError, RoomId, RoomStats, StoreConfig,
    };
    pub use parkrace_source::{
        HttpLotSource, LotSource, SourceConfig, SourceError, StaticLotSource,
    };
}
