//! Typed records for every resource the game API serves

pub mod events;
pub mod intel;
pub mod overview;
pub mod sync;

pub use events::{EventPayload, GameEvent, GameEventsResponse, ShipCount};
pub use intel::{GameIntelTick, PlayerIntelTick};
pub use overview::{GameInfoResponse, GameOverviewResponse, UserInfo};
pub use sync::{GameSyncResponse, Player};

/// A game simulation step
pub type Tick = i64;
