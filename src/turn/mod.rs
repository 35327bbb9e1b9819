//! Turn sequencing: roll, choose, apply, decide who goes next.
//!
//! `TurnController` is the engine's command and query surface. Rendering,
//! transport and session layers drive a game only through it.

pub mod controller;
pub mod phase;
pub mod record;
pub mod snapshot;

pub use controller::{MoveOutcome, TurnController};
pub use phase::Phase;
pub use record::{TurnAction, TurnRecord};
pub use snapshot::GameSnapshot;
