//! Core engine types: players, configuration, errors, RNG.
//!
//! Everything else in the crate builds on these. None of them know about
//! the board or the turn machine.

pub mod config;
pub mod error;
pub mod player;
pub mod rng;

pub use config::{GameConfig, PathLayout};
pub use error::{EngineError, PhaseKind};
pub use player::{Player, PlayerMap};
pub use rng::{GameRng, GameRngState};
