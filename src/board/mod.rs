//! Board geometry and piece placement.
//!
//! - `PathModel`: fixed mapping from (player, track index) to board coordinate
//! - `BoardState`: where every piece is, with hand and completed counts
//!
//! Geometry stays in `PathModel`; rules code asks it questions rather than
//! doing coordinate arithmetic itself.

pub mod coord;
pub mod path;
pub mod piece;
pub mod state;

pub use coord::BoardCoordinate;
pub use path::{PathModel, Square, SHARED_ROW};
pub use piece::{PieceId, PieceLocation, PieceRef};
pub use state::{BoardState, OccupiedSquare, Occupant, Placement};
