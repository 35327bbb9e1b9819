//! Move legality.
//!
//! `MoveResolver` turns a roll and a board into the exhaustive, ordered
//! list of legal moves. The turn machine offers exactly that list and
//! accepts nothing else.

pub mod moves;
pub mod resolver;

pub use moves::{LegalMove, MoveList};
pub use resolver::MoveResolver;
