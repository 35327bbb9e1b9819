//! Game configuration types.
//!
//! The board geometry is data, not code: `PathLayout` says how long each
//! segment of a player's path is and which track indices are rosettes.
//! `PathModel` builds its coordinate table from it once.
//!
//! The defaults reproduce the historical board:
//!
//! ```text
//!   col:  0  1  2  3  4  5  6  7
//! row 0:  *  .  .  .        *  .     Player 2 entry / exit
//! row 1:  .  .  .  *  .  .  .  .     shared lane
//! row 2:  *  .  .  .        *  .     Player 1 entry / exit
//! ```

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::player::Player;

/// Segment lengths and rosette placement for each player's path.
///
/// A path runs through `entry_len` exclusive squares (right to left on the
/// player's own row), then `shared_len` squares along the middle row (left
/// to right), then `exit_len` exclusive squares back on the player's row
/// (right to left).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLayout {
    /// Exclusive squares before the shared lane.
    pub entry_len: usize,

    /// Squares in the shared middle lane.
    pub shared_len: usize,

    /// Exclusive squares after the shared lane.
    pub exit_len: usize,

    /// Track indices that are rosettes, identical for both players.
    pub rosettes: Vec<usize>,
}

impl Default for PathLayout {
    fn default() -> Self {
        Self {
            entry_len: 4,
            shared_len: 8,
            exit_len: 2,
            rosettes: vec![3, 7, 13],
        }
    }
}

impl PathLayout {
    /// Total track positions on one player's path.
    #[must_use]
    pub fn path_length(&self) -> usize {
        self.entry_len + self.shared_len + self.exit_len
    }

    /// Check that the layout describes a buildable board.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.entry_len == 0 || self.shared_len == 0 || self.exit_len == 0 {
            return Err(EngineError::InvalidConfig(
                "path segments must all be non-empty".to_string(),
            ));
        }

        // Columns are u8 coordinates.
        if self.shared_len > usize::from(u8::MAX) {
            return Err(EngineError::InvalidConfig(format!(
                "shared lane of {} squares exceeds {} columns",
                self.shared_len,
                u8::MAX
            )));
        }

        // Entry and exit squares share a row; they must not overlap.
        if self.entry_len + self.exit_len > self.shared_len {
            return Err(EngineError::InvalidConfig(format!(
                "entry ({}) and exit ({}) segments do not fit beside a shared lane of {}",
                self.entry_len, self.exit_len, self.shared_len
            )));
        }

        let path_length = self.path_length();
        if let Some(&bad) = self.rosettes.iter().find(|&&r| r >= path_length) {
            return Err(EngineError::InvalidConfig(format!(
                "rosette at track index {bad} is beyond a path of length {path_length}"
            )));
        }

        Ok(())
    }
}

/// Complete configuration for one game instance.
///
/// ## Example
///
/// ```
/// use royal_ur::core::{GameConfig, Player};
///
/// let config = GameConfig::new()
///     .with_seed(7)
///     .with_starting_player(Player::Two);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.layout.path_length(), 14);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Pieces each player must bring home to win.
    pub pieces_per_player: u8,

    /// Board geometry.
    pub layout: PathLayout,

    /// Who rolls first.
    pub starting_player: Player,

    /// Seed for the dice stream.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pieces_per_player: 7,
            layout: PathLayout::default(),
            starting_player: Player::One,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Create the standard configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of pieces per player.
    #[must_use]
    pub fn with_pieces_per_player(mut self, count: u8) -> Self {
        self.pieces_per_player = count;
        self
    }

    /// Set the board layout.
    #[must_use]
    pub fn with_layout(mut self, layout: PathLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the first player to roll.
    #[must_use]
    pub fn with_starting_player(mut self, player: Player) -> Self {
        self.starting_player = player;
        self
    }

    /// Set the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.pieces_per_player == 0 {
            return Err(EngineError::InvalidConfig(
                "each player needs at least one piece".to_string(),
            ));
        }
        self.layout.validate()
    }
}
