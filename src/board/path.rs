//! Track-index to board-coordinate mapping.
//!
//! Each player walks a private logical path of `path_length` squares.
//! `PathModel` pins every (player, track index) pair to a square on the
//! shared grid and records which squares are rosettes and which are shared.
//! The table is built once and never changes, so move logic and any
//! rendering layer read the same geometry.

use rustc_hash::{FxHashMap, FxHashSet};

use super::coord::BoardCoordinate;
use crate::core::{EngineError, PathLayout, Player, PlayerMap};

/// Row of the shared middle lane.
pub const SHARED_ROW: u8 = 1;

/// Static classification of one board square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub coordinate: BoardCoordinate,
    pub is_rosette: bool,
    pub is_shared: bool,
}

/// Immutable path table for both players.
#[derive(Clone, Debug)]
pub struct PathModel {
    paths: PlayerMap<Vec<BoardCoordinate>>,
    squares: FxHashMap<BoardCoordinate, Square>,
    rows: u8,
    cols: u8,
}

impl PathModel {
    /// Build the table for a layout, rejecting layouts that fail validation.
    pub fn new(layout: &PathLayout) -> Result<Self, EngineError> {
        layout.validate()?;
        let model = Self::build(layout);

        for (player, path) in model.paths.iter() {
            let distinct: FxHashSet<_> = path.iter().collect();
            if distinct.len() != path.len() {
                return Err(EngineError::InvalidConfig(format!(
                    "{player}'s path visits a square twice"
                )));
            }
        }

        Ok(model)
    }

    /// The historical 14-square board.
    #[must_use]
    pub fn standard() -> Self {
        Self::build(&PathLayout::default())
    }

    fn build(layout: &PathLayout) -> Self {
        let paths = PlayerMap::new(|player| {
            let row = home_row(player);
            let entry = (0..layout.entry_len)
                .map(|i| BoardCoordinate::new(row, (layout.entry_len - 1 - i) as u8));
            let shared = (0..layout.shared_len).map(|i| BoardCoordinate::new(SHARED_ROW, i as u8));
            let exit = (0..layout.exit_len)
                .map(|i| BoardCoordinate::new(row, (layout.shared_len - 1 - i) as u8));
            entry.chain(shared).chain(exit).collect::<Vec<_>>()
        });

        let mut reach: FxHashMap<BoardCoordinate, u8> = FxHashMap::default();
        for (_, path) in paths.iter() {
            for &coordinate in path {
                *reach.entry(coordinate).or_default() += 1;
            }
        }

        let rosettes: FxHashSet<BoardCoordinate> = paths
            .iter()
            .flat_map(|(_, path)| layout.rosettes.iter().filter_map(|&i| path.get(i).copied()))
            .collect();

        let squares = reach
            .into_iter()
            .map(|(coordinate, count)| {
                let square = Square {
                    coordinate,
                    is_rosette: rosettes.contains(&coordinate),
                    is_shared: count > 1,
                };
                (coordinate, square)
            })
            .collect();

        Self {
            paths,
            squares,
            rows: 3,
            cols: layout.shared_len as u8,
        }
    }

    /// Number of track positions on each player's path.
    ///
    /// Reaching this index means the piece has completed.
    #[must_use]
    pub fn path_length(&self) -> usize {
        self.paths[Player::One].len()
    }

    /// Grid dimensions as (rows, cols).
    #[must_use]
    pub fn dimensions(&self) -> (u8, u8) {
        (self.rows, self.cols)
    }

    /// The ordered squares a player's pieces pass through.
    #[must_use]
    pub fn path(&self, player: Player) -> &[BoardCoordinate] {
        &self.paths[player]
    }

    /// Board coordinate of a player's track index.
    pub fn coordinate_for(
        &self,
        player: Player,
        track_index: usize,
    ) -> Result<BoardCoordinate, EngineError> {
        self.paths[player]
            .get(track_index)
            .copied()
            .ok_or(EngineError::OutOfRange {
                track_index,
                path_length: self.path_length(),
            })
    }

    /// Reverse lookup: where on a player's path a coordinate sits.
    #[must_use]
    pub fn track_index_for(&self, player: Player, coordinate: BoardCoordinate) -> Option<usize> {
        self.paths[player].iter().position(|&c| c == coordinate)
    }

    /// Classification of a square, if it is on the board.
    #[must_use]
    pub fn square(&self, coordinate: BoardCoordinate) -> Option<&Square> {
        self.squares.get(&coordinate)
    }

    /// Whether the coordinate is a playable square.
    #[must_use]
    pub fn contains(&self, coordinate: BoardCoordinate) -> bool {
        self.squares.contains_key(&coordinate)
    }

    /// Rosettes are safe from capture and grant another roll.
    #[must_use]
    pub fn is_rosette(&self, coordinate: BoardCoordinate) -> bool {
        self.squares.get(&coordinate).is_some_and(|s| s.is_rosette)
    }

    /// True iff both players' paths reach the coordinate.
    #[must_use]
    pub fn is_shared(&self, coordinate: BoardCoordinate) -> bool {
        self.squares.get(&coordinate).is_some_and(|s| s.is_shared)
    }

    /// All playable squares, ordered by row then column.
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        let mut squares: Vec<_> = self.squares.values().collect();
        squares.sort_by_key(|s| s.coordinate);
        squares.into_iter()
    }
}

impl Default for PathModel {
    fn default() -> Self {
        Self::standard()
    }
}

const fn home_row(player: Player) -> u8 {
    match player {
        Player::One => 2,
        Player::Two => 0,
    }
}
