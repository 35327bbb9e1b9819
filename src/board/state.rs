//! Piece placement and per-player counts.
//!
//! `BoardState` is the only mutable record of where pieces are. It keeps
//! two views in step: each piece's location, and an occupancy index from
//! board coordinate to occupant. Legality is not checked here beyond what
//! is needed to keep those views consistent; `MoveResolver` decides which
//! moves are allowed.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::coord::BoardCoordinate;
use super::path::PathModel;
use super::piece::{PieceId, PieceLocation, PieceRef};
use crate::core::{EngineError, Player, PlayerMap};

/// The piece sitting on a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occupant {
    pub player: Player,
    pub piece: PieceId,
    pub track_index: usize,
}

/// One entry of the board occupancy list, as exposed to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OccupiedSquare {
    pub player: Player,
    pub piece: PieceId,
    pub track_index: usize,
    pub coordinate: BoardCoordinate,
}

/// What `apply_move` did to the moved piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub piece: PieceId,
    pub from: Option<usize>,
    /// `None` when the piece completed.
    pub coordinate: Option<BoardCoordinate>,
}

/// Board occupancy plus hand and completed counts for both players.
#[derive(Clone, Debug)]
pub struct BoardState {
    path: Arc<PathModel>,
    pieces: PlayerMap<Vec<PieceLocation>>,
    occupancy: FxHashMap<BoardCoordinate, Occupant>,
}

impl BoardState {
    /// A board with every piece in hand.
    #[must_use]
    pub fn new(path: Arc<PathModel>, pieces_per_player: u8) -> Self {
        Self {
            path,
            pieces: PlayerMap::new(|_| vec![PieceLocation::InHand; pieces_per_player as usize]),
            occupancy: FxHashMap::default(),
        }
    }

    /// Rebuild a board from saved piece locations.
    ///
    /// Fails if a location is off the path, two pieces share a square, the
    /// players have different piece counts, or there are more pieces than
    /// `PieceId` can number.
    pub fn from_locations(
        path: Arc<PathModel>,
        pieces: PlayerMap<Vec<PieceLocation>>,
    ) -> Result<Self, EngineError> {
        if pieces[Player::One].len() != pieces[Player::Two].len() {
            return Err(EngineError::CorruptState(
                "players have different numbers of pieces".to_string(),
            ));
        }
        if pieces[Player::One].len() > usize::from(u8::MAX) {
            return Err(EngineError::CorruptState(format!(
                "{} pieces per player exceeds {}",
                pieces[Player::One].len(),
                u8::MAX
            )));
        }

        let mut occupancy = FxHashMap::default();
        for (player, locations) in pieces.iter() {
            for (slot, location) in locations.iter().enumerate() {
                if let PieceLocation::OnTrack(track_index) = *location {
                    let coordinate = path.coordinate_for(player, track_index)?;
                    let occupant = Occupant {
                        player,
                        piece: PieceId::from_slot(slot),
                        track_index,
                    };
                    if occupancy.insert(coordinate, occupant).is_some() {
                        return Err(EngineError::CorruptState(format!(
                            "two pieces on {coordinate}"
                        )));
                    }
                }
            }
        }

        let board = Self {
            path,
            pieces,
            occupancy,
        };
        board.check_invariants()?;
        Ok(board)
    }

    /// Every piece's location for one player, indexed by piece number - 1.
    #[must_use]
    pub fn locations(&self, player: Player) -> &[PieceLocation] {
        &self.pieces[player]
    }

    /// The path table this board is laid out on.
    #[must_use]
    pub fn path(&self) -> &PathModel {
        &self.path
    }

    /// Pieces each player started with.
    #[must_use]
    pub fn pieces_per_player(&self) -> usize {
        self.pieces[Player::One].len()
    }

    // === Queries ===

    /// Who, if anyone, occupies a coordinate.
    #[must_use]
    pub fn piece_at(&self, coordinate: BoardCoordinate) -> Option<Occupant> {
        self.occupancy.get(&coordinate).copied()
    }

    /// Where a specific piece is.
    #[must_use]
    pub fn location(&self, player: Player, piece: PieceId) -> Option<PieceLocation> {
        if piece.0 == 0 {
            return None;
        }
        self.pieces[player].get(piece.slot()).copied()
    }

    /// Pieces not yet entered.
    #[must_use]
    pub fn hand_count(&self, player: Player) -> usize {
        self.count(player, |l| matches!(l, PieceLocation::InHand))
    }

    /// Pieces that have finished the path.
    #[must_use]
    pub fn completed_count(&self, player: Player) -> usize {
        self.count(player, |l| matches!(l, PieceLocation::Completed))
    }

    /// Pieces currently on the board.
    #[must_use]
    pub fn active_count(&self, player: Player) -> usize {
        self.count(player, |l| matches!(l, PieceLocation::OnTrack(_)))
    }

    fn count(&self, player: Player, pred: impl Fn(&PieceLocation) -> bool) -> usize {
        self.pieces[player].iter().filter(|l| pred(l)).count()
    }

    /// A player's pieces on the board as (piece, track index), furthest back first.
    #[must_use]
    pub fn active_pieces(&self, player: Player) -> Vec<(PieceId, usize)> {
        let mut active: Vec<_> = self.pieces[player]
            .iter()
            .enumerate()
            .filter_map(|(slot, location)| match location {
                PieceLocation::OnTrack(i) => Some((PieceId::from_slot(slot), *i)),
                _ => None,
            })
            .collect();
        active.sort_by_key(|&(_, track_index)| track_index);
        active
    }

    /// The piece that would enter next from hand.
    #[must_use]
    pub fn next_in_hand(&self, player: Player) -> Option<PieceId> {
        self.pieces[player]
            .iter()
            .position(|l| matches!(l, PieceLocation::InHand))
            .map(PieceId::from_slot)
    }

    /// Every occupied square, Player 1 first, each player's pieces by number.
    #[must_use]
    pub fn occupied_squares(&self) -> Vec<OccupiedSquare> {
        let mut squares: Vec<_> = self
            .occupancy
            .iter()
            .map(|(&coordinate, o)| OccupiedSquare {
                player: o.player,
                piece: o.piece,
                track_index: o.track_index,
                coordinate,
            })
            .collect();
        squares.sort_by_key(|s| (s.player, s.piece));
        squares
    }

    // === Mutation ===

    /// Relocate a piece to `new_track_index`.
    ///
    /// Entering from hand takes the lowest-numbered piece in hand. A target of
    /// exactly `path_length` completes the piece and takes it off the board.
    /// The target square must already be empty: captures go through
    /// [`BoardState::capture`] first. On error nothing changes.
    pub fn apply_move(
        &mut self,
        player: Player,
        piece_ref: PieceRef,
        new_track_index: usize,
    ) -> Result<Placement, EngineError> {
        let path_length = self.path.path_length();
        if new_track_index > path_length {
            return Err(EngineError::OutOfRange {
                track_index: new_track_index,
                path_length,
            });
        }

        let (piece, from) = match piece_ref {
            PieceRef::Hand => {
                let piece = self
                    .next_in_hand(player)
                    .ok_or_else(|| EngineError::illegal(player, "no pieces left in hand"))?;
                (piece, None)
            }
            PieceRef::Board(piece) => match self.location(player, piece) {
                Some(PieceLocation::OnTrack(i)) => (piece, Some(i)),
                _ => {
                    return Err(EngineError::illegal(player, format!("{piece} is not on the board")))
                }
            },
        };

        let target = if new_track_index == path_length {
            None
        } else {
            let coordinate = self.path.coordinate_for(player, new_track_index)?;
            if let Some(occupant) = self.piece_at(coordinate) {
                if occupant.player != player || occupant.piece != piece {
                    return Err(EngineError::illegal(
                        player,
                        format!("{coordinate} is occupied by {} {}", occupant.player, occupant.piece),
                    ));
                }
            }
            Some(coordinate)
        };

        if let Some(from) = from {
            let old = self.path.coordinate_for(player, from)?;
            self.occupancy.remove(&old);
        }

        match target {
            Some(coordinate) => {
                self.occupancy.insert(
                    coordinate,
                    Occupant {
                        player,
                        piece,
                        track_index: new_track_index,
                    },
                );
                self.pieces[player][piece.slot()] = PieceLocation::OnTrack(new_track_index);
            }
            None => {
                self.pieces[player][piece.slot()] = PieceLocation::Completed;
            }
        }

        Ok(Placement {
            piece,
            from,
            coordinate: target,
        })
    }

    /// Send the opposing piece on `coordinate` back to its owner's hand.
    ///
    /// Returns the captured occupant, or `None` if the square was empty.
    /// `capturer` may not capture its own piece; the board is left as is.
    pub fn capture(
        &mut self,
        capturer: Player,
        coordinate: BoardCoordinate,
    ) -> Result<Option<Occupant>, EngineError> {
        let Some(occupant) = self.piece_at(coordinate) else {
            return Ok(None);
        };
        if occupant.player == capturer {
            return Err(EngineError::illegal(
                capturer,
                format!("cannot capture own {} on {coordinate}", occupant.piece),
            ));
        }

        self.occupancy.remove(&coordinate);
        self.pieces[occupant.player][occupant.piece.slot()] = PieceLocation::InHand;
        Ok(Some(occupant))
    }

    // === Invariants ===

    /// Verify piece accounting and mutual exclusion.
    ///
    /// Checks that every piece is in exactly one of hand/board/completed,
    /// that the occupancy index matches piece locations one-to-one, and
    /// that no coordinate holds two pieces.
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        let per_player = self.pieces_per_player();
        let mut seen = 0usize;

        for (player, locations) in self.pieces.iter() {
            let total = self.hand_count(player) + self.active_count(player) + self.completed_count(player);
            if total != per_player || locations.len() != per_player {
                return Err(EngineError::CorruptState(format!(
                    "{player} accounts for {total} of {per_player} pieces"
                )));
            }

            for (slot, location) in locations.iter().enumerate() {
                if let PieceLocation::OnTrack(track_index) = *location {
                    let coordinate = self.path.coordinate_for(player, track_index)?;
                    let expected = Occupant {
                        player,
                        piece: PieceId::from_slot(slot),
                        track_index,
                    };
                    if self.occupancy.get(&coordinate) != Some(&expected) {
                        return Err(EngineError::CorruptState(format!(
                            "{player} {} is not indexed at {coordinate}",
                            expected.piece
                        )));
                    }
                    seen += 1;
                }
            }
        }

        if seen != self.occupancy.len() {
            return Err(EngineError::CorruptState(format!(
                "{} occupied squares but {seen} pieces on the board",
                self.occupancy.len()
            )));
        }

        Ok(())
    }
}
