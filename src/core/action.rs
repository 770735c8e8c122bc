//! Move representation.
//!
//! A `Move` is the request ("player P marks cell i"). A `MoveRecord` is
//! what actually happened once the move was applied, including the mark
//! that vanished to make room, if any.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::board::CellIndex;
use super::player::PlayerId;

/// A requested move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The seat making the move.
    pub player: PlayerId,

    /// Target cell.
    pub cell: CellIndex,
}

impl Move {
    /// Create a move.
    #[must_use]
    pub const fn new(player: PlayerId, cell: CellIndex) -> Self {
        Self { player, cell }
    }
}

/// An applied move with its side effects.
///
/// Used for:
/// - Telling the UI which mark vanished
/// - Logging
/// - Test assertions on eviction order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The seat that moved.
    pub player: PlayerId,

    /// Cell that received the new mark.
    pub cell: CellIndex,

    /// Symbol placed.
    pub symbol: String,

    /// Cell cleared by the vanishing rule, if the mover already had three marks.
    pub evicted: Option<CellIndex>,

    /// Time credited by the quick-move bonus.
    pub bonus: Option<Duration>,

    /// 1-based turn number within the game.
    pub turn: u32,
}

impl MoveRecord {
    /// The request this record answers.
    #[must_use]
    pub fn as_move(&self) -> Move {
        Move::new(self.player, self.cell)
    }
}
