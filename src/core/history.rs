//! Per-player move history for the vanishing rule.
//!
//! Each player's history holds the cells of their live marks, oldest first.
//! Its length always equals the number of marks that player has on the
//! board, and never exceeds `MAX_LIVE_MARKS`.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::board::CellIndex;

/// Maximum number of marks a player may hold on the board at once.
pub const MAX_LIVE_MARKS: usize = 3;

/// A history that breaks the live-mark rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum HistoryError {
    /// More entries than `MAX_LIVE_MARKS`.
    #[display("history holds {} marks, at most {} allowed", _0, MAX_LIVE_MARKS)]
    TooManyMarks(#[error(not(source))] usize),

    /// The same cell listed twice.
    #[display("cell {} appears twice in history", _0)]
    DuplicateCell(#[error(not(source))] CellIndex),
}

/// Ordered cells of a player's live marks, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CellIndex>", into = "Vec<CellIndex>")]
pub struct MoveHistory {
    cells: SmallVec<[CellIndex; MAX_LIVE_MARKS]>,
}

impl MoveHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live marks tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True if the player has no marks on the board.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if the next placement will evict the oldest mark.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.len() >= MAX_LIVE_MARKS
    }

    /// Cell of the oldest live mark.
    #[must_use]
    pub fn oldest(&self) -> Option<CellIndex> {
        self.cells.first().copied()
    }

    /// The cell that the next placement would vacate, if any.
    ///
    /// `Some` only when the history is full.
    #[must_use]
    pub fn pending_eviction(&self) -> Option<CellIndex> {
        if self.is_full() {
            self.oldest()
        } else {
            None
        }
    }

    /// Remove and return the oldest entry.
    pub fn pop_oldest(&mut self) -> Option<CellIndex> {
        if self.cells.is_empty() {
            None
        } else {
            Some(self.cells.remove(0))
        }
    }

    /// Append the newest entry.
    ///
    /// Callers must evict first when the history is full.
    pub fn push(&mut self, cell: CellIndex) {
        debug_assert!(!self.is_full(), "move history overflow");
        self.cells.push(cell);
    }

    /// True if the cell is one of the tracked live marks.
    #[must_use]
    pub fn contains(&self, cell: CellIndex) -> bool {
        self.cells.contains(&cell)
    }

    /// Tracked cells, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[CellIndex] {
        &self.cells
    }
}

impl TryFrom<Vec<CellIndex>> for MoveHistory {
    type Error = HistoryError;

    fn try_from(cells: Vec<CellIndex>) -> Result<Self, Self::Error> {
        if cells.len() > MAX_LIVE_MARKS {
            return Err(HistoryError::TooManyMarks(cells.len()));
        }
        for (i, cell) in cells.iter().enumerate() {
            if cells[..i].contains(cell) {
                return Err(HistoryError::DuplicateCell(*cell));
            }
        }
        Ok(Self {
            cells: SmallVec::from_vec(cells),
        })
    }
}

impl From<MoveHistory> for Vec<CellIndex> {
    fn from(history: MoveHistory) -> Self {
        history.cells.into_vec()
    }
}
