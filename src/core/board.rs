//! The 3×3 board and its occupancy.
//!
//! Cells are addressed by a single index 0–8 in row-major order:
//!
//! ```text
//! 0 | 1 | 2
//! --+---+--
//! 3 | 4 | 5
//! --+---+--
//! 6 | 7 | 8
//! ```
//!
//! The board only knows about occupancy. Move legality and the vanishing
//! rule live in `rules::validator`.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Index of a board cell, guaranteed to be in 0..9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CellIndex(u8);

impl CellIndex {
    /// Create a cell index, or `None` if out of range.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < CELL_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Raw index (0–8).
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }

    /// All nine cells in index order.
    pub fn all() -> impl Iterator<Item = CellIndex> {
        (0..CELL_COUNT as u8).map(CellIndex)
    }
}

impl TryFrom<u8> for CellIndex {
    type Error = BoardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CellIndex::new(value as usize).ok_or(BoardError::OutOfRange(value as usize))
    }
}

impl From<CellIndex> for u8 {
    fn from(cell: CellIndex) -> Self {
        cell.0
    }
}

impl std::fmt::Display for CellIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mark on the board: the symbol shown and the seat that owns it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    /// Symbol rendered in the cell (typically an emoji).
    pub symbol: String,
    /// Seat that placed the mark.
    pub owner: PlayerId,
}

impl Mark {
    /// Create a new mark.
    pub fn new(symbol: impl Into<String>, owner: PlayerId) -> Self {
        Self {
            symbol: symbol.into(),
            owner,
        }
    }
}

/// Errors raised by direct board manipulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum BoardError {
    /// Tried to place a mark on an occupied cell.
    #[display("cell {} is already occupied", _0)]
    Occupied(#[error(not(source))] CellIndex),
    /// Index outside 0..9.
    #[display("cell index {} is out of range", _0)]
    OutOfRange(#[error(not(source))] usize),
}

/// The nine cells of the board.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a cell is empty.
    #[must_use]
    pub fn is_empty(&self, cell: CellIndex) -> bool {
        self.cells[cell.get()].is_none()
    }

    /// Get the mark in a cell, if any.
    #[must_use]
    pub fn get(&self, cell: CellIndex) -> Option<&Mark> {
        self.cells[cell.get()].as_ref()
    }

    /// Owner of the mark in a cell, if any.
    #[must_use]
    pub fn owner(&self, cell: CellIndex) -> Option<PlayerId> {
        self.get(cell).map(|m| m.owner)
    }

    /// Place a mark on an empty cell.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Occupied` if the cell already holds a mark.
    pub fn place(&mut self, cell: CellIndex, mark: Mark) -> Result<(), BoardError> {
        let slot = &mut self.cells[cell.get()];
        if slot.is_some() {
            return Err(BoardError::Occupied(cell));
        }
        *slot = Some(mark);
        Ok(())
    }

    /// Clear a cell, returning the mark that was there.
    pub fn remove(&mut self, cell: CellIndex) -> Option<Mark> {
        self.cells[cell.get()].take()
    }

    /// Empty cells in index order.
    pub fn empty_cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        CellIndex::all().filter(move |&c| self.is_empty(c))
    }

    /// Number of live marks owned by a player.
    #[must_use]
    pub fn count_owned(&self, player: PlayerId) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|m| m.owner == player)
            .count()
    }

    /// True when every cell holds a mark.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// All cells in index order.
    #[must_use]
    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(i: usize) -> CellIndex {
        CellIndex::new(i).unwrap()
    }

    #[test]
    fn test_cell_index_bounds() {
        assert_eq!(CellIndex::new(0).map(CellIndex::get), Some(0));
        assert_eq!(CellIndex::new(8).map(CellIndex::get), Some(8));
        assert!(CellIndex::new(9).is_none());
        assert_eq!(CellIndex::all().count(), 9);
    }

    #[test]
    fn test_cell_index_try_from() {
        assert_eq!(CellIndex::try_from(4u8), Ok(cell(4)));
        assert_eq!(CellIndex::try_from(12u8), Err(BoardError::OutOfRange(12)));
    }

    #[test]
    fn test_place_and_remove() {
        let mut board = Board::new();
        assert!(board.is_empty(cell(4)));

        board.place(cell(4), Mark::new("🐶", PlayerId::A)).unwrap();
        assert!(!board.is_empty(cell(4)));
        assert_eq!(board.owner(cell(4)), Some(PlayerId::A));
        assert_eq!(board.count_owned(PlayerId::A), 1);
        assert_eq!(board.count_owned(PlayerId::B), 0);

        let removed = board.remove(cell(4));
        assert_eq!(removed, Some(Mark::new("🐶", PlayerId::A)));
        assert!(board.is_empty(cell(4)));
        assert_eq!(board.remove(cell(4)), None);
    }

    #[test]
    fn test_place_occupied_fails() {
        let mut board = Board::new();
        board.place(cell(0), Mark::new("🐶", PlayerId::A)).unwrap();

        let err = board.place(cell(0), Mark::new("🍕", PlayerId::B)).unwrap_err();
        assert_eq!(err, BoardError::Occupied(cell(0)));
        assert_eq!(err.to_string(), "cell 0 is already occupied");
        // First mark untouched
        assert_eq!(board.owner(cell(0)), Some(PlayerId::A));
    }

    #[test]
    fn test_empty_cells_and_full() {
        let mut board = Board::new();
        assert_eq!(board.empty_cells().count(), 9);

        for i in 0..9 {
            let owner = if i % 2 == 0 { PlayerId::A } else { PlayerId::B };
            board.place(cell(i), Mark::new("x", owner)).unwrap();
        }

        assert!(board.is_full());
        assert_eq!(board.empty_cells().count(), 0);
    }

    #[test]
    fn test_board_serialization() {
        let mut board = Board::new();
        board.place(cell(2), Mark::new("⚽️", PlayerId::B)).unwrap();

        let json = serde_json::to_string(&board).unwrap();
        let deserialized: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, deserialized);
    }

    #[test]
    fn test_cell_index_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<CellIndex>("9").is_err());
        assert_eq!(serde_json::from_str::<CellIndex>("3").unwrap(), cell(3));
    }
}
