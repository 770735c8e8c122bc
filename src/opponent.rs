//! Computer opponent policy.
//!
//! The computer picks uniformly among empty cells, skipping the cell of its
//! own oldest mark when it already holds three (the same restriction a
//! human faces). No lookahead.

use tracing::trace;

use crate::core::{Board, CellIndex, GameRng, MoveHistory};

/// Policy for choosing the computer seat's move.
pub trait Opponent: Send + Sync {
    /// Choose a target cell.
    ///
    /// Returns `None` to pass when no candidate cell exists.
    fn choose_cell(
        &self,
        board: &Board,
        own_history: &MoveHistory,
        rng: &mut GameRng,
    ) -> Option<CellIndex>;
}

/// Uniform random opponent.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomOpponent;

impl RandomOpponent {
    /// Cells the computer may choose from, in index order.
    #[must_use]
    pub fn candidates(board: &Board, own_history: &MoveHistory) -> Vec<CellIndex> {
        let vacating = own_history.pending_eviction();
        board
            .empty_cells()
            .filter(|&cell| Some(cell) != vacating)
            .collect()
    }
}

impl Opponent for RandomOpponent {
    fn choose_cell(
        &self,
        board: &Board,
        own_history: &MoveHistory,
        rng: &mut GameRng,
    ) -> Option<CellIndex> {
        let candidates = Self::candidates(board, own_history);
        let choice = rng.choose(&candidates).copied();
        trace!(candidates = candidates.len(), ?choice, "Computer chose");
        choice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Mark, PlayerId};

    fn cell(i: usize) -> CellIndex {
        CellIndex::new(i).unwrap()
    }

    #[test]
    fn test_chooses_only_empty_cells() {
        let mut board = Board::new();
        for i in [0, 2, 4, 6] {
            board.place(cell(i), Mark::new("x", PlayerId::A)).unwrap();
        }
        let history = MoveHistory::new();
        let mut rng = GameRng::new(3);

        for _ in 0..200 {
            let chosen = RandomOpponent.choose_cell(&board, &history, &mut rng).unwrap();
            assert!(board.is_empty(chosen));
        }
    }

    #[test]
    fn test_candidates_skip_nothing_below_three_marks() {
        let board = Board::new();
        let history = MoveHistory::new();

        assert_eq!(RandomOpponent::candidates(&board, &history).len(), 9);
    }

    #[test]
    fn test_passes_on_full_board() {
        let mut board = Board::new();
        for i in 0..9 {
            board.place(cell(i), Mark::new("x", PlayerId::A)).unwrap();
        }
        let mut rng = GameRng::new(3);

        assert_eq!(RandomOpponent.choose_cell(&board, &MoveHistory::new(), &mut rng), None);
    }

    #[test]
    fn test_distribution_is_uniform() {
        let board = Board::new();
        let history = MoveHistory::new();
        let mut rng = GameRng::new(11);
        let mut counts = [0usize; 9];

        for _ in 0..9000 {
            let chosen = RandomOpponent.choose_cell(&board, &history, &mut rng).unwrap();
            counts[chosen.get()] += 1;
        }

        for (i, count) in counts.iter().enumerate() {
            assert!((800..1200).contains(count), "cell {i} chosen {count} times");
        }
    }
}
