//! Win detection over the eight fixed lines.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::core::{Board, CellIndex, PlayerId};

/// The eight winning triples, in detection order: rows, columns, diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// A completed line and its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningLine {
    /// Player owning all three cells.
    pub winner: PlayerId,
    /// The three cells, in line order.
    pub line: [CellIndex; 3],
}

fn line_cells(line: [usize; 3]) -> Option<[CellIndex; 3]> {
    Some([
        CellIndex::new(line[0])?,
        CellIndex::new(line[1])?,
        CellIndex::new(line[2])?,
    ])
}

/// Checks if any line is owned entirely by one player.
///
/// Lines are scanned in `WINNING_LINES` order and the first match is
/// returned. Ownership is compared, not symbols: a player's marks may all
/// show different symbols.
#[instrument(level = "trace", skip(board))]
pub fn check_winner(board: &Board) -> Option<WinningLine> {
    for line in WINNING_LINES {
        let Some(cells) = line_cells(line) else {
            continue;
        };
        let [a, b, c] = cells;
        if let Some(owner) = board.owner(a) {
            if board.owner(b) == Some(owner) && board.owner(c) == Some(owner) {
                return Some(WinningLine {
                    winner: owner,
                    line: cells,
                });
            }
        }
    }

    None
}

/// Every line fully owned by some player, in detection order.
///
/// Positions reached through legal play never hold two lines of different
/// owners; this exists to let tests assert that.
pub fn all_winning_lines(board: &Board) -> Vec<WinningLine> {
    WINNING_LINES
        .into_iter()
        .filter_map(line_cells)
        .filter_map(|cells| {
            let owner = board.owner(cells[0])?;
            cells
                .iter()
                .all(|&c| board.owner(c) == Some(owner))
                .then_some(WinningLine {
                    winner: owner,
                    line: cells,
                })
        })
        .collect()
}
