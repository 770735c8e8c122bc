//! Game rules: move legality, the vanishing rule, and win detection.
//!
//! Everything here is a pure function of `GameState`. Sequencing (whose
//! turn, symbol rolls, clocks, the computer seat) belongs to `session`.

pub mod validator;
pub mod win;

pub use validator::{apply_move, legal_cells, validate_move, MoveError};
pub use win::{all_winning_lines, check_winner, WinningLine, WINNING_LINES};
