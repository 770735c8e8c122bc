//! # vanishing-ttt
//!
//! Engine for vanishing tic-tac-toe: each player keeps at most three marks
//! on the board, and placing a fourth makes their oldest mark vanish.
//!
//! ## Design Principles
//!
//! 1. **Host-Driven**: The engine never reads the wall clock or spawns
//!    timers. Hosts feed it moves and `tick(elapsed)` calls on one queue.
//!
//! 2. **Deterministic**: All randomness (symbol rolls, computer moves) comes
//!    from a seeded `GameRng`, split into independent streams.
//!
//! 3. **Rejected Means Untouched**: An illegal move returns `MoveError` and
//!    leaves the state exactly as it was.
//!
//! ## Architecture
//!
//! - **Generations**: Resets and game ends bump a counter; scheduled
//!   computer moves from an older generation are ignored.
//!
//! - **Eviction Before Placement**: The mover's oldest mark is removed
//!   before the new one lands, so a win is checked on the board the
//!   players actually see.
//!
//! ## Modules
//!
//! - `core`: Players, board, move history, configuration, RNG, state
//! - `rules`: Move validation, the vanishing rule, win detection
//! - `timer`: Shared or per-player clocks with the quick-move bonus
//! - `opponent`: Computer seat policy
//! - `session`: Turn scheduler tying it all together

pub mod core;
pub mod rules;
pub mod timer;
pub mod opponent;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap,
    Board, BoardError, CellIndex, Mark, CELL_COUNT,
    HistoryError, MoveHistory, MAX_LIVE_MARKS,
    GameRng,
    ConfigError, PlayerConfig, SessionConfig, SymbolCategory, SymbolSet, TimerConfig,
    Move, MoveRecord,
    EndReason, GameState, Outcome,
};

pub use crate::rules::{apply_move, check_winner, legal_cells, validate_move, MoveError, WinningLine};

pub use crate::timer::{Clocks, GameTimer, QUICK_MOVE_BONUS, QUICK_MOVE_WINDOW};

pub use crate::opponent::{Opponent, RandomOpponent};

pub use crate::session::{
    ScheduledMove, Session, SessionEvent, SessionView, COMPUTER_MOVE_DELAY,
};
