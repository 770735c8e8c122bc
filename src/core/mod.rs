//! Core engine types: players, board, histories, state, moves, RNG, configuration.
//!
//! These are plain data types. Legality and turn sequencing live in
//! `rules` and `session`.

pub mod player;
pub mod board;
pub mod history;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use board::{Board, BoardError, CellIndex, Mark, CELL_COUNT};
pub use history::{HistoryError, MoveHistory, MAX_LIVE_MARKS};
pub use rng::GameRng;
pub use config::{
    ConfigError, PlayerConfig, SessionConfig, SymbolCategory, SymbolSet, TimerConfig,
    COMPUTER_NAME, MAX_GAME_MINUTES, MIN_GAME_MINUTES,
};
pub use action::{Move, MoveRecord};
pub use state::{EndReason, GameState, Outcome};
