//! Move validation and the vanishing rule.
//!
//! `validate_move` answers "may this player mark this cell now?" without
//! touching the state. `apply_move` validates, then:
//!
//! 1. evicts the mover's oldest mark if they already hold three,
//! 2. places the pending symbol,
//! 3. appends the cell to the mover's history,
//! 4. checks for a completed line or a full board.
//!
//! Evicting before placing means the target cell is always empty at
//! placement time: the only mark that can vanish is the mover's own oldest,
//! and moving onto that cell is rejected up front.

use derive_more::{Display, Error};
use tracing::{debug, instrument};

use crate::core::{
    BoardError, CellIndex, EndReason, GameState, Mark, Move, MoveRecord, Outcome, PlayerId,
};

use super::win::check_winner;

/// Why a move was refused. The state is never modified when this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game has already ended.
    #[display("game is already over")]
    GameOver,

    /// The mover is not the active player.
    #[display("it is not {}'s turn", _0)]
    NotYourTurn(#[error(not(source))] PlayerId),

    /// The computer plays this seat; humans cannot move for it.
    #[display("{} is played by the computer", _0)]
    ComputerSeat(#[error(not(source))] PlayerId),

    /// Target cell already holds a mark.
    #[display("cell {} is already occupied", _0)]
    Occupied(#[error(not(source))] CellIndex),

    /// Target is the mover's oldest mark, which is about to vanish.
    #[display("cell {} holds the oldest mark and cannot be refilled this turn", _0)]
    VacatingCell(#[error(not(source))] CellIndex),

    /// Index outside 0..9.
    #[display("cell index {} is out of range", _0)]
    OutOfRange(#[error(not(source))] usize),

    /// Board rejected the placement.
    #[display("board error: {}", _0)]
    Board(#[error(source)] BoardError),
}

impl From<BoardError> for MoveError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::OutOfRange(index) => MoveError::OutOfRange(index),
            other => MoveError::Board(other),
        }
    }
}

/// Check whether a move is legal in the current state.
///
/// # Errors
///
/// - `GameOver` if the game is terminal
/// - `NotYourTurn` if `mv.player` is not the active player
/// - `VacatingCell` if the mover holds three marks and targets the oldest
/// - `Occupied` if the target cell holds any other mark
pub fn validate_move(state: &GameState, mv: Move) -> Result<(), MoveError> {
    if state.is_terminal() {
        return Err(MoveError::GameOver);
    }

    if mv.player != state.active_player() {
        return Err(MoveError::NotYourTurn(mv.player));
    }

    if state.history(mv.player).pending_eviction() == Some(mv.cell) {
        return Err(MoveError::VacatingCell(mv.cell));
    }

    if !state.board().is_empty(mv.cell) {
        return Err(MoveError::Occupied(mv.cell));
    }

    Ok(())
}

/// Cells the player could legally mark right now, in index order.
///
/// Empty when it is not the player's turn or the game is over.
#[must_use]
pub fn legal_cells(state: &GameState, player: PlayerId) -> Vec<CellIndex> {
    CellIndex::all()
        .filter(|&cell| validate_move(state, Move::new(player, cell)).is_ok())
        .collect()
}

/// Validate and apply a move, including eviction and end-of-game detection.
///
/// On success the mark is on the board and, if the move ended the game, the
/// state is terminal. The turn is not advanced; the session does that so it
/// can roll the next symbol and restart the clock.
///
/// # Errors
///
/// Any `MoveError` from `validate_move`. The state is unchanged on error.
#[instrument(level = "debug", skip(state), fields(player = ?mv.player, cell = %mv.cell))]
pub fn apply_move(state: &mut GameState, mv: Move) -> Result<MoveRecord, MoveError> {
    validate_move(state, mv)?;

    let symbol = state.pending_symbol().to_string();
    let turn = state.turn();

    let (board, history) = state.parts_mut();

    let evicted = if history.is_full() {
        let oldest = history.pop_oldest();
        if let Some(cell) = oldest {
            board.remove(cell);
            debug!(%cell, "Oldest mark vanished");
        }
        oldest
    } else {
        None
    };

    board.place(mv.cell, Mark::new(symbol.clone(), mv.player))?;
    history.push(mv.cell);

    debug_assert!(
        state.check_invariants().is_ok(),
        "invariant violated after move: {:?}",
        state.check_invariants()
    );

    if let Some(win) = check_winner(state.board()) {
        debug!(winner = ?win.winner, line = ?win.line, "Line completed");
        state.finish(Outcome::Winner(win.winner), EndReason::Line, Some(win.line));
    } else if state.board().is_full() {
        debug!("Board full without a line");
        state.finish(Outcome::Tie, EndReason::BoardFull, None);
    }

    Ok(MoveRecord {
        player: mv.player,
        cell: mv.cell,
        symbol,
        evicted,
        bonus: None,
        turn,
    })
}
