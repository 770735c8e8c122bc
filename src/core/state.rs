//! Game state: board, histories, turn and outcome.
//!
//! `GameState` is owned by a `Session` and mutated only through
//! `rules::apply_move`. Readers get it through `Session::state`.
//!
//! ## Invariant
//!
//! For each player, `history(p).len() == board.count_owned(p) <= 3`.
//! `GameState::check_invariants` verifies this and is asserted after every
//! applied move in debug builds.

use serde::{Deserialize, Serialize};

use super::board::{Board, CellIndex};
use super::history::{MoveHistory, MAX_LIVE_MARKS};
use super::player::{PlayerId, PlayerMap};

/// How a finished game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A player won, by completing a line or by the opponent running out of time.
    Winner(PlayerId),
    /// Full board with no line.
    Tie,
}

impl Outcome {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, Outcome::Winner(p) if *p == player)
    }

    /// Winning player, if any.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner(p) => Some(*p),
            Outcome::Tie => None,
        }
    }
}

/// Why the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndReason {
    /// Three in a row.
    Line,
    /// Board filled without a line.
    BoardFull,
    /// The losing player's clock (or the shared clock) reached zero.
    TimeExpired,
}

/// Complete game state.
///
/// Serialize-only: a state is built by play, never loaded, so the
/// history / board agreement cannot be bypassed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GameState {
    board: Board,
    histories: PlayerMap<MoveHistory>,
    active_player: PlayerId,
    pending_symbol: String,
    turn: u32,
    outcome: Option<Outcome>,
    end_reason: Option<EndReason>,
    winning_line: Option<[CellIndex; 3]>,
}

impl GameState {
    /// Create the initial state: empty board, seat A to move.
    #[must_use]
    pub fn new(first_symbol: impl Into<String>) -> Self {
        Self {
            board: Board::new(),
            histories: PlayerMap::with_default(),
            active_player: PlayerId::A,
            pending_symbol: first_symbol.into(),
            turn: 1,
            outcome: None,
            end_reason: None,
            winning_line: None,
        }
    }

    /// The board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// A player's live-mark history, oldest first.
    #[must_use]
    pub fn history(&self, player: PlayerId) -> &MoveHistory {
        &self.histories[player]
    }

    /// Seat whose move is awaited (or who moved last, once terminal).
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    /// Symbol the active player will place.
    #[must_use]
    pub fn pending_symbol(&self) -> &str {
        &self.pending_symbol
    }

    /// 1-based turn number.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Result, once the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Why the game ended, once it has.
    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// The completed line, for a win by three in a row.
    #[must_use]
    pub fn winning_line(&self) -> Option<[CellIndex; 3]> {
        self.winning_line
    }

    /// True once no further moves are accepted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// Verify the history / live-mark agreement for both players.
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (player, history) in self.histories.iter() {
            let live = self.board.count_owned(player);
            if history.len() != live {
                return Err(format!(
                    "{player}: history has {} entries but {live} live marks",
                    history.len()
                ));
            }
            if live > MAX_LIVE_MARKS {
                return Err(format!("{player}: {live} live marks exceeds {MAX_LIVE_MARKS}"));
            }
            for &cell in history.as_slice() {
                if self.board.owner(cell) != Some(player) {
                    return Err(format!("{player}: history cell {cell} not owned"));
                }
            }
        }
        Ok(())
    }

    // === Mutation (rules module only) ===

    pub(crate) fn parts_mut(&mut self) -> (&mut Board, &mut MoveHistory) {
        let player = self.active_player;
        (&mut self.board, &mut self.histories[player])
    }

    pub(crate) fn advance_turn(&mut self, next_symbol: String) {
        self.active_player = self.active_player.other();
        self.pending_symbol = next_symbol;
        self.turn += 1;
    }

    pub(crate) fn finish(&mut self, outcome: Outcome, reason: EndReason, line: Option<[CellIndex; 3]>) {
        self.outcome = Some(outcome);
        self.end_reason = Some(reason);
        self.winning_line = line;
    }
}
