//! Turn scheduler: one live game from start to reset.
//!
//! A `Session` owns the configuration, the `GameState`, the game clock and
//! the random streams. Hosts drive it with three calls, serialized on one
//! event queue:
//!
//! - `submit_move` / `submit_move_as` for human input
//! - `tick` with the real time that passed
//! - `fire_scheduled` to run a computer move early (optional; `tick` fires
//!   it once due)
//!
//! Each call returns the `SessionEvent`s it produced. `view` gives the
//! read-only projection the UI renders.
//!
//! ## Generations
//!
//! The generation counter is bumped on every reset and every terminal
//! transition. A `ScheduledMove` carries the generation it was created in;
//! a handle from an older generation, or one already fired, is ignored.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::core::{
    Board, CellIndex, ConfigError, EndReason, GameRng, GameState, Move, MoveRecord, Outcome,
    PlayerId, PlayerMap, SessionConfig, SymbolSet,
};
use crate::opponent::{Opponent, RandomOpponent};
use crate::rules::{apply_move, MoveError};
use crate::timer::{Clocks, GameTimer};

/// Logical time between the computer's turn starting and its move landing.
pub const COMPUTER_MOVE_DELAY: Duration = Duration::from_millis(800);

/// Handle for a pending computer move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledMove {
    /// Session generation the move belongs to.
    pub generation: u64,
    /// Session clock reading at which `tick` fires it.
    pub due_at: Duration,
}

/// Something that happened inside the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A move was applied.
    MovePlayed(MoveRecord),
    /// A new turn began with a freshly rolled symbol.
    TurnStarted {
        /// Seat to move.
        player: PlayerId,
        /// Symbol that seat will place.
        symbol: String,
    },
    /// The computer's move was scheduled.
    ComputerScheduled(ScheduledMove),
    /// The computer found no cell to play.
    ComputerPassed,
    /// The game ended.
    GameOver {
        /// Result.
        outcome: Outcome,
        /// How it was reached.
        reason: EndReason,
    },
}

/// Read-only projection of a session for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Session generation; changes on reset and game end.
    pub generation: u64,
    /// Current marks.
    pub board: Board,
    /// Seat to move (or the last mover, once over).
    pub active_player: PlayerId,
    /// Display name of the active seat.
    pub active_name: String,
    /// Symbol the active seat will place.
    pub pending_symbol: String,
    /// Live marks per seat.
    pub history_lengths: PlayerMap<usize>,
    /// Remaining time, `None` when untimed.
    pub remaining: Option<Clocks>,
    /// Quick-move countdown, `None` when the bonus is off or untimed.
    pub quick_move_remaining: Option<Duration>,
    /// Result, once over.
    pub outcome: Option<Outcome>,
    /// How the game ended.
    pub end_reason: Option<EndReason>,
    /// Completed line for a win by three in a row.
    pub winning_line: Option<[CellIndex; 3]>,
    /// A computer move is scheduled and has not landed yet.
    pub computer_thinking: bool,
}

/// One live game.
#[derive(Debug)]
pub struct Session<O: Opponent = RandomOpponent> {
    config: SessionConfig,
    state: GameState,
    timer: GameTimer,
    symbol_rng: GameRng,
    computer_rng: GameRng,
    opponent: O,
    generation: u64,
    clock: Duration,
    pending_computer: Option<ScheduledMove>,
    moves: Vec<MoveRecord>,
}

impl Session<RandomOpponent> {
    /// Validate the configuration and start a game with the random opponent.
    ///
    /// # Errors
    ///
    /// Any `ConfigError` from `SessionConfig::validate`.
    pub fn start(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::start_with_opponent(config, seed, RandomOpponent)
    }
}

impl<O: Opponent> Session<O> {
    /// Validate the configuration and start a game with a custom opponent.
    ///
    /// # Errors
    ///
    /// Any `ConfigError` from `SessionConfig::validate`.
    #[instrument(skip(config, opponent))]
    pub fn start_with_opponent(
        config: SessionConfig,
        seed: u64,
        opponent: O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = GameRng::new(seed);
        let mut session = Self {
            state: GameState::new(String::new()),
            timer: GameTimer::new(config.timer.as_ref()),
            symbol_rng: rng.for_context("symbols"),
            computer_rng: rng.for_context("computer"),
            config,
            opponent,
            generation: 0,
            clock: Duration::ZERO,
            pending_computer: None,
            moves: Vec::new(),
        };
        session.new_game();

        info!(
            player_a = %session.config.display_name(PlayerId::A),
            player_b = %session.config.display_name(PlayerId::B),
            vs_computer = session.config.vs_computer,
            timed = session.timer.is_timed(),
            "Session started"
        );
        Ok(session)
    }

    /// Start a fresh game from the same configuration.
    ///
    /// Any pending computer move is invalidated. Random streams continue, so
    /// the new game rolls different symbols than the last one.
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn reset(&mut self) -> Vec<SessionEvent> {
        self.generation += 1;
        info!(generation = self.generation, "Session reset");
        self.new_game()
    }

    /// Submit a move for the active seat.
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `cell` is not in 0..9
    /// - `GameOver` once the game has ended
    /// - `ComputerSeat` if the computer is to move
    /// - any rule violation from `rules::validate_move`
    pub fn submit_move(&mut self, cell: usize) -> Result<Vec<SessionEvent>, MoveError> {
        let player = self.state.active_player();
        self.submit_move_as(player, cell)
    }

    /// Submit a move on behalf of a specific seat.
    ///
    /// # Errors
    ///
    /// As `submit_move`, plus `NotYourTurn` when `player` is not active.
    #[instrument(skip(self), fields(turn = self.state.turn()))]
    pub fn submit_move_as(
        &mut self,
        player: PlayerId,
        cell: usize,
    ) -> Result<Vec<SessionEvent>, MoveError> {
        let result = self.check_human_move(player, cell).and_then(|cell| self.play(player, cell));
        if let Err(err) = &result {
            warn!(%player, cell, %err, "Move rejected");
        }
        result
    }

    /// Advance the logical clock.
    ///
    /// Time is charged to whoever is active when it passes. If a computer
    /// move comes due inside `elapsed`, the computer's clock is drained up to
    /// `due_at`, the move is played, and the rest of the tick goes to the
    /// seat whose turn then begins. A clock running out ends the game with
    /// that seat losing, before any later move in the same tick. Ticks after
    /// the game ended do nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        let mut left = elapsed;

        while !self.state.is_terminal() {
            let due = self
                .pending_computer
                .filter(|handle| handle.due_at <= self.clock + left);
            let step = match due {
                Some(handle) => handle.due_at.saturating_sub(self.clock),
                None => left,
            };

            self.clock += step;
            left -= step;

            let active = self.state.active_player();
            if let Some(loser) = self.timer.tick(active, step) {
                self.state.finish(Outcome::Winner(loser.other()), EndReason::TimeExpired, None);
                self.on_terminal(&mut events);
                break;
            }

            match due {
                Some(handle) => events.extend(self.fire_scheduled(handle)),
                None => break,
            }
        }
        events
    }

    /// Play a scheduled computer move now.
    ///
    /// Stale handles (older generation, or already fired) are ignored and
    /// produce no events.
    #[instrument(skip(self))]
    pub fn fire_scheduled(&mut self, handle: ScheduledMove) -> Vec<SessionEvent> {
        if self.pending_computer != Some(handle) {
            warn!(current = self.generation, "Ignoring stale computer move");
            return Vec::new();
        }
        self.pending_computer = None;

        let player = self.state.active_player();
        let choice = self.opponent.choose_cell(
            self.state.board(),
            self.state.history(player),
            &mut self.computer_rng,
        );

        match choice {
            Some(cell) => self.play(player, cell).unwrap_or_else(|err| {
                warn!(%err, %cell, "Computer move rejected");
                Vec::new()
            }),
            None => {
                warn!(%player, "Computer passed");
                vec![SessionEvent::ComputerPassed]
            }
        }
    }

    /// The pending computer move, if one is scheduled.
    #[must_use]
    pub fn pending_computer_move(&self) -> Option<ScheduledMove> {
        self.pending_computer
    }

    /// Build the display projection.
    #[must_use]
    pub fn view(&self) -> SessionView {
        let active = self.state.active_player();
        SessionView {
            generation: self.generation,
            board: self.state.board().clone(),
            active_player: active,
            active_name: self.config.display_name(active).to_string(),
            pending_symbol: self.state.pending_symbol().to_string(),
            history_lengths: PlayerMap::new(|p| self.state.history(p).len()),
            remaining: self.timer.clocks().cloned(),
            quick_move_remaining: self.timer.quick_move_remaining(),
            outcome: self.state.outcome(),
            end_reason: self.state.end_reason(),
            winning_line: self.state.winning_line(),
            computer_thinking: self.pending_computer.is_some(),
        }
    }

    /// Configuration the session was started with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current game state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Game clock.
    #[must_use]
    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Logical time since the current game started.
    #[must_use]
    pub fn clock(&self) -> Duration {
        self.clock
    }

    /// Moves applied in the current game, oldest first.
    #[must_use]
    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    // === Internals ===

    fn new_game(&mut self) -> Vec<SessionEvent> {
        let first = PlayerId::A;
        let symbol = roll_symbol(&mut self.symbol_rng, &self.config.player(first).symbols);

        self.state = GameState::new(symbol.clone());
        self.timer = GameTimer::new(self.config.timer.as_ref());
        self.timer.start_turn();
        self.clock = Duration::ZERO;
        self.pending_computer = None;
        self.moves.clear();

        let mut events = vec![SessionEvent::TurnStarted {
            player: first,
            symbol,
        }];
        self.schedule_if_computer(&mut events);
        events
    }

    fn check_human_move(&self, player: PlayerId, cell: usize) -> Result<CellIndex, MoveError> {
        let cell = CellIndex::new(cell).ok_or(MoveError::OutOfRange(cell))?;
        if self.state.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if self.config.is_computer(player) {
            return Err(MoveError::ComputerSeat(player));
        }
        Ok(cell)
    }

    fn play(&mut self, player: PlayerId, cell: CellIndex) -> Result<Vec<SessionEvent>, MoveError> {
        let mut record = apply_move(&mut self.state, Move::new(player, cell))?;
        record.bonus = self.timer.credit_move(player);
        debug!(
            %player,
            %cell,
            symbol = %record.symbol,
            evicted = ?record.evicted,
            bonus = ?record.bonus,
            "Move played"
        );

        self.moves.push(record.clone());
        let mut events = vec![SessionEvent::MovePlayed(record)];

        if self.state.is_terminal() {
            self.on_terminal(&mut events);
        } else {
            self.begin_turn(&mut events);
        }
        Ok(events)
    }

    fn begin_turn(&mut self, events: &mut Vec<SessionEvent>) {
        let next = self.state.active_player().other();
        let symbol = roll_symbol(&mut self.symbol_rng, &self.config.player(next).symbols);

        self.state.advance_turn(symbol.clone());
        self.timer.start_turn();
        events.push(SessionEvent::TurnStarted {
            player: next,
            symbol,
        });
        self.schedule_if_computer(events);
    }

    fn schedule_if_computer(&mut self, events: &mut Vec<SessionEvent>) {
        if !self.config.is_computer(self.state.active_player()) {
            return;
        }
        let handle = ScheduledMove {
            generation: self.generation,
            due_at: self.clock + COMPUTER_MOVE_DELAY,
        };
        debug!(?handle, "Computer move scheduled");
        self.pending_computer = Some(handle);
        events.push(SessionEvent::ComputerScheduled(handle));
    }

    fn on_terminal(&mut self, events: &mut Vec<SessionEvent>) {
        self.timer.stop();
        self.generation += 1;
        self.pending_computer = None;

        if let (Some(outcome), Some(reason)) = (self.state.outcome(), self.state.end_reason()) {
            info!(?outcome, ?reason, turn = self.state.turn(), "Game over");
            events.push(SessionEvent::GameOver { outcome, reason });
        }
    }
}

/// Roll the symbol a seat will place this turn.
fn roll_symbol(rng: &mut GameRng, symbols: &SymbolSet) -> String {
    if symbols.is_empty() {
        return String::new();
    }
    let index = rng.gen_range_usize(0..symbols.len());
    symbols.get(index).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerConfig, SymbolCategory, TimerConfig};

    fn vs_computer() -> SessionConfig {
        SessionConfig::new().vs_computer()
    }

    #[test]
    fn test_start_rolls_from_seat_a_set() {
        let session = Session::start(SessionConfig::new(), 1).unwrap();
        let view = session.view();

        assert_eq!(view.active_player, PlayerId::A);
        assert_eq!(view.active_name, "Player 1");
        assert!(SymbolCategory::Animals.symbols().contains(&view.pending_symbol.as_str()));
        assert_eq!(view.generation, 0);
        assert!(!view.computer_thinking);
    }

    #[test]
    fn test_start_rejects_duplicate_sets() {
        let config = SessionConfig::new()
            .with_player_b(PlayerConfig::new("Bo", SymbolCategory::Animals));

        let err = Session::start(config, 1).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateSymbolSets));
    }

    #[test]
    fn test_next_symbol_rolled_from_next_seat() {
        let mut session = Session::start(SessionConfig::new(), 5).unwrap();
        let events = session.submit_move(4).unwrap();

        let SessionEvent::TurnStarted { player, symbol } = &events[1] else {
            panic!("expected TurnStarted, got {events:?}");
        };
        assert_eq!(*player, PlayerId::B);
        assert!(SymbolCategory::Food.symbols().contains(&symbol.as_str()));
        assert_eq!(session.state().pending_symbol(), symbol.as_str());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut session = Session::start(SessionConfig::new(), 1).unwrap();

        assert_eq!(session.submit_move(9), Err(MoveError::OutOfRange(9)));
        assert_eq!(session.state().turn(), 1);
    }

    #[test]
    fn test_human_cannot_move_for_computer() {
        let mut session = Session::start(vs_computer(), 1).unwrap();
        session.submit_move(0).unwrap();

        assert_eq!(session.submit_move(1), Err(MoveError::ComputerSeat(PlayerId::B)));
        assert!(session.pending_computer_move().is_some());
    }

    #[test]
    fn test_computer_move_fires_after_delay() {
        let mut session = Session::start(vs_computer(), 9).unwrap();
        let events = session.submit_move(4).unwrap();
        assert!(matches!(events.last(), Some(SessionEvent::ComputerScheduled(_))));
        assert!(session.view().computer_thinking);
        assert_eq!(session.view().active_name, "Computer");

        assert!(session.tick(Duration::from_millis(799)).is_empty());

        let events = session.tick(Duration::from_millis(1));
        let SessionEvent::MovePlayed(record) = &events[0] else {
            panic!("expected MovePlayed, got {events:?}");
        };
        assert_eq!(record.player, PlayerId::B);
        assert_ne!(record.cell.get(), 4);
        assert_eq!(session.state().active_player(), PlayerId::A);
        assert!(session.pending_computer_move().is_none());
    }

    #[test]
    fn test_fire_scheduled_early() {
        let mut session = Session::start(vs_computer(), 9).unwrap();
        session.submit_move(4).unwrap();
        let handle = session.pending_computer_move().unwrap();

        let events = session.fire_scheduled(handle);
        assert!(matches!(events[0], SessionEvent::MovePlayed(_)));

        // Same handle again is stale.
        assert!(session.fire_scheduled(handle).is_empty());
        assert_eq!(session.state().turn(), 3);
    }

    #[test]
    fn test_reset_invalidates_scheduled_move() {
        let mut session = Session::start(vs_computer(), 9).unwrap();
        session.submit_move(4).unwrap();
        let handle = session.pending_computer_move().unwrap();

        session.reset();

        assert!(session.fire_scheduled(handle).is_empty());
        assert!(session.state().board().empty_cells().count() == 9);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_terminal_bumps_generation_and_stops_timer() {
        let config = SessionConfig::new().with_timer(TimerConfig::minutes(1));
        let mut session = Session::start(config, 2).unwrap();
        for cell in [0, 3, 1, 4] {
            session.submit_move(cell).unwrap();
        }

        let events = session.submit_move(2).unwrap();

        assert!(matches!(
            events.last(),
            Some(SessionEvent::GameOver {
                outcome: Outcome::Winner(PlayerId::A),
                reason: EndReason::Line,
            })
        ));
        assert_eq!(session.generation(), 1);
        assert!(!session.timer().is_running());
        assert!(session.tick(Duration::from_secs(120)).is_empty());
    }

    #[test]
    fn test_quick_move_credits_bonus_to_record() {
        let config = SessionConfig::new().with_timer(TimerConfig::minutes(1));
        let mut session = Session::start(config, 2).unwrap();
        session.tick(Duration::from_secs(2));

        let events = session.submit_move(0).unwrap();
        let SessionEvent::MovePlayed(record) = &events[0] else {
            panic!("expected MovePlayed");
        };
        assert_eq!(record.bonus, Some(crate::timer::QUICK_MOVE_BONUS));
        assert_eq!(session.timer().remaining(PlayerId::A), Some(Duration::from_secs(63)));
    }

    #[test]
    fn test_moves_log_cleared_on_reset() {
        let mut session = Session::start(SessionConfig::new(), 4).unwrap();
        session.submit_move(0).unwrap();
        session.submit_move(1).unwrap();
        assert_eq!(session.moves().len(), 2);

        session.reset();
        assert!(session.moves().is_empty());
    }

    #[test]
    fn test_roll_symbol_stays_in_set() {
        let mut rng = GameRng::new(0);
        let set = SymbolSet::Custom(vec!["x".into(), "o".into()]);

        for _ in 0..50 {
            let symbol = roll_symbol(&mut rng, &set);
            assert!(symbol == "x" || symbol == "o");
        }
    }
}
