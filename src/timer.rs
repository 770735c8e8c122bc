//! Game clocks driven by a logical time source.
//!
//! The host calls `GameTimer::tick` with the real time that passed; nothing
//! here reads the wall clock. Expiry and the quick-move bonus are computed
//! from the accumulated durations, so tick granularity does not matter.
//!
//! ## Modes
//!
//! - Untimed: the timer is inert. `tick` does nothing, no bonus is credited.
//! - Shared: one clock, drained by whoever is active.
//! - Separate: one bank per player, only the active player's drains.
//!
//! ## Quick-move bonus
//!
//! A move landing within `QUICK_MOVE_WINDOW` of its turn starting credits
//! `QUICK_MOVE_BONUS` to the mover's bank (or the shared clock).

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::core::{PlayerId, PlayerMap, TimerConfig};

/// Window after a turn starts in which a move earns the bonus.
pub const QUICK_MOVE_WINDOW: Duration = Duration::from_secs(10);

/// Time credited for a quick move.
pub const QUICK_MOVE_BONUS: Duration = Duration::from_secs(5);

/// Remaining time on the game clock(s).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Clocks {
    /// One clock for both players.
    Shared {
        /// Time left.
        remaining: Duration,
    },
    /// One bank per player.
    Separate {
        /// Time left per player.
        remaining: PlayerMap<Duration>,
    },
}

impl Clocks {
    /// Time left for a player (the shared clock in shared mode).
    #[must_use]
    pub fn remaining(&self, player: PlayerId) -> Duration {
        match self {
            Clocks::Shared { remaining } => *remaining,
            Clocks::Separate { remaining } => remaining[player],
        }
    }

    fn bank_mut(&mut self, player: PlayerId) -> &mut Duration {
        match self {
            Clocks::Shared { remaining } => remaining,
            Clocks::Separate { remaining } => &mut remaining[player],
        }
    }
}

/// Game clock state for one game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameTimer {
    clocks: Option<Clocks>,
    quick_bonus: bool,
    turn_elapsed: Duration,
    running: bool,
}

impl GameTimer {
    /// Build a timer from configuration. `None` gives an inert timer.
    #[must_use]
    pub fn new(config: Option<&TimerConfig>) -> Self {
        let clocks = config.map(|c| {
            if c.separate {
                Clocks::Separate {
                    remaining: PlayerMap::with_value(c.total()),
                }
            } else {
                Clocks::Shared {
                    remaining: c.total(),
                }
            }
        });

        Self {
            running: clocks.is_some(),
            quick_bonus: config.is_some_and(|c| c.quick_bonus),
            clocks,
            turn_elapsed: Duration::ZERO,
        }
    }

    /// True if the game has a clock at all.
    #[must_use]
    pub fn is_timed(&self) -> bool {
        self.clocks.is_some()
    }

    /// True while the clock is draining.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current clock values, if timed.
    #[must_use]
    pub fn clocks(&self) -> Option<&Clocks> {
        self.clocks.as_ref()
    }

    /// Time left for a player, if timed.
    #[must_use]
    pub fn remaining(&self, player: PlayerId) -> Option<Duration> {
        self.clocks.as_ref().map(|c| c.remaining(player))
    }

    /// Time spent on the current turn so far.
    #[must_use]
    pub fn turn_elapsed(&self) -> Duration {
        self.turn_elapsed
    }

    /// Countdown of the quick-move window, if the bonus is enabled.
    ///
    /// Reaches zero once the window has passed.
    #[must_use]
    pub fn quick_move_remaining(&self) -> Option<Duration> {
        if self.is_timed() && self.quick_bonus {
            Some(QUICK_MOVE_WINDOW.saturating_sub(self.turn_elapsed))
        } else {
            None
        }
    }

    /// Drain `elapsed` from the active player's clock.
    ///
    /// Returns the player who ran out of time, if the clock reached zero.
    /// After expiry the timer stops and further ticks do nothing.
    pub fn tick(&mut self, active: PlayerId, elapsed: Duration) -> Option<PlayerId> {
        if !self.running {
            return None;
        }
        let clocks = self.clocks.as_mut()?;

        self.turn_elapsed += elapsed;
        let bank = clocks.bank_mut(active);
        *bank = bank.saturating_sub(elapsed);

        if bank.is_zero() {
            info!(player = %active, "Clock expired");
            self.running = false;
            return Some(active);
        }
        None
    }

    /// Restart the per-turn window. Called when a new turn begins.
    pub fn start_turn(&mut self) {
        self.turn_elapsed = Duration::ZERO;
    }

    /// Credit the quick-move bonus to the mover if the move was quick enough.
    ///
    /// Returns the amount credited. Call once per applied move.
    pub fn credit_move(&mut self, mover: PlayerId) -> Option<Duration> {
        if !self.running || !self.quick_bonus || self.turn_elapsed > QUICK_MOVE_WINDOW {
            return None;
        }
        let clocks = self.clocks.as_mut()?;

        *clocks.bank_mut(mover) += QUICK_MOVE_BONUS;
        debug!(player = %mover, turn_elapsed = ?self.turn_elapsed, "Quick-move bonus credited");
        Some(QUICK_MOVE_BONUS)
    }

    /// Stop the clock for good (game over).
    pub fn stop(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_untimed_is_inert() {
        let mut timer = GameTimer::new(None);

        assert!(!timer.is_timed());
        assert!(!timer.is_running());
        assert_eq!(timer.tick(PlayerId::A, secs(10_000)), None);
        assert_eq!(timer.credit_move(PlayerId::A), None);
        assert_eq!(timer.remaining(PlayerId::A), None);
        assert_eq!(timer.quick_move_remaining(), None);
    }

    #[test]
    fn test_shared_clock_drains_for_both() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2).shared()));

        timer.tick(PlayerId::A, secs(30));
        timer.tick(PlayerId::B, secs(30));

        assert_eq!(timer.remaining(PlayerId::A), Some(secs(60)));
        assert_eq!(timer.remaining(PlayerId::B), Some(secs(60)));
    }

    #[test]
    fn test_separate_banks_drain_independently() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(1)));

        timer.tick(PlayerId::A, secs(20));

        assert_eq!(timer.remaining(PlayerId::A), Some(secs(40)));
        assert_eq!(timer.remaining(PlayerId::B), Some(secs(60)));
    }

    #[test]
    fn test_expiry_reports_active_player_and_stops() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(1)));

        assert_eq!(timer.tick(PlayerId::B, secs(59)), None);
        assert_eq!(timer.tick(PlayerId::B, secs(1)), Some(PlayerId::B));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(PlayerId::B), Some(Duration::ZERO));

        // Stopped: no second expiry, no drain on the other bank.
        assert_eq!(timer.tick(PlayerId::A, secs(100)), None);
        assert_eq!(timer.remaining(PlayerId::A), Some(secs(60)));
    }

    #[test]
    fn test_overshooting_tick_saturates() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(1).shared()));

        assert_eq!(timer.tick(PlayerId::A, secs(90)), Some(PlayerId::A));
        assert_eq!(timer.remaining(PlayerId::A), Some(Duration::ZERO));
    }

    #[test]
    fn test_quick_bonus_within_window() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2)));
        timer.start_turn();
        for _ in 0..9 {
            timer.tick(PlayerId::A, secs(1));
        }

        assert_eq!(timer.quick_move_remaining(), Some(secs(1)));
        assert_eq!(timer.credit_move(PlayerId::A), Some(QUICK_MOVE_BONUS));
        assert_eq!(timer.remaining(PlayerId::A), Some(secs(120 - 9 + 5)));
        assert_eq!(timer.remaining(PlayerId::B), Some(secs(120)));
    }

    #[test]
    fn test_quick_bonus_at_window_edge() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2)));
        timer.tick(PlayerId::A, QUICK_MOVE_WINDOW);

        assert_eq!(timer.quick_move_remaining(), Some(Duration::ZERO));
        assert_eq!(timer.credit_move(PlayerId::A), Some(QUICK_MOVE_BONUS));
    }

    #[test]
    fn test_no_bonus_after_window() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2)));
        timer.tick(PlayerId::A, secs(11));

        assert_eq!(timer.credit_move(PlayerId::A), None);
        assert_eq!(timer.remaining(PlayerId::A), Some(secs(109)));
    }

    #[test]
    fn test_sub_second_ticks_accumulate() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2)));
        for _ in 0..21 {
            timer.tick(PlayerId::A, Duration::from_millis(500));
        }

        // 10.5 s elapsed: outside the window even though no whole-second tick hit 11.
        assert_eq!(timer.credit_move(PlayerId::A), None);
    }

    #[test]
    fn test_bonus_disabled() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2).with_quick_bonus(false)));
        timer.tick(PlayerId::A, secs(1));

        assert_eq!(timer.quick_move_remaining(), None);
        assert_eq!(timer.credit_move(PlayerId::A), None);
    }

    #[test]
    fn test_shared_bonus_goes_to_shared_clock() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2).shared()));
        timer.tick(PlayerId::B, secs(3));
        timer.credit_move(PlayerId::B);

        assert_eq!(timer.remaining(PlayerId::A), Some(secs(122)));
    }

    #[test]
    fn test_start_turn_resets_window() {
        let mut timer = GameTimer::new(Some(&TimerConfig::minutes(2)));
        timer.tick(PlayerId::A, secs(30));
        assert_eq!(timer.quick_move_remaining(), Some(Duration::ZERO));

        timer.start_turn();
        assert_eq!(timer.turn_elapsed(), Duration::ZERO);
        assert_eq!(timer.quick_move_remaining(), Some(QUICK_MOVE_WINDOW));
    }
}
