//! Session configuration types.
//!
//! A host configures a session at startup by providing:
//! - `PlayerConfig`: display name and symbol set for each seat
//! - `TimerConfig`: optional game clock (shared or per-player, quick bonus)
//! - `SessionConfig`: combines the above with the computer-opponent switch
//!
//! Configurations are plain values passed into `Session::start`; nothing is
//! stored globally. They can also be loaded from TOML:
//!
//! ```
//! use vanishing_ttt::core::{SessionConfig, SymbolCategory, SymbolSet};
//!
//! let config = SessionConfig::from_toml_str(r#"
//!     vs_computer = true
//!
//!     [player_a]
//!     name = "Ada"
//!     symbols = "sports"
//!
//!     [timer]
//!     total_minutes = 3
//!     separate = false
//! "#).unwrap();
//!
//! assert_eq!(config.player_a.symbols, SymbolSet::Category(SymbolCategory::Sports));
//! assert_eq!(config.timer.unwrap().total_minutes, 3);
//! ```

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::player::PlayerId;

/// Display name used for seat B when it is played by the computer.
pub const COMPUTER_NAME: &str = "Computer";

/// Shortest allowed timed game, in minutes.
pub const MIN_GAME_MINUTES: u32 = 1;

/// Longest allowed timed game, in minutes.
pub const MAX_GAME_MINUTES: u32 = 20;

/// Configuration error. The session does not start.
#[derive(Debug, Display, Error)]
pub enum ConfigError {
    /// Two human players picked identical symbol sets.
    #[display("both players cannot use the same symbol set")]
    DuplicateSymbolSets,

    /// A player's symbol set has no symbols.
    #[display("{} has an empty symbol set", _0)]
    EmptySymbolSet(#[error(not(source))] PlayerId),

    /// Game duration outside the supported range.
    #[display(
        "game duration of {} minutes is outside {}..={}",
        _0,
        MIN_GAME_MINUTES,
        MAX_GAME_MINUTES
    )]
    InvalidDuration(#[error(not(source))] u32),

    /// Config file could not be read.
    #[display("failed to read config file {}: {}", path, source)]
    Read {
        /// Path that failed.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config text is not valid TOML for this schema.
    #[display("failed to parse config: {}", _0)]
    Parse(#[error(source)] toml::de::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Built-in symbol categories offered to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolCategory {
    /// Animal faces.
    Animals,
    /// Food.
    Food,
    /// Sports balls and gear.
    Sports,
    /// Flowers, plants, weather.
    Nature,
    /// Vehicles and landmarks.
    Travel,
}

impl SymbolCategory {
    /// Every category, in menu order.
    pub const ALL: [SymbolCategory; 5] = [
        SymbolCategory::Animals,
        SymbolCategory::Food,
        SymbolCategory::Sports,
        SymbolCategory::Nature,
        SymbolCategory::Travel,
    ];

    /// The nine symbols in this category.
    #[must_use]
    pub const fn symbols(self) -> &'static [&'static str] {
        match self {
            SymbolCategory::Animals => &["🐶", "🐱", "🐵", "🐰", "🦊", "🐼", "🐨", "🦁", "🐯"],
            SymbolCategory::Food => &["🍕", "🍟", "🍔", "🍩", "🍦", "🍭", "🍫", "🍿", "🥤"],
            SymbolCategory::Sports => &["⚽️", "🏀", "🏈", "🎾", "🏐", "🏉", "🎱", "🏓", "⛳️"],
            SymbolCategory::Nature => &["🌸", "🌺", "🌻", "🌹", "🌴", "🌵", "🍄", "🌈", "⭐️"],
            SymbolCategory::Travel => &["✈️", "🚗", "🚢", "🚁", "🚂", "🚲", "🏖️", "🗽", "🏰"],
        }
    }
}

impl std::fmt::Display for SymbolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SymbolCategory::Animals => "animals",
            SymbolCategory::Food => "food",
            SymbolCategory::Sports => "sports",
            SymbolCategory::Nature => "nature",
            SymbolCategory::Travel => "travel",
        };
        f.write_str(name)
    }
}

/// The pool a player's marks are drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SymbolSet {
    /// One of the built-in categories.
    Category(SymbolCategory),
    /// A caller-provided list.
    Custom(Vec<String>),
}

impl SymbolSet {
    /// Number of symbols in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SymbolSet::Category(c) => c.symbols().len(),
            SymbolSet::Custom(symbols) => symbols.len(),
        }
    }

    /// True if the set has no symbols.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol at a position in the set.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        match self {
            SymbolSet::Category(c) => c.symbols().get(index).copied(),
            SymbolSet::Custom(symbols) => symbols.get(index).map(String::as_str),
        }
    }

    /// Iterate over the symbols in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// True if both sets hold the same symbols in the same order.
    ///
    /// A category and a custom list spelling out that category are the same.
    #[must_use]
    pub fn same_symbols(&self, other: &SymbolSet) -> bool {
        self.iter().eq(other.iter())
    }
}

impl From<SymbolCategory> for SymbolSet {
    fn from(category: SymbolCategory) -> Self {
        SymbolSet::Category(category)
    }
}

/// Configuration for one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name.
    pub name: String,

    /// Pool the seat's marks are rolled from.
    pub symbols: SymbolSet,
}

impl PlayerConfig {
    /// Create a new seat configuration.
    pub fn new(name: impl Into<String>, symbols: impl Into<SymbolSet>) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.into(),
        }
    }
}

/// Game clock configuration.
///
/// Absent (`None` in `SessionConfig::timer`) means an untimed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Starting time on each clock, in minutes.
    pub total_minutes: u32,

    /// Give each player an independent bank instead of one shared clock.
    pub separate: bool,

    /// Credit extra time for moves made inside the quick-move window.
    pub quick_bonus: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            total_minutes: 3,
            separate: true,
            quick_bonus: true,
        }
    }
}

impl TimerConfig {
    /// Timed game of the given length, with separate banks and quick bonus.
    #[must_use]
    pub fn minutes(total_minutes: u32) -> Self {
        Self {
            total_minutes,
            ..Self::default()
        }
    }

    /// Use one shared clock.
    #[must_use]
    pub fn shared(mut self) -> Self {
        self.separate = false;
        self
    }

    /// Use one bank per player.
    #[must_use]
    pub fn separate(mut self) -> Self {
        self.separate = true;
        self
    }

    /// Enable or disable the quick-move bonus.
    #[must_use]
    pub fn with_quick_bonus(mut self, enabled: bool) -> Self {
        self.quick_bonus = enabled;
        self
    }

    /// Starting time on each clock.
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_secs(u64::from(self.total_minutes) * 60)
    }
}

/// Complete session configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seat A (always human, moves first).
    pub player_a: PlayerConfig,

    /// Seat B (human, or the computer when `vs_computer` is set).
    pub player_b: PlayerConfig,

    /// Seat B is played by the computer.
    pub vs_computer: bool,

    /// Game clock. `None` for an untimed game.
    pub timer: Option<TimerConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player_a: PlayerConfig::new("Player 1", SymbolCategory::Animals),
            player_b: PlayerConfig::new("Player 2", SymbolCategory::Food),
            vs_computer: false,
            timer: None,
        }
    }
}

impl SessionConfig {
    /// Create the default two-human, untimed configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set seat A.
    #[must_use]
    pub fn with_player_a(mut self, player: PlayerConfig) -> Self {
        self.player_a = player;
        self
    }

    /// Set seat B.
    #[must_use]
    pub fn with_player_b(mut self, player: PlayerConfig) -> Self {
        self.player_b = player;
        self
    }

    /// Let the computer play seat B.
    #[must_use]
    pub fn vs_computer(mut self) -> Self {
        self.vs_computer = true;
        self
    }

    /// Set the game clock.
    #[must_use]
    pub fn with_timer(mut self, timer: TimerConfig) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Configuration for a seat.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerConfig {
        match player {
            PlayerId::A => &self.player_a,
            PlayerId::B => &self.player_b,
        }
    }

    /// True if the computer plays this seat.
    #[must_use]
    pub fn is_computer(&self, player: PlayerId) -> bool {
        self.vs_computer && player == PlayerId::B
    }

    /// Name shown for a seat.
    #[must_use]
    pub fn display_name(&self, player: PlayerId) -> &str {
        if self.is_computer(player) {
            COMPUTER_NAME
        } else {
            &self.player(player).name
        }
    }

    /// Check the configuration before a session starts.
    ///
    /// # Errors
    ///
    /// - `EmptySymbolSet` if a seat has nothing to roll from
    /// - `DuplicateSymbolSets` if two humans share identical symbol sets
    /// - `InvalidDuration` if the timer length is outside 1..=20 minutes
    #[instrument(skip(self), fields(vs_computer = self.vs_computer))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        for player in PlayerId::ALL {
            if self.player(player).symbols.is_empty() {
                return Err(ConfigError::EmptySymbolSet(player));
            }
        }

        if !self.vs_computer && self.player_a.symbols.same_symbols(&self.player_b.symbols) {
            return Err(ConfigError::DuplicateSymbolSets);
        }

        if let Some(timer) = &self.timer {
            if !(MIN_GAME_MINUTES..=MAX_GAME_MINUTES).contains(&timer.total_minutes) {
                return Err(ConfigError::InvalidDuration(timer.total_minutes));
            }
        }

        debug!("Configuration valid");
        Ok(())
    }

    /// Parse a configuration from TOML text. Missing keys take defaults.
    ///
    /// The result is not validated; `Session::start` does that.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        info!(vs_computer = config.vs_computer, timed = config.timer.is_some(), "Config loaded");
        Ok(config)
    }
}
