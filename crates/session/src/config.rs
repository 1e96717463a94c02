//! Session configuration
//!
//! Read once from the environment at startup:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `NOTINT_MODE` | `traditional`, `easy`, `zen`, `challenge` (or the initial) |
//! | `NOTINT_LEVEL` | starting level |
//! | `NOTINT_SEED` | RNG seed |
//! | `NOTINT_SHOW_NEXT` | `1`/`true` to show the next piece |
//! | `NOTINT_DOTTED` | `1`/`true` to draw dotted guide lines |
//! | `NOTINT_LOG_PATH` | JSONL journal path |

use std::env;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use notint_core::{Assists, EngineConfig, SimpleRng};
use notint_types::{GameMode, MAX_LEVEL, MIN_LEVEL, ZEN_LEVEL};

/// Rejected configuration input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    UnknownMode,
    InvalidLevel,
    LevelOutOfRange,
    InvalidSeed,
    InvalidFlag,
}

impl ConfigError {
    pub fn code(self) -> &'static str {
        match self {
            ConfigError::UnknownMode => "unknown_mode",
            ConfigError::InvalidLevel | ConfigError::LevelOutOfRange => "invalid_level",
            ConfigError::InvalidSeed => "invalid_seed",
            ConfigError::InvalidFlag => "invalid_flag",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ConfigError::UnknownMode => "mode must be traditional, easy, zen or challenge",
            ConfigError::InvalidLevel => "level is not a number",
            ConfigError::LevelOutOfRange => "level must be between 1 and 9 (at least 1 in challenge)",
            ConfigError::InvalidSeed => "seed is not a 32-bit unsigned number",
            ConfigError::InvalidFlag => "flag must be 1, 0, true or false",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ConfigError {}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: GameMode,
    /// Requested start level; `None` picks one at random
    pub level: Option<u32>,
    /// RNG seed; `None` derives one from the clock
    pub seed: Option<u32>,
    pub show_next: bool,
    pub dotted_lines: bool,
    pub log_path: Option<String>,
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Traditional,
            level: None,
            seed: None,
            show_next: false,
            dotted_lines: false,
            log_path: None,
            engine: EngineConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create from any variable source (the environment, a map in tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mode = match var("NOTINT_MODE") {
            Some(s) => GameMode::from_str(&s).ok_or(ConfigError::UnknownMode)?,
            None => GameMode::Traditional,
        };
        let level = var("NOTINT_LEVEL")
            .map(|s| s.parse::<u32>().map_err(|_| ConfigError::InvalidLevel))
            .transpose()?;
        let seed = var("NOTINT_SEED")
            .map(|s| s.parse::<u32>().map_err(|_| ConfigError::InvalidSeed))
            .transpose()?;
        let show_next = var("NOTINT_SHOW_NEXT").map(|s| parse_flag(&s)).transpose()?;
        let dotted_lines = var("NOTINT_DOTTED").map(|s| parse_flag(&s)).transpose()?;

        let config = Self {
            mode,
            level,
            seed,
            show_next: show_next.unwrap_or(false),
            dotted_lines: dotted_lines.unwrap_or(false),
            log_path: var("NOTINT_LOG_PATH"),
            engine: EngineConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the requested level against the mode
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.mode, self.level) {
            // Zen ignores the requested level
            (GameMode::Zen, _) | (_, None) => Ok(()),
            (mode, Some(level)) if mode.uncapped_level() && level >= MIN_LEVEL => Ok(()),
            (_, Some(level)) if (MIN_LEVEL..=MAX_LEVEL).contains(&level) => Ok(()),
            _ => Err(ConfigError::LevelOutOfRange),
        }
    }

    /// Seed to start the game with
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }

    /// Level to start the game with
    ///
    /// Zen always plays at its own level; without a request the level is
    /// picked from `1..=8`.
    pub fn resolve_level(&self, rng: &mut SimpleRng) -> u32 {
        if self.mode == GameMode::Zen {
            return ZEN_LEVEL;
        }
        self.level
            .unwrap_or_else(|| MIN_LEVEL + rng.next_range(MAX_LEVEL - 1))
    }

    /// Starting assistance: the requested options plus what the mode forces
    pub fn assists(&self) -> Assists {
        Assists {
            show_next: self.show_next || self.mode.forces_show_next(),
            dotted_lines: self.dotted_lines,
        }
    }
}

fn parse_flag(s: &str) -> Result<bool, ConfigError> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag),
    }
}
