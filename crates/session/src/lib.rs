//! Session layer - everything around the engine that a game needs
//!
//! - [`config`]: `NOTINT_*` environment configuration and its errors
//! - [`journal`]: JSONL event log
//! - [`session`]: level progression, commands, shape counts, final summary

pub mod config;
pub mod journal;
pub mod session;

pub use config::{ConfigError, SessionConfig};
pub use journal::{Journal, JournalEvent, LevelReason};
pub use session::{ModeStatus, Progress, ScoreSummary, Session, ShapeCounts};
