//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on rendering, input polling, or file I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Unit tests for every rule and edge case
//! - **Portable**: Can run behind a terminal, a GUI, or headless
//! - **Allocation-free**: Board, shapes and statistics are fixed-size values
//!
//! # Module Structure
//!
//! - [`board`]: walled grid with collision tests, line clears and masked counts
//! - [`shapes`]: the seven-shape catalog and its per-shape rotation rules
//! - [`motion`]: erase/test/redraw movement primitives
//! - [`rng`]: seeded LCG and the easy-mode "lucky" bias
//! - [`challenge`]: level-indexed challenge page patterns
//! - [`stats`]: per-round statistics and the efficiency metric
//! - [`scoring`]: pluggable score evaluators and the per-mode rules
//! - [`engine`]: the state machine tying it all together
//!
//! # Game Rules
//!
//! - **No gravity timing**: the caller decides when a tick happens; each
//!   [`Engine::evaluate`] either drops the piece one row or settles it
//! - **No wall kicks**: a rotation that does not fit in place is rejected
//! - **Scaled score**: the score is kept at `SCORE_FACTOR` times the
//!   displayed value so halving penalties do not lose precision
//!
//! # Example
//!
//! ```
//! use notint_core::{Engine, EngineConfig, ModeScorer};
//! use notint_types::{Action, Evaluation, GameMode};
//!
//! let mut game = Engine::with_config(12345, ModeScorer::default(), EngineConfig::instant());
//! game.tweak_for_mode(2, GameMode::Traditional);
//!
//! game.apply_action(Action::MoveRight);
//! game.apply_action(Action::Drop);
//! assert_eq!(game.evaluate(), Evaluation::Settled);
//!
//! // Every placement scores at least `level` points
//! assert!(game.score() > 0);
//! ```

pub mod board;
pub mod challenge;
pub mod engine;
pub mod motion;
pub mod rng;
pub mod scoring;
pub mod shapes;
pub mod snapshot;
pub mod stats;

pub use notint_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use engine::{Engine, EngineConfig, SettleEvent};
pub use motion::Position;
pub use rng::{Bias, ShapePicker, SimpleRng};
pub use scoring::{Assists, ModeScorer, ScoreContext, ScoreEvaluator};
pub use shapes::{RotationRule, Shape, CATALOG};
pub use snapshot::{EngineSnapshot, ShapeSnapshot};
pub use stats::RoundStats;
