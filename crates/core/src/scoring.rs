//! Scoring module - mode-specific score evaluators
//!
//! The engine calls its evaluator exactly once per settle and adds the
//! returned delta to the internal (scaled) score. Rules of [`ModeScorer`]:
//!
//! - **Zen**: `scaled(last_clear)`, nothing else.
//! - **Traditional**: `scaled(level * (drop_count + 1))`, halved once per
//!   enabled assistance option.
//! - **Easy**: the traditional drop score plus `level * last_clear`.
//! - **Challenge**: a wasted-line penalty when no challenge block was
//!   removed, or the page bonus minus the leftover penalty when the last
//!   challenge block went; then the traditional drop score.
//!
//! Any `FnMut(&ScoreContext) -> i64` closure is also an evaluator, so other
//! policies can be plugged into the engine without touching it.

use crate::stats::RoundStats;
use crate::types::{scaled, GameMode, LEFTOVER_PENALTY, SCORE_PENALTY};

/// Everything an evaluator may look at during a settle
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext<'a> {
    pub mode: GameMode,
    pub level: u32,
    pub stats: &'a RoundStats,
}

/// Score policy invoked once per settle
pub trait ScoreEvaluator {
    /// Scaled score delta for the settle described by `ctx`
    fn evaluate(&mut self, ctx: &ScoreContext<'_>) -> i64;
}

impl<F> ScoreEvaluator for F
where
    F: FnMut(&ScoreContext<'_>) -> i64,
{
    fn evaluate(&mut self, ctx: &ScoreContext<'_>) -> i64 {
        self(ctx)
    }
}

/// Presentation aids that cost points while enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Assists {
    pub show_next: bool,
    pub dotted_lines: bool,
}

impl Assists {
    /// Assistance a mode starts with
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            show_next: mode.forces_show_next(),
            dotted_lines: false,
        }
    }
}

/// The built-in per-mode evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeScorer {
    pub assists: Assists,
}

impl ModeScorer {
    pub fn new(assists: Assists) -> Self {
        Self { assists }
    }
}

impl ScoreEvaluator for ModeScorer {
    fn evaluate(&mut self, ctx: &ScoreContext<'_>) -> i64 {
        let stats = ctx.stats;
        let level = i64::from(ctx.level);
        let lines = i64::from(stats.last_clear);

        match ctx.mode {
            GameMode::Zen => scaled(lines),
            GameMode::Traditional => drop_score(level, stats.drop_count, self.assists),
            GameMode::Easy => drop_score(level, stats.drop_count, self.assists) + level * lines,
            GameMode::Challenge => {
                challenge_adjustment(level, stats) + drop_score(level, stats.drop_count, self.assists)
            }
        }
    }
}

/// Base placement score: `scaled(level * (drop_count + 1))`, halved per assist
pub fn drop_score(level: i64, drop_count: i32, assists: Assists) -> i64 {
    let mut score = scaled(level * (i64::from(drop_count) + 1));
    if assists.show_next {
        score /= SCORE_PENALTY;
    }
    if assists.dotted_lines {
        score /= SCORE_PENALTY;
    }
    score
}

/// Challenge-mode page bookkeeping
///
/// Lines cleared without removing a challenge block cost
/// `level * 2 * scaled(last_clear)`. Removing the last challenge block earns
/// `scaled(challenge_start)` less `10 * scaled(non_challenge_blocks)`.
pub fn challenge_adjustment(level: i64, stats: &RoundStats) -> i64 {
    if stats.challenge_blocks == stats.challenge_blocks_prev {
        -(level * SCORE_PENALTY * scaled(i64::from(stats.last_clear)))
    } else if stats.challenge_blocks == 0 {
        scaled(i64::from(stats.challenge_start))
            - LEFTOVER_PENALTY * scaled(i64::from(stats.non_challenge_blocks))
    } else {
        0
    }
}
