//! Engine module - the per-game state machine
//!
//! Ties together the board, the live shape table, the shape picker, round
//! statistics and the score evaluator. Callers alternate between
//! [`Engine::apply_action`] for player input and [`Engine::evaluate`] for
//! ticks; neither is ever re-entered.
//!
//! The current piece is kept drawn on the board between calls. It is drawn
//! when the engine is created and after every successful spawn; a spawn
//! that does not fit ends the game and leaves the board as the settle left
//! it.

use std::thread;
use std::time::Duration;

use crate::board::Board;
use crate::challenge;
use crate::motion::{self, Position};
use crate::rng::{Bias, ShapePicker};
use crate::scoring::{ModeScorer, ScoreContext, ScoreEvaluator};
use crate::shapes::{Shape, CATALOG};
use crate::snapshot::{EngineSnapshot, ShapeSnapshot};
use crate::stats::RoundStats;
use crate::types::{
    unscaled, Action, Evaluation, GameMode, ShapeKind, CHALLENGE_MASK, COLOR_MASK,
    EASY_SPAWN_MIN_X, EASY_SPAWN_SPREAD, MIN_LEVEL, NUM_BLOCKS, NUM_SHAPES, SPAWN_X, SPAWN_Y,
};

/// Pause between clearing a challenge page and showing the next one
pub const DEFAULT_CHALLENGE_PAUSE: Duration = Duration::from_secs(1);

/// Engine tuning that does not change the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Sleep before the board is wiped for the next challenge page
    pub challenge_pause: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            challenge_pause: DEFAULT_CHALLENGE_PAUSE,
        }
    }
}

impl EngineConfig {
    /// No pauses; for tests and headless runs
    pub fn instant() -> Self {
        Self {
            challenge_pause: Duration::ZERO,
        }
    }
}

/// What happened during the last settle (consumed by observers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleEvent {
    /// Shape of the piece that settled
    pub shape: ShapeKind,
    pub lines_cleared: u32,
    /// Scaled score change returned by the evaluator
    pub score_delta: i64,
    /// The last challenge block went and the next page was generated
    pub page_cleared: bool,
    /// The next piece could not be spawned
    pub game_over: bool,
}

/// Complete engine state
#[derive(Debug, Clone)]
pub struct Engine<S = ModeScorer> {
    board: Board,
    /// Blank board captured at construction, restored for each challenge page
    template: Board,
    /// Live shape table, reset from the catalog on every settle
    shapes: [Shape; NUM_SHAPES],
    current: ShapeKind,
    next: ShapeKind,
    pos: Position,
    level: u32,
    mode: GameMode,
    /// Internal score, `SCORE_FACTOR` times the displayed one
    score: i64,
    picker: ShapePicker,
    stats: RoundStats,
    scorer: S,
    config: EngineConfig,
    last_event: Option<SettleEvent>,
    game_over: bool,
}

impl Engine<ModeScorer> {
    /// Traditional-mode engine at level 1 with the built-in scorer
    pub fn with_seed(seed: u32) -> Self {
        Self::new(seed, ModeScorer::default())
    }
}

impl<S: ScoreEvaluator> Engine<S> {
    /// Create a new engine with the given RNG seed and score evaluator
    pub fn new(seed: u32, scorer: S) -> Self {
        Self::with_config(seed, scorer, EngineConfig::default())
    }

    pub fn with_config(seed: u32, scorer: S, config: EngineConfig) -> Self {
        let board = Board::new();
        let mut picker = ShapePicker::new(seed);
        let current = picker.next_shape();
        let next = picker.next_shape();

        let mut engine = Self {
            template: board.clone(),
            board,
            shapes: CATALOG,
            current,
            next,
            pos: Position::new(SPAWN_X, SPAWN_Y),
            level: MIN_LEVEL,
            mode: GameMode::Traditional,
            score: 0,
            picker,
            stats: RoundStats::default(),
            scorer,
            config,
            last_event: None,
            game_over: false,
        };
        engine.draw_current();
        engine
    }

    /// One-time setup after construction
    ///
    /// Challenge mode generates the first page for `level`. Easy mode
    /// enables the shape bias (the level names the shape that may not be
    /// preferred first) and redraws both pieces under it.
    pub fn tweak_for_mode(&mut self, level: u32, mode: GameMode) {
        self.level = level.max(MIN_LEVEL);
        self.mode = mode;

        match mode {
            GameMode::Challenge => {
                self.erase_current();
                self.generate_page();
                self.draw_current();
            }
            GameMode::Easy => {
                self.erase_current();
                self.picker.set_bias(Bias::for_level(self.level));
                self.picker.advance();
                self.current = self.picker.next_shape();
                self.next = self.picker.next_shape();
                self.draw_current();
            }
            GameMode::Traditional | GameMode::Zen => {}
        }
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level.max(MIN_LEVEL);
    }

    /// Apply one player action, returning whether it had any effect
    ///
    /// Moves and rotations count only when they succeed. A drop always
    /// counts, even when the piece was already resting.
    pub fn apply_action(&mut self, action: Action) -> bool {
        if self.game_over {
            return false;
        }
        let shape = &mut self.shapes[self.current.index()];
        match action {
            Action::MoveLeft => {
                let moved = motion::move_left(&mut self.board, shape, &mut self.pos);
                if moved {
                    self.stats.moves += 1;
                }
                moved
            }
            Action::MoveRight => {
                let moved = motion::move_right(&mut self.board, shape, &mut self.pos);
                if moved {
                    self.stats.moves += 1;
                }
                moved
            }
            Action::Rotate => {
                let rotated = motion::rotate(&mut self.board, shape, self.pos);
                if rotated {
                    self.stats.rotations += 1;
                }
                rotated
            }
            Action::Drop => {
                let rows = motion::drop(&mut self.board, shape, &mut self.pos);
                self.stats.drop_count += rows as i32;
                true
            }
        }
    }

    /// Advance the game by one tick
    ///
    /// A piece that can still fall moves down one row. A resting piece
    /// settles: full rows are removed, the score evaluator runs, challenge
    /// pages are regenerated, statistics are folded, and the next piece is
    /// spawned.
    pub fn evaluate(&mut self) -> Evaluation {
        if self.game_over {
            return Evaluation::GameOver;
        }

        let shape = &self.shapes[self.current.index()];
        if !motion::is_resting(&mut self.board, shape, self.pos) {
            motion::move_down(&mut self.board, shape, &mut self.pos);
            return Evaluation::Falling;
        }

        let lines = self.board.compact_full_rows().len() as u32;
        self.stats.last_clear = lines;

        let challenge = self.mode == GameMode::Challenge;
        let mut page_cleared = false;
        if challenge && lines > 0 {
            let blocks = self.board.count_masked(CHALLENGE_MASK);
            self.stats.challenge_blocks = blocks;
            self.stats.non_challenge_blocks = self.board.count_masked(COLOR_MASK) - blocks;
            page_cleared = blocks == 0;
            if page_cleared && !self.config.challenge_pause.is_zero() {
                thread::sleep(self.config.challenge_pause);
            }
        }

        let score_delta = self.scorer.evaluate(&ScoreContext {
            mode: self.mode,
            level: self.level,
            stats: &self.stats,
        });
        self.score += score_delta;
        if challenge {
            self.stats.challenge_blocks_prev = self.stats.challenge_blocks;
        }

        if page_cleared {
            self.board = self.template.clone();
            self.level = self.level.saturating_add(1);
            self.generate_page();
        }

        if challenge && lines == 0 {
            self.stats.non_challenge_blocks += NUM_BLOCKS as u32;
        }

        self.stats.total_lines += lines;
        self.stats.last_clear = 0;
        self.stats.fold_efficiency(self.pos.x);

        let settled = self.current;
        let spawned = self.spawn_next();
        self.last_event = Some(SettleEvent {
            shape: settled,
            lines_cleared: lines,
            score_delta,
            page_cleared,
            game_over: !spawned,
        });

        if spawned {
            Evaluation::Settled
        } else {
            self.game_over = true;
            Evaluation::GameOver
        }
    }

    /// Promote the next piece, draw a new one and try to place it
    fn spawn_next(&mut self) -> bool {
        let x = if self.mode == GameMode::Easy {
            EASY_SPAWN_MIN_X + self.picker.rng_mut().next_range(EASY_SPAWN_SPREAD) as i32
        } else {
            SPAWN_X
        };
        self.pos = Position::new(x, SPAWN_Y);
        self.current = self.next;
        self.next = self.picker.next_shape();
        self.shapes = CATALOG;

        if self.board.fits(self.current_shape(), self.pos.x, self.pos.y) {
            self.draw_current();
            true
        } else {
            false
        }
    }

    fn generate_page(&mut self) {
        let blocks = challenge::generate(&mut self.board, self.level, self.picker.rng_mut());
        self.stats.start_challenge(blocks);
    }

    fn draw_current(&mut self) {
        let shape = self.shapes[self.current.index()];
        if self.board.fits(&shape, self.pos.x, self.pos.y) {
            self.board.place(&shape, self.pos.x, self.pos.y);
        }
    }

    fn erase_current(&mut self) {
        let shape = self.shapes[self.current.index()];
        let cell = shape.cell();
        if shape
            .cells_at(self.pos.x, self.pos.y)
            .all(|(x, y)| self.board.get(x, y) == cell)
        {
            self.board.clear(&shape, self.pos.x, self.pos.y);
        }
    }

    /// Take and clear the last settle event.
    pub fn take_last_event(&mut self) -> Option<SettleEvent> {
        self.last_event.take()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_kind(&self) -> ShapeKind {
        self.current
    }

    pub fn next_kind(&self) -> ShapeKind {
        self.next
    }

    /// Live (possibly rotated) current piece
    pub fn current_shape(&self) -> &Shape {
        &self.shapes[self.current.index()]
    }

    /// Next piece as it will spawn
    pub fn next_shape(&self) -> &Shape {
        &self.shapes[self.next.index()]
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Internal (scaled) score
    pub fn scaled_score(&self) -> i64 {
        self.score
    }

    /// Displayed score
    pub fn score(&self) -> i64 {
        unscaled(self.score)
    }

    pub fn stats(&self) -> &RoundStats {
        &self.stats
    }

    pub fn bias(&self) -> Bias {
        self.picker.bias()
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    pub fn scorer_mut(&mut self) -> &mut S {
        &mut self.scorer
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot_into(&self, out: &mut EngineSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.current = ShapeSnapshot::from_shape(self.current_shape(), Some(self.pos));
        out.next = ShapeSnapshot::from_shape(self.next_shape(), None);
        out.mode = self.mode.as_str();
        out.level = self.level;
        out.score = self.score();
        out.scaled_score = self.score;
        out.bias = self.picker.bias().encode();
        out.stats = self.stats;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let mut s = EngineSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}
