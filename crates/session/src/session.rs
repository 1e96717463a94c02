//! Session module - the game loop around one engine
//!
//! Owns the engine and everything the engine does not care about: level
//! progression between pieces, the manual level key, assistance toggles,
//! per-shape counts, and the event journal. A presentation layer feeds it
//! [`Command`]s; the headless binary does the same from stdin.

use notint_core::{Bias, Engine, ModeScorer, SimpleRng};
use notint_types::{
    unscaled, Command, Evaluation, GameMode, ShapeKind, LINES_PER_LEVEL, MAX_LEVEL, MIN_LEVEL,
    NUM_SHAPES,
};
use serde::Serialize;

use crate::config::SessionConfig;
use crate::journal::{Journal, JournalEvent, LevelReason};

/// Where the session stands after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Progress {
    Playing,
    GameOver,
    Quit,
}

impl Progress {
    pub fn is_finished(self) -> bool {
        self != Progress::Playing
    }
}

/// Pieces spawned per shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ShapeCounts {
    pub z: u32,
    pub s: u32,
    pub t: u32,
    pub o: u32,
    pub l: u32,
    pub j: u32,
    pub i: u32,
}

impl ShapeCounts {
    fn slot(&mut self, kind: ShapeKind) -> &mut u32 {
        match kind {
            ShapeKind::Z => &mut self.z,
            ShapeKind::S => &mut self.s,
            ShapeKind::T => &mut self.t,
            ShapeKind::O => &mut self.o,
            ShapeKind::L => &mut self.l,
            ShapeKind::J => &mut self.j,
            ShapeKind::I => &mut self.i,
        }
    }

    pub fn count(&mut self, kind: ShapeKind) {
        *self.slot(kind) += 1;
    }

    pub fn get(&self, kind: ShapeKind) -> u32 {
        let all: [u32; NUM_SHAPES] = [self.z, self.s, self.t, self.o, self.l, self.j, self.i];
        all[kind.index()]
    }

    pub fn total(&self) -> u32 {
        ShapeKind::ALL.iter().map(|&k| self.get(k)).sum()
    }
}

/// Final result handed to the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    /// Displayed (unscaled) score
    pub score: i64,
    pub mode: &'static str,
    pub level: u32,
    pub lines: u32,
    pub efficiency: i32,
    pub score_ratio: i64,
    pub pieces: u32,
    pub shapes: ShapeCounts,
    pub seed: u32,
    pub game_over: bool,
}

/// Mode-specific line of the status panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeStatus {
    Efficiency(i32),
    /// Preferred shape index and remaining biased draws
    Bias { preferred: usize, remaining: u32 },
    Blocks { challenge: u32, other: u32 },
    None,
}

#[derive(Debug)]
pub struct Session {
    engine: Engine<ModeScorer>,
    journal: Journal,
    shapes: ShapeCounts,
    seed: u32,
    progress: Progress,
}

impl Session {
    /// Start a game from configuration
    pub fn new(config: &SessionConfig, journal: Journal) -> Self {
        let seed = config.resolve_seed();
        let level = config.resolve_level(&mut SimpleRng::new(seed.rotate_left(16)));

        let mut engine = Engine::with_config(seed, ModeScorer::new(config.assists()), config.engine);
        engine.tweak_for_mode(level, config.mode);

        let mut shapes = ShapeCounts::default();
        shapes.count(engine.current_kind());

        let mut session = Self {
            engine,
            journal,
            shapes,
            seed,
            progress: Progress::Playing,
        };
        eprintln!(
            "[Session] {} game at level {} (seed {})",
            config.mode, level, seed
        );
        session.journal.record(&JournalEvent::Start {
            mode: config.mode.as_str(),
            level,
            seed,
        });
        if config.mode == GameMode::Challenge {
            session.record_page();
        }
        session
    }

    /// Start from `NOTINT_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = SessionConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
        let journal = match &config.log_path {
            Some(path) => Journal::open(path)?,
            None => Journal::disabled(),
        };
        Ok(Self::new(&config, journal))
    }

    /// Apply one command
    pub fn handle(&mut self, command: Command) -> Progress {
        if self.progress.is_finished() {
            return self.progress;
        }
        match command {
            Command::Act(action) => {
                self.engine.apply_action(action);
            }
            Command::Tick => return self.tick(),
            Command::ShowNext => self.engine.scorer_mut().assists.show_next = true,
            Command::ToggleDotted => {
                let assists = &mut self.engine.scorer_mut().assists;
                assists.dotted_lines = !assists.dotted_lines;
            }
            Command::LevelUp => {
                self.level_up();
            }
            Command::Quit => {
                eprintln!("[Session] quit at level {}", self.engine.level());
                self.progress = Progress::Quit;
            }
        }
        self.progress
    }

    /// Evaluate one tick
    pub fn tick(&mut self) -> Progress {
        if self.progress.is_finished() {
            return self.progress;
        }
        match self.engine.evaluate() {
            Evaluation::Falling => {}
            Evaluation::Settled => {
                self.record_settle();
                if matches!(self.engine.mode(), GameMode::Traditional | GameMode::Easy) {
                    self.raise_for_lines();
                }
                self.shapes.count(self.engine.current_kind());
            }
            Evaluation::GameOver => {
                self.record_settle();
                self.raise_for_lines();
                self.progress = Progress::GameOver;
                let summary = self.summary();
                eprintln!(
                    "[Session] game over: score {} level {} lines {}",
                    summary.score, summary.level, summary.lines
                );
                self.journal.record(&JournalEvent::GameOver {
                    score: summary.score,
                    level: summary.level,
                    lines: summary.lines,
                    pieces: summary.pieces,
                });
                self.journal.flush();
            }
        }
        self.progress
    }

    /// Manual level key: up to the cap, zen wraps around
    pub fn level_up(&mut self) -> bool {
        let level = self.engine.level();
        let next = if level < MAX_LEVEL {
            level + 1
        } else if self.engine.mode() == GameMode::Zen {
            MIN_LEVEL
        } else {
            return false;
        };
        self.engine.set_level(next);
        self.journal.record(&JournalEvent::Level {
            level: next,
            reason: LevelReason::Manual,
        });
        true
    }

    /// One level per `LINES_PER_LEVEL` lines, never past the cap
    fn raise_for_lines(&mut self) {
        let level = self.engine.level();
        if level < MAX_LEVEL && self.engine.stats().total_lines / LINES_PER_LEVEL > level {
            self.engine.set_level(level + 1);
            self.journal.record(&JournalEvent::Level {
                level: level + 1,
                reason: LevelReason::Lines,
            });
        }
    }

    fn record_settle(&mut self) {
        let Some(event) = self.engine.take_last_event() else {
            return;
        };
        let stats = *self.engine.stats();
        self.journal.record(&JournalEvent::Settle {
            shape: event.shape.as_str(),
            lines: event.lines_cleared,
            score: self.engine.score(),
            total_lines: stats.total_lines,
            efficiency: stats.efficiency,
        });
        if event.page_cleared {
            eprintln!(
                "[Session] challenge page cleared, now level {}",
                self.engine.level()
            );
            self.journal.record(&JournalEvent::Level {
                level: self.engine.level(),
                reason: LevelReason::Page,
            });
            self.record_page();
        }
    }

    fn record_page(&mut self) {
        self.journal.record(&JournalEvent::Challenge {
            level: self.engine.level(),
            blocks: self.engine.stats().challenge_start,
        });
    }

    pub fn engine(&self) -> &Engine<ModeScorer> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<ModeScorer> {
        &mut self.engine
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn shapes(&self) -> &ShapeCounts {
        &self.shapes
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Displayed score per piece played
    pub fn score_ratio(&self) -> i64 {
        match self.shapes.total() {
            0 => 0,
            pieces => unscaled(self.engine.scaled_score()) / i64::from(pieces),
        }
    }

    /// What the status panel shows under the shape counts
    pub fn mode_status(&self) -> ModeStatus {
        let stats = self.engine.stats();
        match self.engine.mode() {
            GameMode::Traditional => ModeStatus::Efficiency(stats.efficiency),
            GameMode::Easy => match self.engine.bias() {
                Bias::Lucky {
                    preferred,
                    remaining,
                } => ModeStatus::Bias {
                    preferred: preferred.index(),
                    remaining,
                },
                Bias::Disabled => ModeStatus::None,
            },
            GameMode::Challenge => ModeStatus::Blocks {
                challenge: stats.challenge_blocks,
                other: stats.non_challenge_blocks,
            },
            GameMode::Zen => ModeStatus::None,
        }
    }

    pub fn summary(&self) -> ScoreSummary {
        let stats = self.engine.stats();
        ScoreSummary {
            score: self.engine.score(),
            mode: self.engine.mode().as_str(),
            level: self.engine.level(),
            lines: stats.total_lines,
            efficiency: stats.efficiency,
            score_ratio: self.score_ratio(),
            pieces: self.shapes.total(),
            shapes: self.shapes,
            seed: self.seed,
            game_over: self.progress == Progress::GameOver,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notint_core::EngineConfig;
    use notint_types::Action;

    fn session(mode: GameMode, level: u32, seed: u32) -> Session {
        let config = SessionConfig {
            mode,
            level: Some(level),
            seed: Some(seed),
            engine: EngineConfig::instant(),
            ..Default::default()
        };
        Session::new(&config, Journal::disabled())
    }

    fn play_until_over(session: &mut Session) {
        for _ in 0..10_000 {
            session.handle(Command::Act(Action::Drop));
            if session.tick().is_finished() {
                return;
            }
        }
        panic!("game never ended");
    }

    #[test]
    fn test_first_piece_is_counted() {
        let s = session(GameMode::Traditional, 4, 1);
        assert_eq!(s.shapes().total(), 1);
        assert_eq!(s.shapes().get(s.engine().current_kind()), 1);
        assert_eq!(s.score_ratio(), 0);
    }

    #[test]
    fn test_manual_level_up_caps_at_nine() {
        let mut s = session(GameMode::Traditional, 8, 2);
        assert!(s.level_up());
        assert_eq!(s.engine().level(), 9);
        assert!(!s.level_up());
        assert_eq!(s.engine().level(), 9);
    }

    #[test]
    fn test_zen_level_wraps() {
        let mut s = session(GameMode::Zen, 7, 3);
        assert_eq!(s.engine().level(), 3);
        for _ in 0..6 {
            assert!(s.level_up());
        }
        assert_eq!(s.engine().level(), 9);
        assert!(s.level_up());
        assert_eq!(s.engine().level(), 1);
    }

    #[test]
    fn test_assist_commands() {
        let mut s = session(GameMode::Traditional, 1, 4);
        assert!(!s.engine().scorer().assists.show_next);
        s.handle(Command::ShowNext);
        s.handle(Command::ShowNext);
        assert!(s.engine().scorer().assists.show_next);
        s.handle(Command::ToggleDotted);
        assert!(s.engine().scorer().assists.dotted_lines);
        s.handle(Command::ToggleDotted);
        assert!(!s.engine().scorer().assists.dotted_lines);
    }

    #[test]
    fn test_easy_and_zen_force_show_next() {
        assert!(session(GameMode::Easy, 1, 5).engine().scorer().assists.show_next);
        assert!(session(GameMode::Zen, 1, 5).engine().scorer().assists.show_next);
    }

    #[test]
    fn test_quit_is_final() {
        let mut s = session(GameMode::Traditional, 2, 6);
        assert_eq!(s.handle(Command::Quit), Progress::Quit);
        assert_eq!(s.handle(Command::Tick), Progress::Quit);
        assert!(!s.summary().game_over);
    }

    #[test]
    fn test_game_over_summary() {
        let mut s = session(GameMode::Traditional, 5, 7);
        play_until_over(&mut s);
        assert_eq!(s.progress(), Progress::GameOver);

        let summary = s.summary();
        assert!(summary.game_over);
        assert_eq!(summary.mode, "traditional");
        // Every piece but the one that did not fit was counted
        assert!(summary.pieces > 1);
        assert_eq!(summary.score_ratio, summary.score / i64::from(summary.pieces));

        // Nothing changes after the end
        assert_eq!(s.handle(Command::LevelUp), Progress::GameOver);
        assert_eq!(s.summary(), summary);
    }

    #[test]
    fn test_mode_status() {
        let s = session(GameMode::Challenge, 3, 8);
        assert_eq!(
            s.mode_status(),
            ModeStatus::Blocks {
                challenge: 9,
                other: 0
            }
        );
        assert!(matches!(
            session(GameMode::Easy, 2, 8).mode_status(),
            ModeStatus::Bias { .. }
        ));
        assert_eq!(session(GameMode::Zen, 2, 8).mode_status(), ModeStatus::None);
    }
}
