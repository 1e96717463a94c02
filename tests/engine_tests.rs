//! Engine integration tests - actions, settles, scoring and game over

use notint::core::{Engine, EngineConfig, ModeScorer, ScoreContext};
use notint::types::{
    scaled, Action, Evaluation, GameMode, EASY_SPAWN_MIN_X, EASY_SPAWN_SPREAD, FLOOR_ROW,
    SPAWN_X, SPAWN_Y,
};

fn engine(seed: u32) -> Engine {
    Engine::with_config(seed, ModeScorer::default(), EngineConfig::instant())
}

/// Rows the current piece can fall on an empty board
fn free_fall(engine: &Engine) -> i32 {
    let lowest = engine
        .current_shape()
        .blocks
        .iter()
        .map(|&(_, dy)| dy as i32)
        .max()
        .unwrap_or(0);
    FLOOR_ROW - lowest - SPAWN_Y
}

fn run_to_game_over(engine: &mut Engine) -> usize {
    for settles in 0..1_000 {
        engine.apply_action(Action::Drop);
        if engine.evaluate() == Evaluation::GameOver {
            return settles;
        }
    }
    panic!("stacking at the spawn column never ended the game");
}

#[test]
fn test_drop_returns_rows_descended() {
    for seed in 1..20 {
        let mut engine = engine(seed);
        let k = free_fall(&engine);
        assert!(engine.apply_action(Action::Drop));
        assert_eq!(engine.stats().drop_count, k);
        assert_eq!(engine.position().y, SPAWN_Y + k);
        // Already on the floor: the drop counts but covers no rows
        assert!(engine.apply_action(Action::Drop));
        assert_eq!(engine.stats().drop_count, k);
    }
}

#[test]
fn test_traditional_settle_score() {
    let mut engine = engine(31);
    engine.tweak_for_mode(4, GameMode::Traditional);
    let k = free_fall(&engine) as i64;

    engine.apply_action(Action::Drop);
    assert_eq!(engine.evaluate(), Evaluation::Settled);
    assert_eq!(engine.scaled_score(), scaled(4 * (k + 1)));
    assert_eq!(engine.score(), 4 * (k + 1));
}

#[test]
fn test_zen_scores_only_cleared_lines() {
    let mut engine = engine(32);
    engine.tweak_for_mode(3, GameMode::Zen);
    for _ in 0..3 {
        engine.apply_action(Action::Drop);
        assert_eq!(engine.evaluate(), Evaluation::Settled);
    }
    assert_eq!(engine.scaled_score(), 0);
}

#[test]
fn test_evaluator_runs_once_per_settle() {
    let mut calls = Vec::new();
    {
        let mut engine = Engine::with_config(
            5,
            |ctx: &ScoreContext<'_>| {
                calls.push(ctx.stats.drop_count);
                7
            },
            EngineConfig::instant(),
        );
        engine.tweak_for_mode(1, GameMode::Traditional);
        assert_eq!(engine.evaluate(), Evaluation::Falling);
        engine.apply_action(Action::Drop);
        assert_eq!(engine.evaluate(), Evaluation::Settled);
        assert_eq!(engine.evaluate(), Evaluation::Falling);
        assert_eq!(engine.scaled_score(), 7);
    }
    assert_eq!(calls.len(), 1);
    // The evaluator sees the drop before the counters are reset
    assert!(calls[0] > 0);
}

#[test]
fn test_gravity_settle_resets_counters() {
    let mut engine = engine(40);
    engine.apply_action(Action::MoveLeft);
    engine.apply_action(Action::Rotate);
    let outcome = loop {
        match engine.evaluate() {
            Evaluation::Falling => continue,
            other => break other,
        }
    };
    assert_eq!(outcome, Evaluation::Settled);
    let stats = engine.stats();
    assert_eq!((stats.moves, stats.rotations, stats.drop_count), (0, 0, 0));
    assert_eq!(engine.position(), notint::core::Position::new(SPAWN_X, SPAWN_Y));
}

#[test]
fn test_game_over_is_terminal() {
    let mut engine = engine(77);
    let settles = run_to_game_over(&mut engine);
    assert!(settles > 0);
    assert!(engine.is_game_over());

    let frozen = engine.snapshot();
    assert!(!frozen.playable());
    assert_eq!(engine.evaluate(), Evaluation::GameOver);
    for action in [Action::MoveLeft, Action::Rotate, Action::MoveRight, Action::Drop] {
        assert!(!engine.apply_action(action));
    }
    assert_eq!(engine.snapshot(), frozen);
}

#[test]
fn test_same_seed_same_game() {
    let script = [
        Action::MoveLeft,
        Action::Rotate,
        Action::Drop,
        Action::MoveRight,
        Action::MoveRight,
        Action::Drop,
    ];
    let play = |seed| {
        let mut engine = engine(seed);
        engine.tweak_for_mode(2, GameMode::Easy);
        for round in 0..30 {
            engine.apply_action(script[round % script.len()]);
            engine.evaluate();
        }
        engine.snapshot()
    };
    assert_eq!(play(123), play(123));
}

#[test]
fn test_easy_spawn_band() {
    let mut engine = engine(9);
    engine.tweak_for_mode(1, GameMode::Easy);
    let band = EASY_SPAWN_MIN_X..EASY_SPAWN_MIN_X + EASY_SPAWN_SPREAD as i32;
    let mut seen = std::collections::HashSet::new();
    for _ in 0..40 {
        // Spread pieces out so the stack stays low
        for _ in 0..seen.len() % 4 {
            engine.apply_action(Action::MoveLeft);
        }
        engine.apply_action(Action::Drop);
        if engine.evaluate() != Evaluation::Settled {
            break;
        }
        assert!(band.contains(&engine.position().x));
        seen.insert(engine.position().x);
    }
    assert!(seen.len() > 1, "spawn column never varied");
}

#[test]
fn test_challenge_setup() {
    let mut engine = engine(3);
    engine.tweak_for_mode(1, GameMode::Challenge);
    let stats = *engine.stats();
    assert_eq!(stats.challenge_start, 35);
    assert_eq!(stats.challenge_blocks_prev, 35);
    assert_eq!(engine.snapshot().stats, stats);
}

#[test]
fn test_snapshot_serializes() {
    let engine = engine(1);
    let json = serde_json::to_value(engine.snapshot()).unwrap();
    assert_eq!(json["mode"], "traditional");
    assert_eq!(json["level"], 1);
    assert_eq!(json["board"].as_array().map(|rows| rows.len()), Some(23));
    assert_eq!(json["current"]["x"], SPAWN_X);
    assert!(json["next"]["x"].is_null());
}
