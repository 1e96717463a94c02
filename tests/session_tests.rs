//! Session integration tests - commands, level progression and the journal

use std::collections::HashMap;
use std::fs;

use notint::core::EngineConfig;
use notint::session::{Journal, Progress, Session, SessionConfig};
use notint::types::{Action, Command, GameMode};

fn config(mode: GameMode, level: u32, seed: u32) -> SessionConfig {
    SessionConfig {
        mode,
        level: Some(level),
        seed: Some(seed),
        engine: EngineConfig::instant(),
        ..Default::default()
    }
}

fn drive(session: &mut Session, script: &str) -> Progress {
    let mut progress = session.progress();
    for word in script.split_whitespace() {
        let command = Command::from_str(word).unwrap_or_else(|| panic!("bad command {}", word));
        progress = session.handle(command);
        if progress.is_finished() {
            break;
        }
    }
    progress
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("NOTINT_MODE", "easy"),
        ("NOTINT_LEVEL", "4"),
        ("NOTINT_SEED", "1234"),
    ]
    .into_iter()
    .collect();
    let config = SessionConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();

    let session = Session::new(&config, Journal::disabled());
    assert_eq!(session.engine().mode(), GameMode::Easy);
    assert_eq!(session.engine().level(), 4);
    assert_eq!(session.seed(), 1234);
    assert!(session.engine().scorer().assists.show_next);
}

#[test]
fn test_textual_commands_drive_the_engine() {
    let mut session = Session::new(&config(GameMode::Traditional, 2, 10), Journal::disabled());
    let x = session.engine().position().x;

    drive(&mut session, "j j l");
    assert_eq!(session.engine().position().x, x - 1);
    assert_eq!(session.engine().stats().moves, 3);

    assert_eq!(drive(&mut session, "drop tick"), Progress::Playing);
    assert_eq!(session.shapes().total(), 2);
    assert!(session.summary().score > 0);
}

#[test]
fn test_stacking_ends_in_game_over() {
    let mut session = Session::new(&config(GameMode::Zen, 1, 11), Journal::disabled());
    let script = "drop tick ".repeat(500);
    assert_eq!(drive(&mut session, &script), Progress::GameOver);

    let summary = session.summary();
    assert!(summary.game_over);
    assert_eq!(summary.mode, "zen");
    assert_eq!(summary.level, 3);
    assert_eq!(summary.score, 0);
    assert_eq!(summary.pieces, session.shapes().total());
}

#[test]
fn test_quit_stops_processing() {
    let mut session = Session::new(&config(GameMode::Challenge, 12, 12), Journal::disabled());
    assert_eq!(drive(&mut session, "up q drop tick"), Progress::Quit);
    // Level 12 is above the manual cap, so "up" was refused
    assert_eq!(session.engine().level(), 12);
    assert_eq!(session.engine().stats().drop_count, 0);
}

#[test]
fn test_journal_file() {
    let path = std::env::temp_dir().join(format!("notint-journal-{}.jsonl", std::process::id()));
    let _ = fs::remove_file(&path);
    {
        let journal = Journal::open(&path).unwrap();
        let mut session = Session::new(&config(GameMode::Challenge, 3, 13), journal);
        drive(&mut session, &"drop tick ".repeat(500));
    }

    let text = fs::read_to_string(&path).unwrap();
    let _ = fs::remove_file(&path);
    let events: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(events[0]["type"], "start");
    assert_eq!(events[0]["mode"], "challenge");
    assert_eq!(events[1]["type"], "challenge");
    assert_eq!(events[1]["blocks"], 9);
    assert!(events.iter().any(|e| e["type"] == "settle"));
    assert_eq!(events.last().map(|e| e["type"].clone()), Some("game_over".into()));
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["seq"], i as u64 + 1);
    }
}

#[test]
fn test_actions_after_game_over_are_ignored() {
    let mut session = Session::new(&config(GameMode::Traditional, 1, 14), Journal::disabled());
    drive(&mut session, &"drop tick ".repeat(500));
    let summary = session.summary();
    assert_eq!(session.handle(Command::Act(Action::MoveLeft)), Progress::GameOver);
    assert_eq!(session.summary(), summary);
}
