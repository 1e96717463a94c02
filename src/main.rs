//! Headless runner (default binary).
//!
//! Plays one game configured from `NOTINT_*` environment variables. Reads
//! one command per line on stdin (`left`, `rotate`, `right`, `drop`, `tick`,
//! `next`, `dotted`, `up`, `quit`, or their one-letter keys), and prints the
//! final score summary as JSON on stdout when the game ends, the player
//! quits, or input runs out.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use notint::session::{Progress, Session};
use notint::types::Command;

fn main() -> Result<()> {
    let mut session = Session::from_env().context("starting session")?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading commands")?;
        let word = line.trim();
        if word.is_empty() || word.starts_with('#') {
            continue;
        }
        let Some(command) = Command::from_str(word) else {
            eprintln!("[Session] unknown command: {}", word);
            continue;
        };
        if session.handle(command) != Progress::Playing {
            break;
        }
    }

    let summary = session.summary();
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, &summary).context("writing summary")?;
    writeln!(out)?;
    Ok(())
}
