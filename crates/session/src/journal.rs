//! Journal module - JSONL event log
//!
//! One JSON object per line, each carrying a sequence number and a
//! millisecond timestamp next to the event fields. Writing is best effort:
//! the first I/O failure is reported on stderr and the journal goes quiet.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::Serialize;

/// Why the level changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelReason {
    Lines,
    Manual,
    Page,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalEvent {
    Start {
        mode: &'static str,
        level: u32,
        seed: u32,
    },
    Settle {
        shape: &'static str,
        lines: u32,
        score: i64,
        total_lines: u32,
        efficiency: i32,
    },
    Level {
        level: u32,
        reason: LevelReason,
    },
    Challenge {
        level: u32,
        blocks: u32,
    },
    GameOver {
        score: i64,
        level: u32,
        lines: u32,
        pieces: u32,
    },
}

#[derive(Debug, Clone, Serialize)]
struct JournalRecord<'a> {
    seq: u64,
    ts: u64,
    #[serde(flatten)]
    event: &'a JournalEvent,
}

/// Line-delimited JSON sink
pub struct Journal {
    sink: Option<Box<dyn Write + Send>>,
    seq: u64,
    buf: Vec<u8>,
}

impl Journal {
    /// A journal that drops every event
    pub fn disabled() -> Self {
        Self {
            sink: None,
            seq: 0,
            buf: Vec::new(),
        }
    }

    /// Append to the file at `path`, creating it when missing
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file: File = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening journal {}", path.display()))?;
        Ok(Self::to_writer(BufWriter::new(file)))
    }

    pub fn to_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Some(Box::new(writer)),
            seq: 0,
            buf: Vec::with_capacity(256),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Events written so far
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn record(&mut self, event: &JournalEvent) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let record = JournalRecord {
            seq: self.seq + 1,
            ts: now_ms(),
            event,
        };
        self.buf.clear();
        if let Err(e) = serde_json::to_writer(&mut self.buf, &record) {
            eprintln!("[Session] journal event dropped: {}", e);
            return;
        }
        self.buf.push(b'\n');

        if let Err(e) = sink.write_all(&self.buf) {
            eprintln!("[Session] journal write failed, disabling: {}", e);
            self.sink = None;
            return;
        }
        self.seq += 1;
    }

    pub fn flush(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(e) = sink.flush() {
                eprintln!("[Session] journal flush failed: {}", e);
            }
        }
    }
}

impl Drop for Journal {
    fn drop(&mut self) {
        self.flush();
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("enabled", &self.is_enabled())
            .field("seq", &self.seq)
            .finish()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Writer that keeps its bytes reachable after being boxed
    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_records_are_json_lines() {
        let out = Shared::default();
        let mut journal = Journal::to_writer(out.clone());
        journal.record(&JournalEvent::Start {
            mode: "zen",
            level: 3,
            seed: 42,
        });
        journal.record(&JournalEvent::Level {
            level: 4,
            reason: LevelReason::Manual,
        });

        let text = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "start");
        assert_eq!(lines[0]["seq"], 1);
        assert_eq!(lines[0]["mode"], "zen");
        assert_eq!(lines[1]["type"], "level");
        assert_eq!(lines[1]["reason"], "manual");
        assert_eq!(journal.seq(), 2);
    }

    #[test]
    fn test_disabled_journal_counts_nothing() {
        let mut journal = Journal::disabled();
        journal.record(&JournalEvent::Challenge { level: 2, blocks: 30 });
        assert!(!journal.is_enabled());
        assert_eq!(journal.seq(), 0);
    }

    #[test]
    fn test_failed_write_disables_journal() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "gone"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut journal = Journal::to_writer(Broken);
        journal.record(&JournalEvent::Challenge { level: 1, blocks: 35 });
        assert!(!journal.is_enabled());
        // The lost record does not use up a sequence number
        assert_eq!(journal.seq(), 0);
    }

    #[test]
    fn test_seq_counts_only_written_records() {
        /// Accepts `budget` writes, then fails
        struct Flaky(u32);
        impl Write for Flaky {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                if self.0 == 0 {
                    return Err(std::io::Error::new(std::io::ErrorKind::Other, "full"));
                }
                self.0 -= 1;
                Ok(data.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut journal = Journal::to_writer(Flaky(2));
        for level in 1..=4 {
            journal.record(&JournalEvent::Level {
                level,
                reason: LevelReason::Lines,
            });
        }
        assert_eq!(journal.seq(), 2);
        assert!(!journal.is_enabled());
    }
}
