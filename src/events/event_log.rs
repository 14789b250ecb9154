//! Event log files
//!
//! One file per session under `logs/`: JSON lines, each a `BusEvent`. The
//! first line is always a `SessionStart` carrying the session UUID.

use bevy::prelude::*;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::bus::BusEvent;
use super::types::GameEvent;
use crate::error::ConfigError;

/// Default directory for log files
pub const LOG_DIR: &str = "logs";

#[derive(Resource)]
pub struct EventLog {
    writer: Option<BufWriter<File>>,
    session_id: String,
    path: Option<PathBuf>,
    written: usize,
}

impl EventLog {
    /// A log that drops everything (bulk simulation, tests)
    pub fn disabled() -> Self {
        Self {
            writer: None,
            session_id: String::new(),
            path: None,
            written: 0,
        }
    }

    /// Open a new session file in `dir`
    pub fn create(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        let session_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now();
        let filename = format!("{}_{}.jsonl", now.format("%Y%m%d_%H%M%S"), &session_id[..8]);
        let path = dir.join(filename);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| ConfigError::Write {
                path: path.clone(),
                source,
            })?;

        let mut log = Self {
            writer: Some(BufWriter::new(file)),
            session_id: session_id.clone(),
            path: Some(path),
            written: 0,
        };
        log.write(&BusEvent {
            time_ms: 0,
            step: 0,
            event: GameEvent::SessionStart {
                session_id,
                timestamp: now.to_rfc3339(),
            },
        });
        info!("Event logging started (session: {})", &log.session_id[..8]);
        Ok(log)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }

    /// Number of events written this session
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn write(&mut self, event: &BusEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize event: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(writer, "{}", line) {
            warn!("Failed to write event: {}", e);
            return;
        }
        self.written += 1;
    }

    pub fn write_all<'a>(&mut self, events: impl IntoIterator<Item = &'a BusEvent>) {
        for event in events {
            self.write(event);
        }
    }

    pub fn flush(&mut self) {
        if let Some(writer) = &mut self.writer
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    /// Flush and close
    pub fn end_session(&mut self) {
        self.flush();
        self.writer = None;
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Read a session file back
pub fn read_event_log(path: impl AsRef<Path>) -> Result<Vec<BusEvent>, ConfigError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ConfigError::io(path, e))?;
    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| ConfigError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        events.push(serde_json::from_str(&line).map_err(|e| ConfigError::json(path, e))?);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ShotOutcome;

    #[test]
    fn test_session_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("penaltykick-log-{}", std::process::id()));
        let mut log = EventLog::create(&dir).unwrap();
        let session_id = log.session_id().to_string();
        log.write(&BusEvent {
            time_ms: 1200,
            step: 72,
            event: GameEvent::ShotResolved {
                outcome: ShotOutcome::Goal,
                ball: (0.5, 1.0, -2.5),
            },
        });
        let path = log.path().unwrap().to_path_buf();
        log.end_session();

        let events = read_event_log(&path).unwrap();
        assert_eq!(events.len(), 2);
        match &events[0].event {
            GameEvent::SessionStart { session_id: id, timestamp } => {
                assert_eq!(id, &session_id);
                assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
            }
            other => panic!("expected SessionStart, got {:?}", other),
        }
        assert_eq!(events[1].time_ms, 1200);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let mut log = EventLog::disabled();
        log.write(&BusEvent {
            time_ms: 0,
            step: 0,
            event: GameEvent::NewGame,
        });
        assert!(!log.is_active());
        assert_eq!(log.written(), 0);
    }
}
