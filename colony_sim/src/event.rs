// Narrative event log.
//
// Everything a player would want to read ("Serenity ate Simple Meal.",
// "Crash has died of starvation.") is emitted as a `LogEntry` with a
// severity. Each phase of a tick collects its entries into a plain `Vec`,
// the tick returns them in `StepResult`, and `SimState` keeps the most
// recent ones in a bounded `EventLog`.
//
// Diagnostics meant for developers go through `tracing` instead; the log
// here is game content.
//
// See also: `sim.rs` for where entries are merged, `snapshot.rs` which
// exposes the history to renderers.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub tick: u64,
    pub severity: Severity,
    pub message: String,
}

/// Collects entries for one phase of one tick.
#[derive(Debug)]
pub struct LogSink {
    tick: u64,
    entries: Vec<LogEntry>,
}

impl LogSink {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.entries.push(LogEntry {
            tick: self.tick,
            severity,
            message: message.into(),
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Severity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }
}

/// Bounded history of log entries, oldest first.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Append entries, dropping the oldest beyond capacity.
    pub fn extend(&mut self, new: impl IntoIterator<Item = LogEntry>) {
        self.entries.extend(new);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_stamps_tick_and_severity() {
        let mut sink = LogSink::new(7);
        sink.warning("could not find Wood in Chest");
        sink.success("finished constructing Wood Wall");
        let entries = sink.into_entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.tick == 7));
        assert_eq!(entries[0].severity, Severity::Warning);
        assert_eq!(entries[1].severity, Severity::Success);
    }

    #[test]
    fn history_keeps_only_the_newest() {
        let mut log = EventLog::new(3);
        log.extend((0..5).map(|i| LogEntry {
            tick: i,
            severity: Severity::Info,
            message: format!("entry {i}"),
        }));
        assert_eq!(log.len(), 3);
        let ticks: Vec<u64> = log.iter().map(|e| e.tick).collect();
        assert_eq!(ticks, vec![2, 3, 4]);
        assert_eq!(log.latest().map(|e| e.tick), Some(4));
    }
}
