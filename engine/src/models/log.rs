//! Action log
//!
//! Ordered, append-only trace of the actions the simulation triggered,
//! kept for display as a narrative of the run. Entries are only ever
//! appended; the log is cleared as a whole on full reset and at no other
//! time.

use serde::{Deserialize, Serialize};

/// One logged action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Index of the step that emitted the entry, or `None` for engine-level
    /// lines (reset, preset loads).
    pub step_index: Option<usize>,

    /// Human-readable description of what happened.
    pub message: String,
}

/// Append-only log of [`LogEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
    entries: Vec<LogEntry>,
}

impl ActionLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, step_index: Option<usize>, message: impl Into<String>) {
        self.entries.push(LogEntry {
            step_index,
            message: message.into(),
        });
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.message.clone()).collect()
    }

    /// Entries emitted by a specific step.
    pub fn entries_for_step(&self, step_index: usize) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.step_index == Some(step_index))
            .collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut log = ActionLog::new();
        assert!(log.is_empty());

        log.push(None, "reset");
        log.push(Some(1), "shock");
        log.push(Some(2), "rebalance");

        assert_eq!(log.len(), 3);
        assert_eq!(log.messages(), vec!["reset", "shock", "rebalance"]);
        assert_eq!(log.entries()[0].step_index, None);
        assert_eq!(log.entries()[2].step_index, Some(2));
    }

    #[test]
    fn test_entries_for_step() {
        let mut log = ActionLog::new();
        log.push(None, "reset");
        log.push(Some(1), "shock");
        log.push(Some(1), "aftershock");
        log.push(Some(3), "distribution");

        assert_eq!(log.entries_for_step(1).len(), 2);
        assert_eq!(log.entries_for_step(2).len(), 0);
        assert_eq!(log.entries_for_step(3)[0].message, "distribution");
    }

    #[test]
    fn test_clear() {
        let mut log = ActionLog::new();
        log.push(None, "reset");
        log.clear();
        assert!(log.is_empty());
    }
}
