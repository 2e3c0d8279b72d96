//! Shared side-effect journal for mock devices.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// One recorded side effect.
#[derive(Debug, Clone)]
pub struct JournalEntry {
    /// When the effect was recorded.
    pub at: DateTime<Utc>,

    /// What happened, e.g. `"actuator engaged"`.
    pub label: String,
}

/// Append-only record of mock side effects, shared across devices.
///
/// Each mock output records a labelled entry when driven; because all mocks
/// wired into one test share the same journal, the entry order is the order
/// the core drove its sinks in.
///
/// # Examples
///
/// ```
/// use latchkey_hardware::mock::Journal;
///
/// let journal = Journal::new();
/// journal.record("actuator engaged");
/// journal.record("lamp lit");
///
/// assert_eq!(journal.labels(), vec!["actuator engaged", "lamp lit"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, label: impl Into<String>) {
        let entry = JournalEntry {
            at: Utc::now(),
            label: label.into(),
        };
        self.lock().push(entry);
    }

    /// Snapshot of all entries, oldest first.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.lock().clone()
    }

    /// Snapshot of just the labels, oldest first.
    pub fn labels(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.label.clone()).collect()
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discard all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JournalEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_records_in_order() {
        let journal = Journal::new();
        journal.record("first");
        journal.record("second");
        journal.record("third");

        assert_eq!(journal.labels(), vec!["first", "second", "third"]);
        assert_eq!(journal.len(), 3);
    }

    #[test]
    fn test_journal_clones_share_entries() {
        let journal = Journal::new();
        let clone = journal.clone();

        journal.record("from original");
        clone.record("from clone");

        assert_eq!(journal.labels(), clone.labels());
        assert_eq!(journal.len(), 2);
    }

    #[test]
    fn test_journal_clear() {
        let journal = Journal::new();
        journal.record("entry");
        assert!(!journal.is_empty());

        journal.clear();
        assert!(journal.is_empty());
    }
}
