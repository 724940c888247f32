//! Bounded, most-recently-used filter history.
//!
//! The history backs the file-filter picker: the last used filter strings,
//! newest first, with case-insensitive deduplication and a fixed capacity.

/// Maximum number of filters retained in the history.
pub const MAX_FILTERS: usize = 20;

/// Ordered filter history, most-recently-used first.
///
/// No two entries compare equal case-insensitively. Inserting an existing
/// entry moves it to the front instead of duplicating it; inserting beyond
/// capacity evicts from the tail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterHistory {
    /// Entries, newest first.
    entries: Vec<String>,
}

impl FilterHistory {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuilds a history from persisted entries, oldest-last order
    /// preserved. The MRU/dedup/capacity rules are re-applied so a
    /// hand-edited settings file cannot violate the invariants.
    #[must_use]
    pub fn from_saved(saved: &[String]) -> Self {
        let mut history = Self::new();
        // Insert back-to-front so the first saved entry ends up newest.
        for entry in saved.iter().rev() {
            history.insert(entry);
        }
        history
    }

    /// Inserts a filter at the front, applying the MRU rules.
    ///
    /// Returns `true` if the stored list actually changed. Re-inserting
    /// the front entry with identical casing is a no-op.
    pub fn insert(&mut self, filter: &str) -> bool {
        let existing = self
            .entries
            .iter()
            .position(|entry| entry.eq_ignore_ascii_case(filter));

        if let Some(index) = existing {
            if index == 0 && self.entries[0] == filter {
                return false;
            }
            self.entries.remove(index);
        }

        self.entries.insert(0, filter.to_string());
        self.entries.truncate(MAX_FILTERS);
        true
    }

    /// Returns the entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_moves_existing_to_front() {
        let mut history = FilterHistory::new();
        history.insert("*.rs");
        history.insert("*.toml");
        assert_eq!(history.entries(), &["*.toml", "*.rs"]);

        let changed = history.insert("*.rs");
        assert!(changed);
        assert_eq!(history.entries(), &["*.rs", "*.toml"]);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_case_insensitive_dedup() {
        let mut history = FilterHistory::new();
        history.insert("*.RS");
        let changed = history.insert("*.rs");
        assert!(changed, "casing change replaces the stored entry");
        assert_eq!(history.entries(), &["*.rs"]);
    }

    #[test]
    fn test_reinsert_front_is_noop() {
        let mut history = FilterHistory::new();
        history.insert("*.rs");
        let changed = history.insert("*.rs");
        assert!(!changed);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_tail() {
        let mut history = FilterHistory::new();
        for i in 0..MAX_FILTERS + 5 {
            history.insert(&format!("*.ext{i}"));
        }
        assert_eq!(history.len(), MAX_FILTERS);
        assert_eq!(history.entries()[0], format!("*.ext{}", MAX_FILTERS + 4));
        // The oldest five fell off the tail.
        assert!(!history.entries().iter().any(|e| e == "*.ext0"));
        assert!(!history.entries().iter().any(|e| e == "*.ext4"));
    }

    #[test]
    fn test_from_saved_preserves_order() {
        let saved = vec!["*.rs".to_string(), "*.c".to_string(), "*.py".to_string()];
        let history = FilterHistory::from_saved(&saved);
        assert_eq!(history.entries(), &["*.rs", "*.c", "*.py"]);
    }

    #[test]
    fn test_from_saved_reapplies_dedup() {
        let saved = vec!["*.rs".to_string(), "*.RS".to_string(), "*.c".to_string()];
        let history = FilterHistory::from_saved(&saved);
        assert_eq!(history.entries(), &["*.rs", "*.c"]);
    }
}
