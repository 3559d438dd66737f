//! Deduplication store for already-reported ads.

use crate::models::{AdIdentity, AdRecord};
use std::collections::HashSet;

/// Remembers which ads have already been reported.
///
/// Keys are the field-based identity tuples, so membership and insert stay
/// O(1) amortized well past tens of thousands of entries. The set only grows
/// for the process lifetime and lives in memory only; after a restart the
/// whole catalog is re-reported through the initial snapshot instead of as
/// "new" ads.
#[derive(Debug, Default)]
pub struct SeenSet {
    keys: HashSet<AdIdentity>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, record: &AdRecord) -> bool {
        self.keys.contains(&record.identity())
    }

    /// Insert the record's identity. Returns `true` when it was not seen
    /// before, which is what gates at-most-once notification.
    pub fn add(&mut self, record: &AdRecord) -> bool {
        self.keys.insert(record.identity())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Used only to roll back a failed engine start.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn add_reports_first_insert_only() {
        let mut seen = SeenSet::new();
        let record = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/1");
        assert!(!seen.contains(&record));
        assert!(seen.add(&record));
        assert!(seen.contains(&record));
        assert!(!seen.add(&record));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn non_identity_fields_do_not_create_new_entries() {
        let mut seen = SeenSet::new();
        let mut a = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/1");
        a.floor_area = Decimal::from(45);
        let mut b = a.clone();
        b.floor_area = Decimal::from(50);
        b.image_url = Some("https://example.com/other.jpg".to_string());

        assert!(seen.add(&a));
        assert!(!seen.add(&b));
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn different_url_is_a_distinct_entry() {
        let mut seen = SeenSet::new();
        let a = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/1");
        let b = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/2");
        assert!(seen.add(&a));
        assert!(seen.add(&b));
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut seen = SeenSet::new();
        let record = AdRecord::new("sreality", "Prodej bytu 2+kk", "https://example.com/1");
        seen.add(&record);
        seen.clear();
        assert!(seen.is_empty());
        assert!(seen.add(&record));
    }
}
