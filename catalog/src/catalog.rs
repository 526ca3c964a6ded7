//! Exact-title summary lookup.

use std::collections::BTreeMap;

use shelfwise_vector_store::{Collection, TITLE_KEY};
use tracing::debug;

use crate::record::BookRecord;

/// Immutable map from book title to summary.
///
/// Lookups ignore case and surrounding whitespace. When two records share a
/// normalized title the later one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryCatalog {
    /// Normalized title to (display title, summary).
    entries: BTreeMap<String, (String, String)>,
}

/// Lookup key for a title.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

impl SummaryCatalog {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a BookRecord>) -> Self {
        let mut entries = BTreeMap::new();
        for record in records {
            let key = normalize_title(&record.title);
            if key.is_empty() {
                continue;
            }
            if entries
                .insert(key, (record.title.clone(), record.summary.clone()))
                .is_some()
            {
                debug!("Duplicate title in catalog: {}", record.title);
            }
        }
        Self { entries }
    }

    /// Build from an index collection: title from metadata, summary from
    /// the stored document. Entries without a title are skipped.
    pub fn from_collection(collection: &Collection) -> Self {
        let records: Vec<BookRecord> = collection
            .entries()
            .filter_map(|entry| {
                entry
                    .metadata
                    .get(TITLE_KEY)
                    .map(|title| BookRecord::new(title.as_str(), entry.document.as_str()))
            })
            .collect();
        Self::from_records(&records)
    }

    /// Summary for an exact (case-insensitive, trimmed) title.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.entries
            .get(&normalize_title(title))
            .map(|(_, summary)| summary.as_str())
    }

    pub fn contains(&self, title: &str) -> bool {
        self.entries.contains_key(&normalize_title(title))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display titles, ordered by normalized title.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(title, _)| title.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use shelfwise_vector_store::{IndexBuildInfo, IndexEntry};

    fn catalog() -> SummaryCatalog {
        SummaryCatalog::from_records(&[
            BookRecord::new("The Hobbit", "Bilbo goes there and back again."),
            BookRecord::new("1984", "Big Brother is watching."),
        ])
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let catalog = catalog();
        assert_eq!(
            catalog.get("  the HOBBIT "),
            Some("Bilbo goes there and back again.")
        );
        assert_eq!(catalog.get("1984"), Some("Big Brother is watching."));
        assert!(catalog.contains("THE hobbit"));
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = catalog();
        assert_eq!(catalog.get("Hobbit"), None);
        assert_eq!(catalog.get(""), None);
    }

    #[test]
    fn test_later_duplicate_wins() {
        let catalog = SummaryCatalog::from_records(&[
            BookRecord::new("Emma", "first"),
            BookRecord::new("EMMA ", "second"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("emma"), Some("second"));
        assert_eq!(catalog.titles().collect::<Vec<_>>(), ["EMMA "]);
    }

    #[test]
    fn test_from_collection_uses_title_metadata() {
        let mut collection = Collection::new("books", IndexBuildInfo::new("m", 1));
        collection
            .add(vec![
                IndexEntry::new("book-000", vec![1.0], "Spice and sand.")
                    .with_metadata(TITLE_KEY, "Dune"),
                IndexEntry::new("book-001", vec![1.0], "Untitled."),
            ])
            .unwrap();

        let catalog = SummaryCatalog::from_collection(&collection);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("dune"), Some("Spice and sand."));
    }
}
