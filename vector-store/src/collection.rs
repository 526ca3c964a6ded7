//! In-memory cosine collection with JSON persistence.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use shelfwise_embeddings::{Embedding, cosine_distance};
use tracing::{debug, info};

use crate::error::{Result, VectorStoreError};
use crate::result::IndexQueryResult;

/// String metadata attached to each stored document.
pub type Metadata = BTreeMap<String, String>;

/// Metadata key holding a document's display title.
pub const TITLE_KEY: &str = "title";

/// Distance metric a collection is queried under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSpace {
    #[default]
    Cosine,
}

/// How a collection was built, recorded once at creation.
///
/// `embed_model` has no default: a collection file without it fails to load
/// rather than silently skipping the query-time model check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBuildInfo {
    #[serde(default)]
    pub space: DistanceSpace,

    /// Embedding model that produced the stored vectors.
    pub embed_model: String,

    /// Length of every stored vector.
    pub dimension: usize,
}

impl IndexBuildInfo {
    pub fn new(embed_model: impl Into<String>, dimension: usize) -> Self {
        Self {
            space: DistanceSpace::Cosine,
            embed_model: embed_model.into(),
            dimension,
        }
    }
}

/// A stored document with its vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Unique identifier.
    pub id: String,

    pub embedding: Embedding,

    /// Text that was embedded.
    pub document: String,

    #[serde(default)]
    pub metadata: Metadata,
}

impl IndexEntry {
    pub fn new(id: impl Into<String>, embedding: Embedding, document: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            embedding,
            document: document.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Zip parallel columns into entries, rejecting ragged input.
    pub fn from_columns(
        ids: Vec<String>,
        embeddings: Vec<Embedding>,
        documents: Vec<String>,
        metadatas: Vec<Metadata>,
    ) -> Result<Vec<Self>> {
        let n = ids.len();
        if embeddings.len() != n || documents.len() != n || metadatas.len() != n {
            return Err(VectorStoreError::LengthMismatch {
                ids: n,
                documents: documents.len(),
                embeddings: embeddings.len(),
                metadatas: metadatas.len(),
            });
        }

        Ok(ids
            .into_iter()
            .zip(embeddings)
            .zip(documents)
            .zip(metadatas)
            .map(|(((id, embedding), document), metadata)| Self {
                id,
                embedding,
                document,
                metadata,
            })
            .collect())
    }
}

/// On-disk layout of a collection.
#[derive(Serialize, Deserialize)]
struct CollectionFile {
    name: String,
    build_info: IndexBuildInfo,
    entries: Vec<IndexEntry>,
}

/// A named set of documents searchable by cosine distance.
///
/// Entries keep insertion order, which is also the tie-break order for
/// equal distances.
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    build_info: IndexBuildInfo,
    entries: IndexMap<String, IndexEntry>,
}

impl Collection {
    pub fn new(name: impl Into<String>, build_info: IndexBuildInfo) -> Self {
        Self {
            name: name.into(),
            build_info,
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn build_info(&self) -> &IndexBuildInfo {
        &self.build_info
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.entries.get(id)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.build_info.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.build_info.dimension,
                actual,
            });
        }
        Ok(())
    }

    /// Insert new entries. Nothing is inserted if any id is already present
    /// (in the collection or earlier in the batch) or any vector has the
    /// wrong dimension.
    pub fn add(&mut self, entries: Vec<IndexEntry>) -> Result<()> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            self.check_dimension(entry.embedding.len())?;
            if self.entries.contains_key(&entry.id) || !seen.insert(entry.id.as_str()) {
                return Err(VectorStoreError::DuplicateId(entry.id.clone()));
            }
        }

        let added = entries.len();
        for entry in entries {
            self.entries.insert(entry.id.clone(), entry);
        }
        debug!("Added {added} entries to collection {}", self.name);
        Ok(())
    }

    /// Insert or replace entries. A replaced entry keeps its position.
    pub fn upsert(&mut self, entries: Vec<IndexEntry>) -> Result<()> {
        for entry in &entries {
            self.check_dimension(entry.embedding.len())?;
        }

        for entry in entries {
            self.entries.insert(entry.id.clone(), entry);
        }
        Ok(())
    }

    /// The `n_results` nearest entries to `vector`, ascending by cosine
    /// distance.
    pub fn query(&self, vector: &[f32], n_results: usize) -> Result<IndexQueryResult> {
        self.check_dimension(vector.len())?;

        let mut scored = Vec::with_capacity(self.entries.len());
        for entry in self.entries.values() {
            let distance = cosine_distance(vector, &entry.embedding)?;
            scored.push((distance, entry));
        }
        // Stable sort keeps insertion order among equal distances.
        scored.sort_by_key(|(distance, _)| OrderedFloat(*distance));
        scored.truncate(n_results);

        debug!(
            "Query on {} returned {} of {} entries",
            self.name,
            scored.len(),
            self.entries.len()
        );

        let mut result = IndexQueryResult::default();
        for (distance, entry) in scored {
            result.push(
                entry.id.clone(),
                entry.document.clone(),
                entry.metadata.clone(),
                distance,
            );
        }
        Ok(result)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        let file = CollectionFile {
            name: self.name.clone(),
            build_info: self.build_info.clone(),
            entries: self.entries.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Parse a collection previously written by [`Collection::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CollectionFile = serde_json::from_str(json)?;
        let mut collection = Self::new(file.name, file.build_info);
        collection.add(file.entries)?;
        Ok(collection)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| VectorStoreError::io(parent, e))?;
        }

        // Write atomically
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json)
            .await
            .map_err(|e| VectorStoreError::io(&temp_path, e))?;
        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e| VectorStoreError::io(path, e))?;

        info!(
            "Saved collection {} ({} entries) to {}",
            self.name,
            self.count(),
            path.display()
        );
        Ok(())
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| VectorStoreError::io(path, e))?;
        let collection = Self::from_json(&json)?;

        info!(
            "Loaded collection {} ({} entries, model {})",
            collection.name,
            collection.count(),
            collection.build_info.embed_model
        );
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collection() -> Collection {
        let mut collection = Collection::new("books", IndexBuildInfo::new("test-model", 3));
        collection
            .add(vec![
                IndexEntry::new("a", vec![1.0, 0.0, 0.0], "alpha"),
                IndexEntry::new("b", vec![0.0, 1.0, 0.0], "beta"),
                IndexEntry::new("c", vec![0.7, 0.7, 0.0], "gamma").with_metadata("title", "C"),
            ])
            .unwrap();
        collection
    }

    #[test]
    fn test_query_orders_by_distance() {
        let result = collection().query(&[1.0, 0.0, 0.0], 10).unwrap();

        assert_eq!(result.ids(), ["a", "c", "b"]);
        assert_eq!(result.documents(), ["alpha", "gamma", "beta"]);
        assert!(result.distances()[0] < 1e-6);
        assert!((result.distances()[2] - 1.0).abs() < 1e-6);
        assert_eq!(result.metadatas()[1].get("title").map(String::as_str), Some("C"));
    }

    #[test]
    fn test_query_truncates_to_n() {
        let c = collection();
        assert_eq!(c.query(&[1.0, 0.0, 0.0], 1).unwrap().ids(), ["a"]);
        assert!(c.query(&[1.0, 0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut c = Collection::new("ties", IndexBuildInfo::new("m", 2));
        c.add(vec![
            IndexEntry::new("first", vec![0.0, 1.0], "x"),
            IndexEntry::new("second", vec![0.0, 2.0], "y"),
        ])
        .unwrap();

        let result = c.query(&[0.0, 1.0], 2).unwrap();
        assert_eq!(result.ids(), ["first", "second"]);
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut c = collection();
        let err = c
            .add(vec![
                IndexEntry::new("d", vec![0.0, 0.0, 1.0], "delta"),
                IndexEntry::new("a", vec![1.0, 0.0, 0.0], "again"),
            ])
            .unwrap_err();

        assert!(matches!(err, VectorStoreError::DuplicateId(id) if id == "a"));
        assert_eq!(c.count(), 3);
        assert!(c.get("d").is_none());
    }

    #[test]
    fn test_add_rejects_duplicates_within_batch() {
        let mut c = Collection::new("dups", IndexBuildInfo::new("m", 1));
        let err = c
            .add(vec![
                IndexEntry::new("x", vec![1.0], "one"),
                IndexEntry::new("x", vec![1.0], "two"),
            ])
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::DuplicateId(_)));
        assert!(c.is_empty());
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut c = collection();
        c.upsert(vec![IndexEntry::new("a", vec![0.0, 1.0, 0.0], "alpha v2")])
            .unwrap();

        assert_eq!(c.count(), 3);
        assert_eq!(c.get("a").unwrap().document, "alpha v2");
        let ids: Vec<&str> = c.entries().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut c = collection();
        assert!(matches!(
            c.add(vec![IndexEntry::new("bad", vec![1.0], "x")]),
            Err(VectorStoreError::DimensionMismatch {
                expected: 3,
                actual: 1
            })
        ));
        assert!(matches!(
            c.query(&[1.0, 0.0], 1),
            Err(VectorStoreError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_from_columns_rejects_ragged_input() {
        let err = IndexEntry::from_columns(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![1.0]],
            vec!["x".to_string(), "y".to_string()],
            vec![Metadata::new(), Metadata::new()],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            VectorStoreError::LengthMismatch {
                ids: 2,
                embeddings: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_json_requires_embed_model() {
        let json = r#"{"name":"books","build_info":{"space":"cosine","dimension":3},"entries":[]}"#;
        assert!(matches!(
            Collection::from_json(json),
            Err(VectorStoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let original = collection();
        let restored = Collection::from_json(&original.to_json().unwrap()).unwrap();

        assert_eq!(restored.name(), "books");
        assert_eq!(restored.build_info(), original.build_info());
        let original_entries: Vec<_> = original.entries().cloned().collect();
        let restored_entries: Vec<_> = restored.entries().cloned().collect();
        assert_eq!(restored_entries, original_entries);
    }
}
