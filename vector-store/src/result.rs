//! Column-oriented nearest-neighbor results.

use serde::Serialize;

use crate::collection::Metadata;

/// Neighbors of a query vector as four index-aligned columns, ascending by
/// distance.
///
/// Columns can only grow together, so row `i` of every column always
/// describes the same document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndexQueryResult {
    ids: Vec<String>,
    documents: Vec<String>,
    metadatas: Vec<Metadata>,
    distances: Vec<f32>,
}

impl IndexQueryResult {
    /// Append one row.
    pub fn push(&mut self, id: String, document: String, metadata: Metadata, distance: f32) {
        self.ids.push(id);
        self.documents.push(document);
        self.metadatas.push(metadata);
        self.distances.push(distance);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn metadatas(&self) -> &[Metadata] {
        &self.metadatas
    }

    pub fn distances(&self) -> &[f32] {
        &self.distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_columns_aligned() {
        let mut result = IndexQueryResult::default();
        result.push("a".to_string(), "doc".to_string(), Metadata::new(), 0.2);
        result.push("b".to_string(), "doc".to_string(), Metadata::new(), 0.4);

        assert_eq!(result.len(), 2);
        assert_eq!(result.ids(), ["a", "b"]);
        assert_eq!(result.documents().len(), 2);
        assert_eq!(result.metadatas().len(), 2);
        assert_eq!(result.distances(), [0.2, 0.4]);
    }
}
