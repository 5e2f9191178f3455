use dashmap::DashMap;
use extract::ExtractionRecord;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

use crate::relation_graph::RelationGraph;

/// Built graphs keyed by a fingerprint of the records they came from.
#[derive(Clone)]
pub struct GraphCache {
    graphs: Arc<DashMap<String, Arc<RelationGraph>>>,
    max_entries: usize,
}

impl Default for GraphCache {
    fn default() -> Self {
        Self::new(16)
    }
}

impl GraphCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            graphs: Arc::new(DashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Return the cached graph for these records, building it on first use
    pub fn get_or_build(&self, records: &[ExtractionRecord]) -> Arc<RelationGraph> {
        let key = fingerprint(records);

        if let Some(graph) = self.graphs.get(&key) {
            debug!(fingerprint = %key, "Graph cache hit");
            return graph.value().clone();
        }

        if self.graphs.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .graphs
                .iter()
                .take((self.max_entries / 4).max(1))
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.graphs.remove(&key);
            }
        }

        let graph = Arc::new(RelationGraph::build(records));
        debug!(
            fingerprint = %key,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph built"
        );
        self.graphs.insert(key, graph.clone());
        graph
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn clear(&self) {
        self.graphs.clear();
    }
}

/// SHA-256 over the record sequence. Lengths are hashed ahead of each list so
/// that moving a word between buckets changes the digest.
pub fn fingerprint(records: &[ExtractionRecord]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((records.len() as u64).to_le_bytes());

    for record in records {
        for bucket in [
            &record.subjects,
            &record.verbs,
            &record.objects,
            &record.indirect_objects,
        ] {
            hasher.update((bucket.len() as u64).to_le_bytes());
            for item in bucket {
                hasher.update((item.len() as u64).to_le_bytes());
                hasher.update(item.as_bytes());
            }
        }
    }

    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(subject: &str, verb: &str, object: &str) -> ExtractionRecord {
        ExtractionRecord {
            subjects: vec![subject.to_string()],
            verbs: vec![verb.to_string()],
            objects: vec![object.to_string()],
            indirect_objects: Vec::new(),
        }
    }

    #[test]
    fn test_reuses_graph_for_same_records() {
        let cache = GraphCache::new(4);
        let records = vec![record("Alice", "go", "home")];

        let first = cache.get_or_build(&records);
        let second = cache.get_or_build(&records.clone());

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_records_rebuild() {
        let cache = GraphCache::new(4);
        let mut records = vec![record("Alice", "go", "home")];
        let first = cache.get_or_build(&records);

        records.push(record("Alice", "go", "garden"));
        let second = cache.get_or_build(&records);

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.targets("Alice", "go"), vec!["home", "garden"]);
    }

    #[test]
    fn test_fingerprint_separates_buckets() {
        let as_object = record("Alice", "say", "Bob");
        let as_indirect = ExtractionRecord {
            subjects: vec!["Alice".into()],
            verbs: vec!["say".into()],
            objects: Vec::new(),
            indirect_objects: vec!["Bob".into()],
        };

        assert_ne!(fingerprint(&[as_object]), fingerprint(&[as_indirect]));
        assert_eq!(fingerprint(&[]), fingerprint(&[]));
    }

    #[test]
    fn test_eviction_bounds_size() {
        let cache = GraphCache::new(4);
        for i in 0..10 {
            cache.get_or_build(&[record("Alice", "go", &format!("place{}", i))]);
        }

        assert!(cache.len() <= 4);
        cache.clear();
        assert!(cache.is_empty());
    }
}
