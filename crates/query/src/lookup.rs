use extract::ExtractionRecord;
use graph::{GraphCache, RelationGraph};
use std::sync::Arc;

/// Answers "what does `subject` reach over `verb`".
pub trait RelationLookup {
    fn related(&self, subject: &str, verb: &str) -> Vec<String>;
}

/// Build a graph from `records` and return every target reachable from
/// `subject` over an edge labelled exactly `verb`.
pub fn query(records: &[ExtractionRecord], subject: &str, verb: &str) -> Vec<String> {
    RelationGraph::build(records).targets(subject, verb)
}

/// The accumulated records of a run, with the built graph cached.
pub struct RelationStore {
    records: Vec<ExtractionRecord>,
    cache: GraphCache,
}

impl RelationStore {
    pub fn new(records: Vec<ExtractionRecord>) -> Self {
        Self::with_cache(records, GraphCache::default())
    }

    pub fn with_cache(records: Vec<ExtractionRecord>, cache: GraphCache) -> Self {
        Self { records, cache }
    }

    pub fn push(&mut self, record: ExtractionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ExtractionRecord] {
        &self.records
    }

    pub fn graph(&self) -> Arc<RelationGraph> {
        self.cache.get_or_build(&self.records)
    }
}

impl RelationLookup for RelationStore {
    fn related(&self, subject: &str, verb: &str) -> Vec<String> {
        self.graph().targets(subject, verb)
    }
}
