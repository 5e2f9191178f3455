use serde::{Deserialize, Serialize};

/// Who did what to whom, for one sentence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ExtractionRecord {
    pub subjects: Vec<String>,
    pub verbs: Vec<String>,
    pub objects: Vec<String>,
    pub indirect_objects: Vec<String>,
}

impl ExtractionRecord {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
            && self.verbs.is_empty()
            && self.objects.is_empty()
            && self.indirect_objects.is_empty()
    }

    /// Number of edges this record contributes before duplicates collapse
    pub fn relation_count(&self) -> usize {
        self.subjects.len() * self.verbs.len() * (self.objects.len() + self.indirect_objects.len())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub doc_id: String,
    pub source: String,
    pub records: Vec<ExtractionRecord>,
}
