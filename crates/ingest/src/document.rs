use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A source file held fully in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub doc_id: String,
    pub source: String,
    pub text: String,
}

impl Document {
    pub fn new(source: String, text: String) -> Self {
        let doc_id = generate_doc_id(&source);
        Self {
            doc_id,
            source,
            text,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Rough size used for logging only
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Generate a stable document ID from file path
pub fn generate_doc_id(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_is_stable() {
        let a = Document::new("alice.txt".to_string(), "one".to_string());
        let b = Document::new("alice.txt".to_string(), "two".to_string());

        assert_eq!(a.doc_id, b.doc_id);
        assert_eq!(a.doc_id.len(), 32);
        assert_ne!(a.doc_id, generate_doc_id("bob.txt"));
    }

    #[test]
    fn test_word_count() {
        let doc = Document::new("a.txt".to_string(), "Alice  went\nhome.".to_string());
        assert_eq!(doc.word_count(), 3);
        assert!(!doc.is_empty());
    }
}
