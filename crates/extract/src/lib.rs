pub mod normalizer;
pub mod schema;

pub use normalizer::{COMMUNICATION_VERBS, SAY, VerbNormalizer};
pub use schema::{ExtractedDocument, ExtractionRecord};

use anyhow::{Context, Result};
use ingest::Document;
use parse::{DepRole, Sentence, SentenceParser};
use tracing::{debug, info};

/// Dependency-heuristic role labelling: buckets tokens into subjects, verbs,
/// objects and indirect objects.
pub struct Extractor {
    normalizer: VerbNormalizer,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(VerbNormalizer::new())
    }
}

impl Extractor {
    pub fn new(normalizer: VerbNormalizer) -> Self {
        Self { normalizer }
    }

    /// Extract one record from one sentence
    pub fn extract_sentence(&self, sentence: &Sentence) -> ExtractionRecord {
        let mut record = ExtractionRecord::default();

        for token in sentence {
            // The verb test is independent of the role test
            if token.is_verb() {
                record.verbs.push(self.normalizer.normalize(&token.lemma));
            }

            match token.role {
                DepRole::Subject => record.subjects.push(token.text.clone()),
                DepRole::Object => record.objects.push(token.text.clone()),
                DepRole::IndirectObject => record.indirect_objects.push(token.text.clone()),
                DepRole::Other => {}
            }
        }

        record
    }

    /// Parse text and extract a record per sentence, in sentence order
    pub async fn extract_text(
        &self,
        parser: &dyn SentenceParser,
        text: &str,
    ) -> Result<Vec<ExtractionRecord>> {
        let sentences = parser
            .parse(text)
            .await
            .context(format!("Failed to parse text with {}", parser.name()))?;

        let records: Vec<ExtractionRecord> = sentences
            .iter()
            .map(|sentence| {
                let record = self.extract_sentence(sentence);
                debug!(sentence = %sentence.text(), ?record, "Extracted sentence");
                record
            })
            .collect();

        Ok(records)
    }

    /// Extract a whole document
    pub async fn extract_document(
        &self,
        parser: &dyn SentenceParser,
        document: &Document,
    ) -> Result<ExtractedDocument> {
        let records = self.extract_text(parser, &document.text).await?;

        info!(
            doc_id = %document.doc_id,
            sentences = records.len(),
            relations = records.iter().map(ExtractionRecord::relation_count).sum::<usize>(),
            "Extracted relations"
        );

        Ok(ExtractedDocument {
            doc_id: document.doc_id.clone(),
            source: document.source.clone(),
            records,
        })
    }

    pub fn get_normalizer(&self) -> &VerbNormalizer {
        &self.normalizer
    }
}
