pub mod document;
pub mod reader;

pub use document::{Document, generate_doc_id};
pub use reader::FileReader;

use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Load a single file into memory
pub async fn load_document(file_path: &Path) -> Result<Document> {
    let text = FileReader::read_file(file_path).await?;
    let document = Document::new(file_path.to_string_lossy().to_string(), text);

    info!(
        source = %document.source,
        doc_id = %document.doc_id,
        words = document.word_count(),
        "Loaded document"
    );

    Ok(document)
}
