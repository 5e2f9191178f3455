use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Extensions the reader accepts. `.conllu` holds text that was annotated offline.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md", "conllu"];

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        if !SUPPORTED_EXTENSIONS.contains(&extension) {
            anyhow::bail!("Unsupported file format: {:?}", path);
        }

        // read_to_string rejects invalid UTF-8, which is fatal for the run
        let content = fs::read_to_string(path)
            .await
            .context(format!("Failed to read file: {:?}", path))?;

        Ok(content)
    }
}
