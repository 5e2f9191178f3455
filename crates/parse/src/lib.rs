pub mod conllu;
pub mod corenlp;
pub mod token;

pub use conllu::ConlluParser;
pub use corenlp::CoreNlpClient;
pub use token::{DepRole, Sentence, Token, VERB_TAG};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Turns raw text into sentences of annotated tokens.
#[async_trait]
pub trait SentenceParser: Send + Sync {
    async fn parse(&self, text: &str) -> Result<Vec<Sentence>>;

    /// Short backend name for logs
    fn name(&self) -> &str;

    /// True when the input must already carry token annotation (CoNLL-U)
    /// rather than plain prose
    fn pre_annotated(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParserBackend {
    CoreNlp,
    Conllu,
}

impl std::str::FromStr for ParserBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "corenlp" => Ok(ParserBackend::CoreNlp),
            "conllu" => Ok(ParserBackend::Conllu),
            other => anyhow::bail!("Unknown parser backend: {}", other),
        }
    }
}

impl std::fmt::Display for ParserBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserBackend::CoreNlp => write!(f, "corenlp"),
            ParserBackend::Conllu => write!(f, "conllu"),
        }
    }
}
