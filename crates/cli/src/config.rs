use anyhow::{Context, Result, bail};
use parse::ParserBackend;
use query::Question;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// CoNLL-U parses of the built-in questions, used by the `conllu` backend
const WHERE_DID_ALICE_GO: &str = "# text = Where did Alice go?
1\tWhere\twhere\tADV\tWRB\t_\t4\tadvmod\t_\t_
2\tdid\tdo\tAUX\tVBD\t_\t4\taux\t_\t_
3\tAlice\tAlice\tPROPN\tNNP\t_\t4\tnsubj\t_\t_
4\tgo\tgo\tVERB\tVB\t_\t0\troot\t_\t_
5\t?\t?\tPUNCT\t.\t_\t4\tpunct\t_\t_
";

const WHAT_DID_ALICE_SAY: &str = "# text = What did Alice say?
1\tWhat\twhat\tPRON\tWP\t_\t4\tobj\t_\t_
2\tdid\tdo\tAUX\tVBD\t_\t4\taux\t_\t_
3\tAlice\tAlice\tPROPN\tNNP\t_\t4\tnsubj\t_\t_
4\tsay\tsay\tVERB\tVB\t_\t0\troot\t_\t_
5\t?\t?\tPUNCT\t.\t_\t4\tpunct\t_\t_
";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: PathBuf,
    pub parser: ParserConfig,
    pub normalizer: NormalizerConfig,
    pub questions: Vec<Question>,
    pub cache: CacheConfig,
    pub plot: PlotConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub backend: ParserBackend,
    pub url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Extra lemma -> label collapses on top of the communication verbs
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub enabled: bool,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dot: Option<PathBuf>,
    pub graph_json: Option<PathBuf>,
    pub records: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("alice.txt"),
            parser: ParserConfig::default(),
            normalizer: NormalizerConfig::default(),
            questions: vec![
                Question::new("Where did Alice go?", "Alice", &["go"])
                    .with_annotation(WHERE_DID_ALICE_GO),
                Question::new("What did Alice say?", "Alice", &["say"])
                    .with_annotation(WHAT_DID_ALICE_SAY),
            ],
            cache: CacheConfig::default(),
            plot: PlotConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            backend: ParserBackend::CoreNlp,
            url: "http://localhost:9000".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 16 }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            output: PathBuf::from("graph.png"),
            width: 1200,
            height: 900,
            seed: 42,
        }
    }
}

impl AppConfig {
    /// Load a JSON config; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config: {:?}", path))?;
        serde_json::from_str(&raw).context(format!("Failed to parse config: {:?}", path))
    }

    /// The CoNLL-U backend cannot parse prose, so every question needs an
    /// annotation
    pub fn validate(&self) -> Result<()> {
        if self.parser.backend != ParserBackend::Conllu {
            return Ok(());
        }
        if let Some(question) = self.questions.iter().find(|q| q.annotation.is_none()) {
            bail!(
                "Question {:?} has no annotation, which the conllu backend requires",
                question.text
            );
        }
        Ok(())
    }
}
