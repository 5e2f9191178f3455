use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::SentenceParser;
use crate::token::{Sentence, Token, VERB_TAG};

const ANNOTATORS: &str = "tokenize,ssplit,pos,lemma,depparse";

// Dependency labels whose verb-tagged tokens are auxiliaries, not actions
const AUXILIARY_DEPS: &[&str] = &["aux", "aux:pass", "auxpass", "cop"];

/// Client for a Stanford CoreNLP server.
#[derive(Clone)]
pub struct CoreNlpClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct CoreNlpDocument {
    sentences: Vec<CoreNlpSentence>,
}

#[derive(Deserialize)]
struct CoreNlpSentence {
    tokens: Vec<CoreNlpToken>,
    #[serde(rename = "basicDependencies", default)]
    basic_dependencies: Vec<CoreNlpDependency>,
}

#[derive(Deserialize)]
struct CoreNlpToken {
    index: usize,
    word: String,
    lemma: String,
    pos: String,
}

#[derive(Deserialize)]
struct CoreNlpDependency {
    dep: String,
    dependent: usize,
}

impl CoreNlpClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn annotate(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/", self.base_url))
            .query(&[("properties", annotation_properties())])
            .body(text.to_string())
            .send()
            .await
            .context("Failed to send request to CoreNLP")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("CoreNLP request failed: {} {}", status, error_text);
        }

        response
            .text()
            .await
            .context("Failed to read CoreNLP response")
    }
}

/// Value of the `properties` query parameter sent with every request
fn annotation_properties() -> String {
    serde_json::json!({
        "annotators": ANNOTATORS,
        "outputFormat": "json",
    })
    .to_string()
}

#[async_trait]
impl SentenceParser for CoreNlpClient {
    async fn parse(&self, text: &str) -> Result<Vec<Sentence>> {
        let body = self.annotate(text).await?;
        let sentences = sentences_from_json(&body)?;
        debug!(sentences = sentences.len(), "CoreNLP annotation received");
        Ok(sentences)
    }

    fn name(&self) -> &str {
        "corenlp"
    }
}

/// Convert a CoreNLP JSON document into sentences.
pub fn sentences_from_json(body: &str) -> Result<Vec<Sentence>> {
    let document: CoreNlpDocument =
        serde_json::from_str(body).context("Failed to parse CoreNLP response")?;

    Ok(document
        .sentences
        .into_iter()
        .map(CoreNlpSentence::into_sentence)
        .collect())
}

impl CoreNlpSentence {
    fn into_sentence(self) -> Sentence {
        let deps: HashMap<usize, String> = self
            .basic_dependencies
            .into_iter()
            .map(|d| (d.dependent, d.dep))
            .collect();

        let tokens = self
            .tokens
            .into_iter()
            .map(|t| {
                let dep = deps.get(&t.index).cloned().unwrap_or_default();
                let pos = coarse_tag(&t.pos, &dep);
                Token::new(t.word, t.lemma, pos, dep)
            })
            .collect();

        Sentence::new(tokens)
    }
}

/// Map a Penn Treebank tag onto the coarse verb/auxiliary split.
fn coarse_tag(ptb: &str, dep: &str) -> String {
    if !ptb.starts_with("VB") {
        return ptb.to_string();
    }

    if AUXILIARY_DEPS.contains(&dep) {
        "AUX".to_string()
    } else {
        VERB_TAG.to_string()
    }
}
