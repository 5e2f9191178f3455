use anyhow::Result;
use async_trait::async_trait;

use crate::SentenceParser;
use crate::token::{Sentence, Token};

const FIELD_COUNT: usize = 10;

// Column positions in a CoNLL-U token line
const ID: usize = 0;
const FORM: usize = 1;
const LEMMA: usize = 2;
const UPOS: usize = 3;
const DEPREL: usize = 7;

/// Reads text that was annotated offline into Universal Dependencies CoNLL-U.
#[derive(Debug, Clone, Default)]
pub struct ConlluParser;

impl ConlluParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_str(&self, input: &str) -> Result<Vec<Sentence>> {
        let mut sentences = Vec::new();
        let mut tokens = Vec::new();

        for (line_no, line) in input.lines().enumerate() {
            let line = line.trim_end_matches('\r');

            if line.trim().is_empty() {
                if !tokens.is_empty() {
                    sentences.push(Sentence::new(std::mem::take(&mut tokens)));
                }
                continue;
            }

            if line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != FIELD_COUNT {
                anyhow::bail!(
                    "Malformed CoNLL-U line {}: expected {} fields, found {}",
                    line_no + 1,
                    FIELD_COUNT,
                    fields.len()
                );
            }

            // Multiword ranges (1-2) and empty nodes (1.1) carry no syntax of their own
            let id = fields[ID];
            if id.contains('-') || id.contains('.') {
                continue;
            }

            tokens.push(Token::new(
                fields[FORM],
                fields[LEMMA],
                fields[UPOS],
                fields[DEPREL],
            ));
        }

        if !tokens.is_empty() {
            sentences.push(Sentence::new(tokens));
        }

        Ok(sentences)
    }
}

#[async_trait]
impl SentenceParser for ConlluParser {
    async fn parse(&self, text: &str) -> Result<Vec<Sentence>> {
        self.parse_str(text)
    }

    fn name(&self) -> &str {
        "conllu"
    }

    fn pre_annotated(&self) -> bool {
        true
    }
}
