use serde::{Deserialize, Serialize};

/// Coarse tag the extractor treats as a main verb.
pub const VERB_TAG: &str = "VERB";

/// Grammatical role of a token, resolved once from its dependency label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DepRole {
    Subject,
    Object,
    IndirectObject,
    Other,
}

impl DepRole {
    /// Classify a raw label from either the ClearNLP set (`nsubj`, `dobj`,
    /// `pobj`, `dative`) or Universal Dependencies (`nsubj:pass`, `obj`,
    /// `iobj`, `obl`, `obl:agent`). Temporal and bare-noun adjuncts
    /// (`obl:tmod`, `obl:npmod`) stay `Other`, like ClearNLP `npadvmod`.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();

        // iobj contains "obj", so indirect objects are checked first
        if label == "dative" || label == "iobj" || label.starts_with("iobj:") {
            DepRole::IndirectObject
        } else if label.contains("subj") {
            DepRole::Subject
        } else if label.contains("obj") || label == "obl" || label == "obl:agent" {
            DepRole::Object
        } else {
            DepRole::Other
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    pub text: String,
    pub lemma: String,
    pub pos: String,
    pub dep: String,
    pub role: DepRole,
}

impl Token {
    pub fn new(
        text: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
        dep: impl Into<String>,
    ) -> Self {
        let dep = dep.into();
        Self {
            text: text.into(),
            lemma: lemma.into(),
            pos: pos.into(),
            role: DepRole::classify(&dep),
            dep,
        }
    }

    pub fn is_verb(&self) -> bool {
        self.pos == VERB_TAG
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Sentence {
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Surface text joined by single spaces
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
