use anyhow::{Context, Result, bail};
use extract::VerbNormalizer;
use parse::{Sentence, SentenceParser, Token};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::lookup::RelationLookup;

/// A fixed natural-language question about one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub text: String,
    /// Graph node the lookup starts from
    pub subject: String,
    /// Verb labels that trigger a lookup
    pub actions: Vec<String>,
    /// CoNLL-U parse of `text`, read instead of `text` by pre-annotated
    /// parsers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl Question {
    pub fn new(text: impl Into<String>, subject: impl Into<String>, actions: &[&str]) -> Self {
        Self {
            text: text.into(),
            subject: subject.into(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
            annotation: None,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    pub question: String,
    pub subject: String,
    pub verb: String,
    pub targets: Vec<String>,
}

/// Parses a question, finds its first recognised action verb and runs one
/// graph lookup for it.
pub struct QueryDriver {
    parser: Arc<dyn SentenceParser>,
    normalizer: VerbNormalizer,
}

impl QueryDriver {
    pub fn new(parser: Arc<dyn SentenceParser>, normalizer: VerbNormalizer) -> Self {
        Self { parser, normalizer }
    }

    /// Normalized label for verb tokens, `None` for everything else
    pub fn is_action_verb(&self, token: &Token) -> Option<String> {
        if token.is_verb() {
            Some(self.normalizer.normalize(&token.lemma))
        } else {
            None
        }
    }

    /// First token, in order, whose action label is one of `actions`
    pub fn find_action(&self, sentences: &[Sentence], actions: &[String]) -> Option<String> {
        sentences
            .iter()
            .flat_map(|sentence| sentence.iter())
            .filter_map(|token| self.is_action_verb(token))
            .find(|label| actions.contains(label))
    }

    /// Text handed to the parser: the annotation for pre-annotated parsers,
    /// the plain question otherwise
    pub fn parser_input<'a>(&self, question: &'a Question) -> Result<&'a str> {
        if !self.parser.pre_annotated() {
            return Ok(question.text.as_str());
        }
        match &question.annotation {
            Some(annotation) => Ok(annotation.as_str()),
            None => bail!(
                "Question {:?} has no annotation, which the {} parser requires",
                question.text,
                self.parser.name()
            ),
        }
    }

    /// `Ok(None)` when the question holds no recognised action
    pub async fn ask(
        &self,
        lookup: &dyn RelationLookup,
        question: &Question,
    ) -> Result<Option<Answer>> {
        let input = self.parser_input(question)?;
        let sentences = self
            .parser
            .parse(input)
            .await
            .context(format!("Failed to parse question: {}", question.text))?;

        let Some(verb) = self.find_action(&sentences, &question.actions) else {
            debug!(question = %question.text, "No recognised action verb");
            return Ok(None);
        };

        let targets = lookup.related(&question.subject, &verb);
        info!(
            question = %question.text,
            subject = %question.subject,
            verb = %verb,
            matches = targets.len(),
            "Answered question"
        );

        Ok(Some(Answer {
            question: question.text.clone(),
            subject: question.subject.clone(),
            verb,
            targets,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Returns canned parses keyed by input text
    struct CannedParser {
        parses: HashMap<String, Vec<Sentence>>,
        pre_annotated: bool,
    }

    #[async_trait]
    impl SentenceParser for CannedParser {
        async fn parse(&self, text: &str) -> Result<Vec<Sentence>> {
            self.parses
                .get(text)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no canned parse for {}", text))
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn pre_annotated(&self) -> bool {
            self.pre_annotated
        }
    }

    #[derive(Default)]
    struct RecordingLookup {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl RelationLookup for RecordingLookup {
        fn related(&self, subject: &str, verb: &str) -> Vec<String> {
            self.calls
                .borrow_mut()
                .push((subject.to_string(), verb.to_string()));
            vec!["somewhere".to_string()]
        }
    }

    fn parses() -> HashMap<String, Vec<Sentence>> {
        let mut parses = HashMap::new();
        parses.insert(
            "Where did Alice go?".to_string(),
            vec![Sentence::new(vec![
                Token::new("Where", "where", "ADV", "advmod"),
                Token::new("did", "do", "AUX", "aux"),
                Token::new("Alice", "Alice", "PROPN", "nsubj"),
                Token::new("go", "go", "VERB", "ROOT"),
                Token::new("?", "?", "PUNCT", "punct"),
            ])],
        );
        parses.insert(
            "Where Alice went".to_string(),
            vec![Sentence::new(vec![
                Token::new("Where", "where", "ADV", "advmod"),
                Token::new("Alice", "Alice", "PROPN", "nsubj"),
                Token::new("went", "go", "VERB", "ROOT"),
            ])],
        );
        parses.insert(
            "What Alice said".to_string(),
            vec![Sentence::new(vec![
                Token::new("What", "what", "PRON", "dobj"),
                Token::new("Alice", "Alice", "PROPN", "nsubj"),
                Token::new("said", "say", "VERB", "ROOT"),
            ])],
        );
        parses.insert(
            "Alice?".to_string(),
            vec![Sentence::new(vec![
                Token::new("Alice", "Alice", "PROPN", "ROOT"),
                Token::new("?", "?", "PUNCT", "punct"),
            ])],
        );
        parses.insert(
            "Alice ran and went".to_string(),
            vec![Sentence::new(vec![
                Token::new("Alice", "Alice", "PROPN", "nsubj"),
                Token::new("ran", "run", "VERB", "ROOT"),
                Token::new("and", "and", "CCONJ", "cc"),
                Token::new("went", "go", "VERB", "conj"),
            ])],
        );
        parses
    }

    fn driver() -> QueryDriver {
        QueryDriver::new(
            Arc::new(CannedParser { parses: parses(), pre_annotated: false }),
            VerbNormalizer::new(),
        )
    }

    fn annotated_driver() -> QueryDriver {
        QueryDriver::new(
            Arc::new(CannedParser { parses: parses(), pre_annotated: true }),
            VerbNormalizer::new(),
        )
    }

    #[tokio::test]
    async fn test_go_triggers_one_lookup() {
        let lookup = RecordingLookup::default();
        let answer = driver()
            .ask(&lookup, &Question::new("Where Alice went", "Alice", &["go"]))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(answer.verb, "go");
        assert_eq!(answer.targets, vec!["somewhere"]);
        assert_eq!(
            *lookup.calls.borrow(),
            vec![("Alice".to_string(), "go".to_string())]
        );
    }

    #[tokio::test]
    async fn test_said_triggers_say_lookup() {
        let lookup = RecordingLookup::default();
        driver()
            .ask(&lookup, &Question::new("What Alice said", "Alice", &["say"]))
            .await
            .unwrap();

        assert_eq!(
            *lookup.calls.borrow(),
            vec![("Alice".to_string(), "say".to_string())]
        );
    }

    #[tokio::test]
    async fn test_no_verb_no_lookup() {
        let lookup = RecordingLookup::default();
        let answer = driver()
            .ask(&lookup, &Question::new("Alice?", "Alice", &["go", "say"]))
            .await
            .unwrap();

        assert!(answer.is_none());
        assert!(lookup.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_auxiliary_is_skipped() {
        let lookup = RecordingLookup::default();
        let answer = driver()
            .ask(&lookup, &Question::new("Where did Alice go?", "Alice", &["go"]))
            .await
            .unwrap();

        assert_eq!(answer.unwrap().verb, "go");
        assert_eq!(lookup.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_unrecognised_verbs_are_passed_over() {
        let lookup = RecordingLookup::default();
        let answer = driver()
            .ask(&lookup, &Question::new("Alice ran and went", "Alice", &["go"]))
            .await
            .unwrap();

        assert_eq!(answer.unwrap().verb, "go");
        assert_eq!(lookup.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let lookup = RecordingLookup::default();
        let answer = driver()
            .ask(&lookup, &Question::new("Alice ran and went", "Alice", &["go", "run"]))
            .await
            .unwrap();

        assert_eq!(answer.unwrap().verb, "run");
        assert_eq!(lookup.calls.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_parser_failure_propagates() {
        let lookup = RecordingLookup::default();
        let result = driver()
            .ask(&lookup, &Question::new("unparseable", "Alice", &["go"]))
            .await;

        assert!(result.is_err());
        assert!(lookup.calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_annotated_parser_reads_annotation() {
        let lookup = RecordingLookup::default();
        let question = Question::new("Where did Alice go?", "Alice", &["go"])
            .with_annotation("Where Alice went");
        let answer = annotated_driver().ask(&lookup, &question).await.unwrap();

        assert_eq!(answer.unwrap().question, "Where did Alice go?");
        assert_eq!(
            *lookup.calls.borrow(),
            vec![("Alice".to_string(), "go".to_string())]
        );
    }

    #[tokio::test]
    async fn test_annotated_parser_rejects_plain_question() {
        let lookup = RecordingLookup::default();
        let err = annotated_driver()
            .ask(&lookup, &Question::new("Where did Alice go?", "Alice", &["go"]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("has no annotation"));
        assert!(lookup.calls.borrow().is_empty());
    }

    #[test]
    fn test_plain_parser_ignores_annotation() {
        let question = Question::new("Where did Alice go?", "Alice", &["go"]).with_annotation("x");

        assert_eq!(driver().parser_input(&question).unwrap(), "Where did Alice go?");
    }

    #[test]
    fn test_is_action_verb() {
        let driver = driver();

        assert_eq!(
            driver.is_action_verb(&Token::new("shouted", "shout", "VERB", "ROOT")),
            Some("say".to_string())
        );
        assert_eq!(driver.is_action_verb(&Token::new("did", "do", "AUX", "aux")), None);
    }
}
