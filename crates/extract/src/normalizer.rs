use std::collections::HashMap;

/// Label every communication verb collapses to.
pub const SAY: &str = "say";

pub const COMMUNICATION_VERBS: &[&str] = &[
    "say", "tell", "ask", "reply", "cry", "shout", "whisper", "scream", "exclaim", "remark",
    "mutter", "answer", "call",
];

#[derive(Debug, Clone)]
pub struct VerbNormalizer {
    /// Maps lowercased lemma -> canonical verb label
    aliases: HashMap<String, String>,
}

impl Default for VerbNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl VerbNormalizer {
    pub fn new() -> Self {
        let aliases = COMMUNICATION_VERBS
            .iter()
            .map(|verb| (verb.to_string(), SAY.to_string()))
            .collect();

        Self { aliases }
    }

    /// Register an extra collapse, e.g. `("yell", "say")`
    pub fn add_alias(&mut self, lemma: &str, canonical: &str) {
        self.aliases.insert(lemma.to_lowercase(), canonical.to_lowercase());
    }

    /// Canonical label for a lemma. Lemmas outside the alias table come back
    /// lowercased and otherwise unchanged.
    pub fn normalize(&self, lemma: &str) -> String {
        let lemma = lemma.to_lowercase();

        match self.aliases.get(&lemma) {
            Some(canonical) => canonical.clone(),
            None => lemma,
        }
    }

    pub fn get_aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_communication_verbs_collapse() {
        let normalizer = VerbNormalizer::new();

        for verb in COMMUNICATION_VERBS {
            assert_eq!(normalizer.normalize(verb), "say", "lemma {}", verb);
        }
    }

    #[test]
    fn test_other_lemmas_unchanged() {
        let normalizer = VerbNormalizer::new();

        for lemma in ["go", "run", "think", "fall", "see", "sayings"] {
            assert_eq!(normalizer.normalize(lemma), lemma);
        }
    }

    #[test]
    fn test_case_folding() {
        let normalizer = VerbNormalizer::new();

        assert_eq!(normalizer.normalize("Whisper"), "say");
        assert_eq!(normalizer.normalize("GO"), "go");
    }

    #[test]
    fn test_extra_alias() {
        let mut normalizer = VerbNormalizer::new();
        normalizer.add_alias("Yell", "say");

        assert_eq!(normalizer.normalize("yell"), "say");
        assert_eq!(normalizer.get_aliases().len(), COMMUNICATION_VERBS.len() + 1);
    }
}
