//! Skill extraction — pluggable strategies behind one trait.
//!
//! Default: `ClosedVocabularyExtractor` (whole-word search for known skills).
//! Alternative: `OpenPhraseExtractor` (free-text phrases from a requirements section).
//!
//! `FieldExtractor` holds an `Arc<dyn SkillExtractor>`, chosen at startup via `SkillMode`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::phrases::OpenPhraseExtractor;
use crate::extraction::record::sorted_unique;
use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkillMode {
    #[default]
    ClosedVocabulary,
    OpenPhrase,
}

impl FromStr for SkillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "closed-vocabulary" | "closed" => Ok(SkillMode::ClosedVocabulary),
            "open-phrase" | "open" => Ok(SkillMode::OpenPhrase),
            other => Err(format!(
                "unknown skill mode '{other}' (expected closed-vocabulary or open-phrase)"
            )),
        }
    }
}

impl fmt::Display for SkillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkillMode::ClosedVocabulary => "closed-vocabulary",
            SkillMode::OpenPhrase => "open-phrase",
        })
    }
}

/// Extracts a set of skill-like terms from free text.
///
/// Implementations must be pure: no blank entries, case-insensitive
/// duplicates removed, output sorted.
pub trait SkillExtractor: Send + Sync {
    fn extract_skills(&self, text: &str) -> Vec<String>;

    fn mode(&self) -> SkillMode;
}

/// Reports the canonical spelling of every known skill that occurs in the
/// text as a whole word, ignoring case.
pub struct ClosedVocabularyExtractor {
    vocabulary: Arc<Vocabulary>,
}

impl ClosedVocabularyExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }
}

impl SkillExtractor for ClosedVocabularyExtractor {
    fn extract_skills(&self, text: &str) -> Vec<String> {
        sorted_unique(
            self.vocabulary
                .skill_patterns()
                .iter()
                .filter(|p| p.pattern.is_match(text))
                .map(|p| p.canonical.as_str()),
        )
    }

    fn mode(&self) -> SkillMode {
        SkillMode::ClosedVocabulary
    }
}

pub fn build_skill_extractor(
    mode: SkillMode,
    vocabulary: Arc<Vocabulary>,
) -> Result<Arc<dyn SkillExtractor>, AppError> {
    Ok(match mode {
        SkillMode::ClosedVocabulary => Arc::new(ClosedVocabularyExtractor::new(vocabulary)),
        SkillMode::OpenPhrase => Arc::new(OpenPhraseExtractor::new(vocabulary)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ClosedVocabularyExtractor {
        ClosedVocabularyExtractor::new(Arc::new(Vocabulary::builtin().unwrap()))
    }

    #[test]
    fn test_whole_word_skill_found() {
        let skills = extractor().extract_skills("Worked on AI tooling in Python and SQL.");
        assert_eq!(skills, vec!["AI", "Python", "SQL"]);
    }

    #[test]
    fn test_substring_of_longer_word_not_matched() {
        let skills = extractor().extract_skills("I maintain legacy systems and javascripts");
        assert!(skills.is_empty(), "got {skills:?}");
    }

    #[test]
    fn test_canonical_spelling_reported() {
        let skills = extractor().extract_skills("built services in NODE.JS and mongodb");
        assert_eq!(skills, vec!["MongoDB", "Node.js"]);
    }

    #[test]
    fn test_case_insensitive_uppercase_text_is_equal() {
        let text = "Deep learning engineer using Docker, AWS and Flask";
        let ex = extractor();
        assert_eq!(ex.extract_skills(text), ex.extract_skills(&text.to_uppercase()));
    }

    #[test]
    fn test_multi_word_and_symbol_skills() {
        let skills = extractor().extract_skills("Machine Learning with C++ and C# tooling");
        assert_eq!(skills, vec!["C#", "C++", "Machine Learning"]);
    }

    #[test]
    fn test_empty_text_yields_nothing() {
        assert!(extractor().extract_skills("").is_empty());
    }

    #[test]
    fn test_skill_mode_parse_and_display() {
        assert_eq!(
            "open-phrase".parse::<SkillMode>().unwrap(),
            SkillMode::OpenPhrase
        );
        assert_eq!(
            " Closed-Vocabulary ".parse::<SkillMode>().unwrap(),
            SkillMode::ClosedVocabulary
        );
        assert!("fuzzy".parse::<SkillMode>().is_err());
        assert_eq!(SkillMode::OpenPhrase.to_string(), "open-phrase");
    }

    #[test]
    fn test_skill_mode_serde_kebab_case() {
        let mode: SkillMode = serde_json::from_str(r#""closed-vocabulary""#).unwrap();
        assert_eq!(mode, SkillMode::ClosedVocabulary);
    }

    #[test]
    fn test_factory_respects_mode() {
        let vocab = Arc::new(Vocabulary::builtin().unwrap());
        assert_eq!(
            build_skill_extractor(SkillMode::OpenPhrase, vocab.clone())
                .unwrap()
                .mode(),
            SkillMode::OpenPhrase
        );
        assert_eq!(
            build_skill_extractor(SkillMode::ClosedVocabulary, vocab)
                .unwrap()
                .mode(),
            SkillMode::ClosedVocabulary
        );
    }
}
