//! Open-phrase skill extraction.
//!
//! Finds a "Required Skills" / "Requirements" section when one exists and
//! harvests free-text terms from it:
//! - parenthesized comma lists: "cloud (AWS, GCP)" → AWS, GCP
//! - slash groups: "TensorFlow / Keras / PyTorch" → three terms
//! - short noun-like phrases left after splitting on punctuation and
//!   function words, with generic filler words removed

use std::sync::Arc;

use regex::Regex;

use crate::errors::AppError;
use crate::extraction::record::sorted_unique;
use crate::extraction::skills::{SkillExtractor, SkillMode};
use crate::vocabulary::Vocabulary;

const MAX_PHRASE_WORDS: usize = 4;

const SECTION_START: &str =
    r"(?im)^[ \t]*(?:required[ \t]+skills|requirements)(?:[ \t]*&[ \t]*tools)?[ \t]*(?::|$)";

/// A capitalized colon-terminated line, or an all-caps line of two or more
/// alphabetic words ("PERKS AND BENEFITS"). Slash-joined lines such as
/// "SQL / AWS" are skill lists, not headings.
const NEXT_HEADING: &str =
    r"(?m)^[ \t]*(?:[A-Z][A-Za-z &/]{2,40}:|[A-Z]{2,}(?:[ \t]+(?:&[ \t]+)?[A-Z]{2,})+)[ \t]*$";

const PARENTHESIZED: &str = r"\(([^()]*)\)";

const SLASH_GROUP: &str = r"[\w.+#-]+(?:[ \t]*/[ \t]*[\w.+#-]+)+";

const CHUNK_BREAK: &str = r"(?i)[,;:\n\r•·*|]|\.(?:\s|$)|\s[-–]\s|\b(?:and|or|with|in|of|for|to|on|at|as|by|from|a|an|the|using|including|such|etc|like|e\.g|i\.e)\b";

pub struct OpenPhraseExtractor {
    vocabulary: Arc<Vocabulary>,
    section_start: Regex,
    next_heading: Regex,
    parenthesized: Regex,
    slash_group: Regex,
    chunk_break: Regex,
}

impl OpenPhraseExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Result<Self, AppError> {
        Ok(Self {
            vocabulary,
            section_start: Regex::new(SECTION_START)?,
            next_heading: Regex::new(NEXT_HEADING)?,
            parenthesized: Regex::new(PARENTHESIZED)?,
            slash_group: Regex::new(SLASH_GROUP)?,
            chunk_break: Regex::new(CHUNK_BREAK)?,
        })
    }

    /// Returns the requirements section body, or the whole text when no
    /// heading is found.
    pub fn skills_section<'t>(&self, text: &'t str) -> &'t str {
        let Some(start) = self.section_start.find(text) else {
            return text;
        };
        let body_start = start.end();
        let body_end = self
            .next_heading
            .find_at(text, body_start)
            .map(|m| m.start())
            .unwrap_or(text.len());
        &text[body_start..body_end]
    }

    fn harvest(&self, section: &str) -> Vec<String> {
        let mut terms = Vec::new();

        for caps in self.parenthesized.captures_iter(section) {
            terms.extend(caps[1].split(',').map(|t| trim_term(t).to_string()));
        }
        let remaining = self.parenthesized.replace_all(section, ",");

        for group in self.slash_group.find_iter(&remaining) {
            terms.extend(group.as_str().split('/').map(|t| trim_term(t).to_string()));
        }
        let remaining = self.slash_group.replace_all(&remaining, ",");

        for chunk in self.chunk_break.split(&remaining) {
            if let Some(phrase) = self.phrase_from_chunk(chunk) {
                terms.push(phrase);
            }
        }

        terms
            .into_iter()
            .filter(|t| !t.is_empty() && !self.vocabulary.is_generic_word(t))
            .collect()
    }

    fn phrase_from_chunk(&self, chunk: &str) -> Option<String> {
        let words: Vec<&str> = chunk
            .split_whitespace()
            .map(trim_term)
            .filter(|w| !w.is_empty())
            .filter(|w| w.chars().any(char::is_alphabetic))
            .filter(|w| !self.vocabulary.is_generic_word(w))
            .collect();
        if words.is_empty() || words.len() > MAX_PHRASE_WORDS {
            return None;
        }
        Some(words.join(" "))
    }
}

impl SkillExtractor for OpenPhraseExtractor {
    fn extract_skills(&self, text: &str) -> Vec<String> {
        sorted_unique(self.harvest(self.skills_section(text)))
    }

    fn mode(&self) -> SkillMode {
        SkillMode::OpenPhrase
    }
}

fn trim_term(term: &str) -> &str {
    term.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '•' | '.' | '"' | '\''))
}
