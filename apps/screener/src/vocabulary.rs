//! Vocabulary — the reference tables every extraction and scoring call reads.
//!
//! Tables are plain data (`VocabularyTables`, serde-loadable from JSON) and are
//! compiled once into regex patterns. A `Vocabulary` is immutable after
//! construction and shared behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;

const KNOWN_SKILLS: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "SQL",
    "HTML",
    "CSS",
    "React",
    "Node.js",
    "AI",
    "Machine Learning",
    "Deep Learning",
    "Data Science",
    "MongoDB",
    "Django",
    "Flask",
    "C++",
    "C#",
    "AWS",
    "Docker",
];

const EDUCATION_KEYWORDS: &[&str] = &["B.Tech", "M.Tech", "Bachelor", "Master", "MBA", "PhD"];

const INSTITUTION_MARKERS: &[&str] = &["University", "College", "Institute"];

const SCHOOL_PREFIX: &str = "School of";

const EXPERIENCE_UNITS: &[&str] = &["years", "year", "yrs", "yr", "months", "month", "mos", "mo"];

const SALARY_SYMBOLS: &[&str] = &["₹", "$"];

const GENERIC_PHRASE_WORDS: &[&str] = &[
    "experience",
    "knowledge",
    "understanding",
    "skills",
    "skill",
    "familiarity",
    "good",
    "basic",
    "problem-solving",
    "foundation",
    "strong",
    "solid",
    "excellent",
    "proficiency",
    "proficient",
    "hands-on",
    "working",
    "required",
    "preferred",
    "plus",
    "years",
    "year",
];

/// Raw vocabulary tables. Missing fields in a JSON override fall back to the
/// built-in table for that field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyTables {
    pub known_skills: Vec<String>,
    pub education_keywords: Vec<String>,
    pub institution_markers: Vec<String>,
    pub school_prefix: String,
    pub experience_units: Vec<String>,
    pub salary_symbols: Vec<String>,
    pub generic_phrase_words: Vec<String>,
}

impl Default for VocabularyTables {
    fn default() -> Self {
        Self {
            known_skills: to_owned(KNOWN_SKILLS),
            education_keywords: to_owned(EDUCATION_KEYWORDS),
            institution_markers: to_owned(INSTITUTION_MARKERS),
            school_prefix: SCHOOL_PREFIX.to_string(),
            experience_units: to_owned(EXPERIENCE_UNITS),
            salary_symbols: to_owned(SALARY_SYMBOLS),
            generic_phrase_words: to_owned(GENERIC_PHRASE_WORDS),
        }
    }
}

/// A canonical term paired with its compiled whole-word matcher.
#[derive(Debug, Clone)]
pub struct TermPattern {
    pub canonical: String,
    pub pattern: Regex,
}

/// Compiled, read-only vocabulary.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tables: VocabularyTables,
    skills: Vec<TermPattern>,
    skill_index: HashMap<String, String>,
    degrees: Vec<TermPattern>,
    institute_pattern: Option<Regex>,
    school_pattern: Option<Regex>,
    experience_pattern: Option<Regex>,
    salary_pattern: Option<Regex>,
    generic_words: HashSet<String>,
}

impl Vocabulary {
    /// Compiles the built-in tables.
    pub fn builtin() -> Result<Self, AppError> {
        Self::new(VocabularyTables::default())
    }

    /// Loads tables from a JSON file and compiles them.
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let tables: VocabularyTables = serde_json::from_str(&raw)?;
        let vocabulary = Self::new(tables)?;
        info!(
            path = %path.display(),
            skills = vocabulary.tables.known_skills.len(),
            "Loaded vocabulary override"
        );
        Ok(vocabulary)
    }

    pub fn new(tables: VocabularyTables) -> Result<Self, AppError> {
        let tables = VocabularyTables {
            known_skills: clean(tables.known_skills),
            education_keywords: clean(tables.education_keywords),
            institution_markers: clean(tables.institution_markers),
            school_prefix: tables.school_prefix.trim().to_string(),
            experience_units: clean(tables.experience_units),
            salary_symbols: clean(tables.salary_symbols),
            generic_phrase_words: clean(tables.generic_phrase_words),
        };

        let mut skill_index = HashMap::new();
        let mut skills = Vec::with_capacity(tables.known_skills.len());
        for skill in &tables.known_skills {
            let key = skill.to_lowercase();
            if skill_index.contains_key(&key) {
                return Err(AppError::Vocabulary(format!(
                    "skill '{skill}' is listed more than once"
                )));
            }
            skill_index.insert(key, skill.clone());
            skills.push(TermPattern {
                canonical: skill.clone(),
                pattern: Regex::new(&format!("(?i){}", whole_word(&regex::escape(skill), skill)))?,
            });
        }

        let degrees = tables
            .education_keywords
            .iter()
            .map(|keyword| {
                Ok(TermPattern {
                    canonical: keyword.clone(),
                    pattern: Regex::new(&format!(
                        "(?i){}",
                        degree_word(&dot_optional(keyword), keyword)
                    ))?,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        let institute_pattern = if tables.institution_markers.is_empty() {
            None
        } else {
            let markers = alternation(&tables.institution_markers);
            Some(Regex::new(&format!(
                r"\b(?:[A-Z][\w&'.-]*[ \t]+){{0,4}}(?:{markers})\b(?:[ \t]+of(?:[ \t]+[A-Z][\w&'.-]*)+)?"
            ))?)
        };

        let school_pattern = if tables.school_prefix.is_empty() {
            None
        } else {
            let prefix = tables
                .school_prefix
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join("[ \t]+");
            Some(Regex::new(&format!(r"\b{prefix}(?:[ \t]+[A-Z][\w&'.-]*)+"))?)
        };

        let experience_pattern = if tables.experience_units.is_empty() {
            None
        } else {
            let units = alternation(&tables.experience_units);
            Some(Regex::new(&format!(r"(?i)(\d+(?:\.\d+)?)\s*({units})\b"))?)
        };

        let salary_pattern = if tables.salary_symbols.is_empty() {
            None
        } else {
            let symbols = alternation(&tables.salary_symbols);
            Some(Regex::new(&format!(
                r"({symbols})\s*(\d+(?:,\d{{2,3}})*)(\.\d+)?"
            ))?)
        };

        let generic_words = tables
            .generic_phrase_words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        Ok(Self {
            tables,
            skills,
            skill_index,
            degrees,
            institute_pattern,
            school_pattern,
            experience_pattern,
            salary_pattern,
            generic_words,
        })
    }

    pub fn tables(&self) -> &VocabularyTables {
        &self.tables
    }

    pub fn skill_patterns(&self) -> &[TermPattern] {
        &self.skills
    }

    /// Returns the canonical spelling when `token` equals a known skill,
    /// ignoring case.
    pub fn canonical_skill(&self, token: &str) -> Option<&str> {
        self.skill_index
            .get(&token.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn degree_patterns(&self) -> &[TermPattern] {
        &self.degrees
    }

    pub fn institute_pattern(&self) -> Option<&Regex> {
        self.institute_pattern.as_ref()
    }

    pub fn school_pattern(&self) -> Option<&Regex> {
        self.school_pattern.as_ref()
    }

    /// Captures: 1 = magnitude, 2 = unit literal.
    pub fn experience_pattern(&self) -> Option<&Regex> {
        self.experience_pattern.as_ref()
    }

    /// Captures: 1 = symbol, 2 = grouped integer part, 3 = decimal part.
    /// A match followed directly by a word character is a partial amount.
    pub fn salary_pattern(&self) -> Option<&Regex> {
        self.salary_pattern.as_ref()
    }

    pub fn is_generic_word(&self, word: &str) -> bool {
        self.generic_words.contains(&word.to_lowercase())
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn clean(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Wraps a pattern in `\b` only on the sides where the literal term begins or
/// ends with a word character, so terms like "C++" can still match.
fn whole_word(pattern: &str, term: &str) -> String {
    let lead = term.chars().next().is_some_and(is_word_char);
    let trail = term.chars().last().is_some_and(is_word_char);
    format!(
        "{}(?:{pattern}){}",
        if lead { r"\b" } else { "" },
        if trail { r"\b" } else { "" }
    )
}

/// Like `whole_word`, but also accepts a plural or possessive ending:
/// "Masters", "Bachelor's". "Mastered" is still rejected.
fn degree_word(pattern: &str, term: &str) -> String {
    if term.chars().last().is_some_and(is_word_char) {
        let lead = if term.chars().next().is_some_and(is_word_char) { r"\b" } else { "" };
        format!(r"{lead}(?:{pattern})(?:'?s)?\b")
    } else {
        whole_word(pattern, term)
    }
}

/// "B.Tech" → `B\.?Tech`: dots inside abbreviations are optional.
fn dot_optional(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| {
            if c == '.' {
                r"\.?".to_string()
            } else {
                regex::escape(&c.to_string())
            }
        })
        .collect()
}

/// Longest-first alternation so "years" wins over "year".
fn alternation(items: &[String]) -> String {
    let mut sorted: Vec<&String> = items.iter().collect();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    sorted
        .into_iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_compiles() {
        let vocab = Vocabulary::builtin().unwrap();
        assert_eq!(vocab.skill_patterns().len(), KNOWN_SKILLS.len());
        assert_eq!(vocab.degree_patterns().len(), EDUCATION_KEYWORDS.len());
        assert!(vocab.experience_pattern().is_some());
        assert!(vocab.salary_pattern().is_some());
    }

    #[test]
    fn test_canonical_skill_is_case_insensitive() {
        let vocab = Vocabulary::builtin().unwrap();
        assert_eq!(vocab.canonical_skill("  node.JS "), Some("Node.js"));
        assert_eq!(vocab.canonical_skill("python"), Some("Python"));
        assert_eq!(vocab.canonical_skill("Pyth"), None);
    }

    #[test]
    fn test_symbol_terminated_skill_matches() {
        let vocab = Vocabulary::builtin().unwrap();
        let cpp = vocab
            .skill_patterns()
            .iter()
            .find(|p| p.canonical == "C++")
            .unwrap();
        assert!(cpp.pattern.is_match("Modern C++ developer"));
        assert!(!cpp.pattern.is_match("ABC++"));
    }

    #[test]
    fn test_dot_optional_keyword() {
        assert_eq!(dot_optional("B.Tech"), r"B\.?Tech");
    }

    #[test]
    fn test_degree_accepts_plural_and_possessive() {
        let vocab = Vocabulary::builtin().unwrap();
        let master = vocab
            .degree_patterns()
            .iter()
            .find(|p| p.canonical == "Master")
            .unwrap();
        assert!(master.pattern.is_match("Masters in Data Science"));
        assert!(master.pattern.is_match("a master's degree"));
        assert!(!master.pattern.is_match("Mastered Kubernetes"));
        assert!(!master.pattern.is_match("Mastersclass"));
    }

    #[test]
    fn test_alternation_longest_first() {
        let units = to_owned(&["yr", "years", "year"]);
        assert_eq!(alternation(&units), "years|year|yr");
    }

    #[test]
    fn test_duplicate_skill_rejected() {
        let tables = VocabularyTables {
            known_skills: to_owned(&["Rust", "rust"]),
            ..VocabularyTables::default()
        };
        assert!(matches!(
            Vocabulary::new(tables),
            Err(AppError::Vocabulary(_))
        ));
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let tables = VocabularyTables {
            known_skills: to_owned(&["Rust", "  ", ""]),
            ..VocabularyTables::default()
        };
        let vocab = Vocabulary::new(tables).unwrap();
        assert_eq!(vocab.tables().known_skills, vec!["Rust".to_string()]);
    }

    #[test]
    fn test_json_override_keeps_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"known_skills": ["Rust", "Go", "Kubernetes"]}}"#).unwrap();

        let vocab = Vocabulary::from_json_file(file.path()).unwrap();
        assert_eq!(vocab.tables().known_skills.len(), 3);
        assert_eq!(vocab.canonical_skill("kubernetes"), Some("Kubernetes"));
        assert_eq!(
            vocab.tables().education_keywords,
            to_owned(EDUCATION_KEYWORDS)
        );
    }

    #[test]
    fn test_json_override_malformed_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            Vocabulary::from_json_file(file.path()),
            Err(AppError::Json(_))
        ));
    }

    #[test]
    fn test_empty_units_disable_experience_pattern() {
        let tables = VocabularyTables {
            experience_units: vec![],
            ..VocabularyTables::default()
        };
        let vocab = Vocabulary::new(tables).unwrap();
        assert!(vocab.experience_pattern().is_none());
    }
}
