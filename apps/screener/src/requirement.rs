//! Requirement Parser — builds a `StructuredRecord` from short form inputs
//! (skills CSV plus experience, education and salary free text).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::education::extract_education;
use crate::extraction::experience::first_experience;
use crate::extraction::record::{ordered_unique, StructuredRecord};
use crate::extraction::salary::first_salary;
use crate::vocabulary::Vocabulary;

/// How requirement skill tokens are checked against the vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillValidation {
    /// The whole trimmed token must equal a known skill (ignoring case).
    #[default]
    Strict,
    /// Any non-empty token is accepted as typed.
    Permissive,
}

impl FromStr for SkillValidation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SkillValidation::Strict),
            "permissive" => Ok(SkillValidation::Permissive),
            other => Err(format!(
                "unknown skill validation '{other}' (expected strict or permissive)"
            )),
        }
    }
}

impl fmt::Display for SkillValidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkillValidation::Strict => "strict",
            SkillValidation::Permissive => "permissive",
        })
    }
}

/// Raw requirement inputs as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequirementInput {
    pub skills: String,
    pub experience: String,
    pub education: String,
    pub salary: String,
}

#[derive(Clone)]
pub struct RequirementParser {
    vocabulary: Arc<Vocabulary>,
    validation: SkillValidation,
}

impl RequirementParser {
    pub fn new(vocabulary: Arc<Vocabulary>, validation: SkillValidation) -> Self {
        Self {
            vocabulary,
            validation,
        }
    }

    pub fn validation(&self) -> SkillValidation {
        self.validation
    }

    /// Skills keep the caller's order; experience and salary hold at most one
    /// entry each.
    pub fn parse(&self, input: &RequirementInput) -> StructuredRecord {
        StructuredRecord {
            skills: self.parse_skills(&input.skills),
            education: extract_education(&input.education, &self.vocabulary),
            experience: first_experience(&input.experience, &self.vocabulary)
                .into_iter()
                .collect(),
            salary: first_salary(&input.salary, &self.vocabulary)
                .into_iter()
                .collect(),
        }
    }

    /// Splits a comma-separated list. In strict mode unknown tokens are
    /// silently dropped and known ones take the vocabulary spelling.
    pub fn parse_skills(&self, csv: &str) -> Vec<String> {
        let tokens: Vec<&str> = csv
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        let accepted: Vec<String> = match self.validation {
            SkillValidation::Permissive => tokens.iter().map(|t| t.to_string()).collect(),
            SkillValidation::Strict => tokens
                .iter()
                .filter_map(|t| {
                    let canonical = self.vocabulary.canonical_skill(t);
                    if canonical.is_none() {
                        debug!(token = %t, "Dropping requirement skill not in vocabulary");
                    }
                    canonical.map(String::from)
                })
                .collect(),
        };

        ordered_unique(accepted)
    }
}
