//! Similarity Engine — scores one candidate record against one requirement record.
//!
//! Both sides are flattened to text, weighted with local pairwise TF-IDF,
//! optionally boosted on the requirement's skill terms, and compared by cosine.
//! `score` is the cosine × 100 rounded to two decimals.

pub mod stop_words;
pub mod tfidf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extraction::record::StructuredRecord;
use crate::similarity::tfidf::{Analyzer, PairwiseTfIdf};

pub const DEFAULT_BOOST_FACTOR: f64 = 5.0;

/// Which text each side contributes to the vector comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextSourceMode {
    /// Raw document text when available, reconstructed fields otherwise.
    #[default]
    Raw,
    /// Always the reconstructed fields.
    ReconstructedFields,
}

impl FromStr for TextSourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(TextSourceMode::Raw),
            "reconstructed-fields" | "reconstructed" | "fields" => {
                Ok(TextSourceMode::ReconstructedFields)
            }
            other => Err(format!(
                "unknown text source '{other}' (expected raw or reconstructed-fields)"
            )),
        }
    }
}

impl fmt::Display for TextSourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextSourceMode::Raw => "raw",
            TextSourceMode::ReconstructedFields => "reconstructed-fields",
        })
    }
}

/// One side of a comparison: the extracted record plus, optionally, the
/// text it was extracted from.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub record: StructuredRecord,
    pub raw_text: Option<String>,
}

impl Document {
    pub fn from_record(record: StructuredRecord) -> Self {
        Self {
            record,
            raw_text: None,
        }
    }

    pub fn with_raw_text(record: StructuredRecord, raw_text: impl Into<String>) -> Self {
        Self {
            record,
            raw_text: Some(raw_text.into()),
        }
    }

    fn flat_text(&self, mode: TextSourceMode) -> String {
        match (mode, &self.raw_text) {
            (TextSourceMode::Raw, Some(raw)) => raw.clone(),
            _ => self.record.reconstructed_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0.00 – 100.00
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub candidate: StructuredRecord,
    pub requirement: StructuredRecord,
}

pub struct SimilarityEngine {
    analyzer: Analyzer,
    text_source: TextSourceMode,
    boost_factor: Option<f64>,
}

impl SimilarityEngine {
    /// `boost_factor` must be a positive finite number when given.
    pub fn new(text_source: TextSourceMode, boost_factor: Option<f64>) -> Result<Self, AppError> {
        if let Some(factor) = boost_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(AppError::Config(format!(
                    "boost factor must be a positive number, got {factor}"
                )));
            }
        }
        Ok(Self {
            analyzer: Analyzer::new()?,
            text_source,
            boost_factor,
        })
    }

    pub fn text_source(&self) -> TextSourceMode {
        self.text_source
    }

    pub fn boost_factor(&self) -> Option<f64> {
        self.boost_factor
    }

    pub fn compare(&self, candidate: &Document, requirement: &Document) -> MatchResult {
        let mut tfidf = PairwiseTfIdf::fit(
            &self.analyzer,
            &candidate.flat_text(self.text_source),
            &requirement.flat_text(self.text_source),
        );

        if let Some(factor) = self.boost_factor {
            let terms = self.analyzer.analyze(&requirement.record.skills.join(" "));
            tfidf.boost(&terms, factor);
        }

        MatchResult {
            score: round2(tfidf.cosine() * 100.0),
            matched_skills: matched_skills(&requirement.record.skills, &candidate.record.skills),
            candidate: candidate.record.clone(),
            requirement: requirement.record.clone(),
        }
    }
}

/// Requirement skills also present among the candidate skills, ignoring case.
/// Requirement order and spelling are kept.
pub fn matched_skills(requirement: &[String], candidate: &[String]) -> Vec<String> {
    let have: std::collections::HashSet<String> =
        candidate.iter().map(|s| s.to_lowercase()).collect();
    requirement
        .iter()
        .filter(|s| have.contains(&s.to_lowercase()))
        .cloned()
        .collect()
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
