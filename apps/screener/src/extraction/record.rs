use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured facts extracted from one document (or one requirement).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredRecord {
    pub skills: Vec<String>,
    pub education: Education,
    pub experience: Vec<Experience>,
    pub salary: Vec<String>,
}

/// Education split into qualification tokens and institution names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degrees: Vec<String>,
    pub institutes: Vec<String>,
}

impl Education {
    /// Legacy flat view: qualification tokens only.
    pub fn flat(&self) -> &[String] {
        &self.degrees
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty() && self.institutes.is_empty()
    }
}

/// A duration expression such as "2 years" or "6 mos".
/// `unit` is the literal text that matched, never normalised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub magnitude: String,
    pub unit: String,
}

impl Experience {
    pub fn new(magnitude: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

impl StructuredRecord {
    /// Flat text used when a side has no raw text:
    /// skills, experience, education, salary joined by spaces.
    pub fn reconstructed_text(&self) -> String {
        let experience: Vec<String> = self.experience.iter().map(|e| e.to_string()).collect();
        [
            self.skills.join(" "),
            experience.join(" "),
            self.education.flat().join(" "),
            self.salary.join(" "),
        ]
        .join(" ")
    }
}

/// Trims, drops blanks, removes case-insensitive duplicates (first spelling
/// wins) and sorts by lowercase form.
pub fn sorted_unique<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for item in items {
        let item = collapse_whitespace(item.as_ref());
        if item.is_empty() {
            continue;
        }
        seen.entry(item.to_lowercase()).or_insert(item);
    }
    seen.into_values().collect()
}

/// Like `sorted_unique` but keeps first-seen order.
pub fn ordered_unique<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let item = collapse_whitespace(item.as_ref());
        if !item.is_empty() && seen.insert(item.to_lowercase()) {
            out.push(item);
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
