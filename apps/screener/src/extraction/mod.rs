// Field extraction: raw document text → StructuredRecord.
// Every function here is pure and infallible; missing features yield empty collections.

pub mod education;
pub mod experience;
pub mod phrases;
pub mod record;
pub mod salary;
pub mod skills;

use std::sync::Arc;

use crate::extraction::education::extract_education;
use crate::extraction::experience::extract_experience;
use crate::extraction::record::StructuredRecord;
use crate::extraction::salary::extract_salary;
use crate::extraction::skills::{SkillExtractor, SkillMode};
use crate::vocabulary::Vocabulary;

pub use record::{Education, Experience};

/// Turns document text into a `StructuredRecord` using the shared vocabulary
/// and the configured skill strategy.
#[derive(Clone)]
pub struct FieldExtractor {
    vocabulary: Arc<Vocabulary>,
    skills: Arc<dyn SkillExtractor>,
}

impl FieldExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>, skills: Arc<dyn SkillExtractor>) -> Self {
        Self { vocabulary, skills }
    }

    pub fn skill_mode(&self) -> SkillMode {
        self.skills.mode()
    }

    pub fn extract(&self, text: &str) -> StructuredRecord {
        StructuredRecord {
            skills: self.skills.extract_skills(text),
            education: extract_education(text, &self.vocabulary),
            experience: extract_experience(text, &self.vocabulary),
            salary: extract_salary(text, &self.vocabulary),
        }
    }
}
