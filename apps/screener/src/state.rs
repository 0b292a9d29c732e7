use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::skills::build_skill_extractor;
use crate::extraction::FieldExtractor;
use crate::ingest::{DocumentTextSource, TextSource};
use crate::requirement::RequirementParser;
use crate::similarity::SimilarityEngine;
use crate::vocabulary::Vocabulary;

/// Shared, read-only screening state. Cloning is cheap; every component is
/// behind an `Arc` and safe to use from concurrent tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vocabulary: Arc<Vocabulary>,
    pub extractor: FieldExtractor,
    pub requirements: RequirementParser,
    pub similarity: Arc<SimilarityEngine>,
    /// Pluggable document reader. Default: DocumentTextSource.
    pub text_source: Arc<dyn TextSource>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let vocabulary = Arc::new(match &config.vocabulary_path {
            Some(path) => Vocabulary::from_json_file(path)?,
            None => Vocabulary::builtin()?,
        });

        let skills = build_skill_extractor(config.skill_mode, vocabulary.clone())?;
        let similarity = SimilarityEngine::new(config.text_source, config.boost_factor)?;

        info!(
            skill_mode = %config.skill_mode,
            text_source = %config.text_source,
            boost_factor = ?config.boost_factor,
            skill_validation = %config.skill_validation,
            "Screening state initialized"
        );

        Ok(AppState {
            extractor: FieldExtractor::new(vocabulary.clone(), skills),
            requirements: RequirementParser::new(vocabulary.clone(), config.skill_validation),
            similarity: Arc::new(similarity),
            text_source: Arc::new(DocumentTextSource),
            vocabulary,
            config,
        })
    }

    /// Replaces the document reader, e.g. with an OCR-backed source.
    pub fn with_text_source(mut self, text_source: Arc<dyn TextSource>) -> Self {
        self.text_source = text_source;
        self
    }
}
