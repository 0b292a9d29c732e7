//! Batch screening — scores many candidate documents against one requirement.
//!
//! Each document runs as its own tokio task (text source → extraction → scoring),
//! bounded by a semaphore. A document that fails, or whose task panics, becomes a
//! `Failed` outcome; its siblings are unaffected.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::requirement::RequirementInput;
use crate::similarity::{Document, MatchResult};
use crate::state::AppState;

/// One uploaded document awaiting screening. A document whose bytes could
/// not be read still takes its place in the batch and is reported as failed.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub name: String,
    pub bytes: Bytes,
    read_error: Option<ReadError>,
}

#[derive(Debug, Clone)]
struct ReadError {
    code: &'static str,
    message: String,
}

impl CandidateDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            read_error: None,
        }
    }

    /// Names the candidate after the file stem ("jane_doe.pdf" → "jane_doe").
    pub fn from_path(path: &Path, bytes: impl Into<Bytes>) -> Self {
        Self::new(candidate_name(path), bytes)
    }

    /// A document that never produced bytes.
    pub fn unreadable(name: impl Into<String>, error: &AppError) -> Self {
        Self {
            name: name.into(),
            bytes: Bytes::new(),
            read_error: Some(ReadError {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }

    /// Reads a document from disk; a read failure is kept for the report.
    pub async fn read(path: &Path) -> Self {
        match tokio::fs::read(path).await {
            Ok(bytes) => Self::from_path(path, bytes),
            Err(e) => Self::unreadable(candidate_name(path), &AppError::Io(e)),
        }
    }
}

fn candidate_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateOutcome {
    Matched {
        candidate_name: String,
        #[serde(flatten)]
        result: MatchResult,
    },
    Failed {
        candidate_name: String,
        code: String,
        error: String,
    },
}

impl CandidateOutcome {
    pub fn candidate_name(&self) -> &str {
        match self {
            CandidateOutcome::Matched { candidate_name, .. }
            | CandidateOutcome::Failed { candidate_name, .. } => candidate_name,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            CandidateOutcome::Matched { result, .. } => Some(result.score),
            CandidateOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMatch {
    pub candidate_name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub total_candidates: usize,
    /// Same order as the input documents.
    pub results: Vec<CandidateOutcome>,
    pub best_match: Option<BestMatch>,
}

impl ScreeningReport {
    pub fn from_outcomes(results: Vec<CandidateOutcome>) -> Self {
        Self {
            total_candidates: results.len(),
            best_match: best_match(&results),
            results,
        }
    }
}

/// Highest score among successful outcomes; the earliest wins ties.
pub fn best_match(results: &[CandidateOutcome]) -> Option<BestMatch> {
    results
        .iter()
        .filter_map(|o| o.score().map(|s| (o.candidate_name(), s)))
        .fold(None, |best: Option<(&str, f64)>, (name, score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((name, score)),
        })
        .map(|(name, score)| BestMatch {
            candidate_name: name.to_string(),
            score,
        })
}

pub async fn screen_candidates(
    state: &AppState,
    candidates: Vec<CandidateDocument>,
    requirement: &RequirementInput,
) -> ScreeningReport {
    let requirement = Arc::new(Document::from_record(state.requirements.parse(requirement)));
    let semaphore = Arc::new(Semaphore::new(state.config.max_concurrent_documents.max(1)));

    info!(
        candidates = candidates.len(),
        requirement_skills = requirement.record.skills.len(),
        "Screening batch started"
    );

    let names: Vec<String> = candidates.iter().map(|c| c.name.clone()).collect();
    let mut slots: Vec<Option<CandidateOutcome>> = vec![None; candidates.len()];
    let mut task_index = HashMap::new();
    let mut tasks = JoinSet::new();

    for (index, candidate) in candidates.into_iter().enumerate() {
        let state = state.clone();
        let requirement = requirement.clone();
        let semaphore = semaphore.clone();
        let handle = tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            screen_one(state, requirement, candidate).await
        });
        task_index.insert(handle.id(), index);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                if let Some(&index) = task_index.get(&id) {
                    slots[index] = Some(outcome);
                }
            }
            Err(e) => {
                if let Some(&index) = task_index.get(&e.id()) {
                    warn!(candidate = %names[index], error = %e, "Screening task aborted");
                    slots[index] = Some(CandidateOutcome::Failed {
                        candidate_name: names[index].clone(),
                        code: "INTERNAL_ERROR".to_string(),
                        error: format!("screening task failed: {e}"),
                    });
                }
            }
        }
    }

    let results: Vec<CandidateOutcome> = slots
        .into_iter()
        .zip(names)
        .map(|(slot, name)| {
            slot.unwrap_or_else(|| CandidateOutcome::Failed {
                candidate_name: name,
                code: "INTERNAL_ERROR".to_string(),
                error: "screening task produced no result".to_string(),
            })
        })
        .collect();

    let report = ScreeningReport::from_outcomes(results);
    info!(
        total = report.total_candidates,
        failed = report.results.iter().filter(|o| o.score().is_none()).count(),
        best = ?report.best_match.as_ref().map(|b| &b.candidate_name),
        "Screening batch finished"
    );
    report
}

async fn screen_one(
    state: AppState,
    requirement: Arc<Document>,
    candidate: CandidateDocument,
) -> CandidateOutcome {
    let CandidateDocument {
        name,
        bytes,
        read_error,
    } = candidate;

    if let Some(ReadError { code, message }) = read_error {
        warn!(candidate = %name, error = %message, "Candidate document could not be read");
        return CandidateOutcome::Failed {
            candidate_name: name,
            code: code.to_string(),
            error: message,
        };
    }

    let text = match state.text_source.extract_text(bytes).await {
        Ok(text) => text,
        Err(e) => {
            warn!(candidate = %name, error = %e, "Failed to read candidate document");
            return CandidateOutcome::Failed {
                candidate_name: name,
                code: e.code().to_string(),
                error: e.to_string(),
            };
        }
    };

    // Extraction and scoring are CPU-bound.
    let extractor = state.extractor.clone();
    let similarity = state.similarity.clone();
    let scored = tokio::task::spawn_blocking(move || {
        let record = extractor.extract(&text);
        similarity.compare(&Document::with_raw_text(record, text), &requirement)
    })
    .await;

    match scored {
        Ok(result) => {
            debug!(candidate = %name, score = result.score, matched = ?result.matched_skills, "Candidate scored");
            CandidateOutcome::Matched {
                candidate_name: name,
                result,
            }
        }
        Err(e) => {
            let e = AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}"));
            warn!(candidate = %name, error = %e, "Failed to score candidate document");
            CandidateOutcome::Failed {
                candidate_name: name,
                code: e.code().to_string(),
                error: e.to_string(),
            }
        }
    }
}
