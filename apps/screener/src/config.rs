use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::extraction::skills::SkillMode;
use crate::requirement::SkillValidation;
use crate::similarity::{TextSourceMode, DEFAULT_BOOST_FACTOR};

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file overriding the built-in vocabulary tables.
    pub vocabulary_path: Option<PathBuf>,
    pub skill_mode: SkillMode,
    pub text_source: TextSourceMode,
    /// `None` disables skill boosting.
    pub boost_factor: Option<f64>,
    pub skill_validation: SkillValidation,
    pub max_concurrent_documents: usize,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            vocabulary_path: None,
            skill_mode: SkillMode::default(),
            text_source: TextSourceMode::default(),
            boost_factor: Some(DEFAULT_BOOST_FACTOR),
            skill_validation: SkillValidation::default(),
            max_concurrent_documents: default_concurrency(),
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            vocabulary_path: optional_env("SCREENER_VOCABULARY").map(PathBuf::from),
            skill_mode: parse_env("SKILL_MODE", defaults.skill_mode)?,
            text_source: parse_env("TEXT_SOURCE", defaults.text_source)?,
            boost_factor: match optional_env("BOOST_FACTOR") {
                Some(raw) => parse_boost_factor(&raw)?,
                None => defaults.boost_factor,
            },
            skill_validation: parse_env("SKILL_VALIDATION", defaults.skill_validation)?,
            max_concurrent_documents: parse_env(
                "MAX_CONCURRENT_DOCUMENTS",
                defaults.max_concurrent_documents,
            )?
            .max(1),
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

/// Parses `BOOST_FACTOR`: a positive number, or `off`/`none` to disable boosting.
pub fn parse_boost_factor(raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("off") || raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let factor = raw
        .parse::<f64>()
        .with_context(|| format!("BOOST_FACTOR must be a number or 'off', got '{raw}'"))?;
    if !factor.is_finite() || factor <= 0.0 {
        anyhow::bail!("BOOST_FACTOR must be a positive number, got '{raw}'");
    }
    Ok(Some(factor))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Environment variable '{key}' has an invalid value")),
        None => Ok(default),
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boost_factor_off_disables() {
        assert_eq!(parse_boost_factor("off").unwrap(), None);
        assert_eq!(parse_boost_factor("NONE").unwrap(), None);
    }

    #[test]
    fn test_boost_factor_number() {
        assert_eq!(parse_boost_factor(" 2.5 ").unwrap(), Some(2.5));
    }

    #[test]
    fn test_boost_factor_rejects_non_positive() {
        assert!(parse_boost_factor("0").is_err());
        assert!(parse_boost_factor("-3").is_err());
        assert!(parse_boost_factor("lots").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.skill_mode, SkillMode::ClosedVocabulary);
        assert_eq!(config.text_source, TextSourceMode::Raw);
        assert_eq!(config.boost_factor, Some(5.0));
        assert_eq!(config.skill_validation, SkillValidation::Strict);
        assert!(config.max_concurrent_documents >= 1);
    }
}
