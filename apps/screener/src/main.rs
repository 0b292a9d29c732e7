use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use screener::config::{parse_boost_factor, Config};
use screener::extraction::skills::SkillMode;
use screener::requirement::{RequirementInput, SkillValidation};
use screener::screening::{screen_candidates, CandidateDocument};
use screener::similarity::TextSourceMode;
use screener::state::AppState;

/// Screens candidate documents (PDF or plain text) against a job requirement
/// and prints a JSON report.
#[derive(Debug, Parser)]
#[command(name = "screener", version, about)]
struct Args {
    /// Comma-separated required skills, e.g. "Python, Django, SQL"
    #[arg(long, default_value = "")]
    skills: String,

    /// Required experience, e.g. "2 years"
    #[arg(long, default_value = "")]
    experience: String,

    /// Required education, e.g. "B.Tech"
    #[arg(long, default_value = "")]
    education: String,

    /// Offered salary, e.g. "₹6,00,000"
    #[arg(long, default_value = "")]
    salary: String,

    #[arg(long)]
    skill_mode: Option<SkillMode>,

    #[arg(long)]
    skill_validation: Option<SkillValidation>,

    #[arg(long)]
    text_source: Option<TextSourceMode>,

    /// Skill boost factor, or "off"
    #[arg(long)]
    boost: Option<String>,

    /// Vocabulary JSON overriding the built-in tables
    #[arg(long)]
    vocabulary: Option<PathBuf>,

    /// Candidate documents
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = apply_overrides(Config::from_env()?, &args)?;

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting screener v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(config)?;

    // Unreadable files are reported as failed entries, not fatal errors.
    let mut candidates = Vec::with_capacity(args.files.len());
    for path in &args.files {
        candidates.push(CandidateDocument::read(path).await);
    }

    let requirement = RequirementInput {
        skills: args.skills,
        experience: args.experience,
        education: args.education,
        salary: args.salary,
    };

    let report = screen_candidates(&state, candidates, &requirement).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn apply_overrides(mut config: Config, args: &Args) -> Result<Config> {
    if let Some(mode) = args.skill_mode {
        config.skill_mode = mode;
    }
    if let Some(validation) = args.skill_validation {
        config.skill_validation = validation;
    }
    if let Some(source) = args.text_source {
        config.text_source = source;
    }
    if let Some(raw) = &args.boost {
        config.boost_factor = parse_boost_factor(raw)?;
    }
    if let Some(path) = &args.vocabulary {
        config.vocabulary_path = Some(path.clone());
    }
    Ok(config)
}
