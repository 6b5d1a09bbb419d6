//! painrx — command-line driver for the protocol rule engine.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use painrx_common::{EngineConfig, PainHistory, PatientSnapshot};
use painrx_engine::{Assessment, RecommendationAssembler};
use painrx_protocol::{check_rows, FileProtocolSource, ProtocolSource};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "painrx")]
#[command(about = "Analgesic recommendations from a treatment protocol table", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Produce one recommendation and print it as JSON
    Recommend {
        /// Protocol table (.csv, .json, .yaml)
        #[arg(long)]
        protocols: PathBuf,
        /// Patient snapshot (.json)
        #[arg(long)]
        patient: PathBuf,
        /// Reported pain score, 0-10
        #[arg(long, allow_negative_numbers = true)]
        score: i32,
        /// Earlier pain scores, oldest first (comma-separated)
        #[arg(long, value_delimiter = ',')]
        history: Vec<u8>,
        /// Engine configuration (.toml or .yaml); defaults to painrx.toml / PAINRX_CONFIG
        #[arg(long)]
        config: Option<PathBuf>,
        /// Assessment date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// Report data-quality problems in a protocol table
    CheckProtocols {
        /// Protocol table (.csv, .json, .yaml)
        #[arg(long)]
        protocols: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::load()?);
    };
    let path_str = path.to_string_lossy();
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => EngineConfig::from_yaml(&path_str)?,
        _ => EngineConfig::from_toml(&path_str)?,
    };
    Ok(config)
}

fn recommend(
    protocols: &Path,
    patient: &Path,
    score: i32,
    history: Vec<u8>,
    config: Option<&Path>,
    on: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let config = load_config(config).context("loading engine configuration")?;
    let patient = PatientSnapshot::from_json_file(&patient.to_string_lossy())
        .with_context(|| format!("reading patient snapshot {}", patient.display()))?;
    let source = FileProtocolSource::new(protocols);

    let mut history = PainHistory::new(history);
    if let Ok(current) = u8::try_from(score) {
        history.record(current);
    }

    let assessment = Assessment {
        patient: &patient,
        history: &history,
        pain_score: score,
        assessed_on: on.unwrap_or_else(|| Utc::now().date_naive()),
    };

    let assembler = RecommendationAssembler::new(config);
    let recommendation = assembler.assemble_from(&source, &assessment)?;
    info!(
        "Recommendation {} for patient {}: {:?}",
        recommendation.id, recommendation.patient_id, recommendation.status
    );

    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}

fn check_protocols(protocols: &Path) -> anyhow::Result<bool> {
    let rows = FileProtocolSource::new(protocols).rows()?;
    let issues = check_rows(&rows);
    for issue in &issues {
        println!("{issue}");
    }
    println!("{} rows checked, {} issues", rows.len(), issues.len());
    Ok(issues.is_empty())
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("painrx=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Recommend {
            protocols,
            patient,
            score,
            history,
            config,
            on,
        } => {
            recommend(&protocols, &patient, score, history, config.as_deref(), on)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckProtocols { protocols } => {
            let clean = check_protocols(&protocols)?;
            Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
