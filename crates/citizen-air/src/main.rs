// citizen-air/crates/citizen-air/src/main.rs

#[cfg(feature = "cli")]
use std::{io::Read, path::PathBuf, sync::Arc};
#[cfg(feature = "cli")]
use anyhow::Context;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use dotenvy::dotenv;
#[cfg(feature = "cli")]
use citizen_air::{config::Config, DistrictReport, NewSubmission, SubmissionDatabase, WordFrequencyExtractor};
#[cfg(feature = "cli")]
use tracing::info;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "citizen-air", version, about = "Crowdsourced air-quality ideas and their word clouds")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Command {
    /// Store a new idea for a district
    Submit {
        #[arg(long)]
        district: String,
        #[arg(long)]
        idea: String,
        #[arg(long)]
        province: Option<String>,
        #[arg(long)]
        author: Option<String>,
    },
    /// Print a district's ideas and word cloud as JSON
    Cloud { district: String },
    /// Print idea counts per district as JSON
    Districts,
    /// Rank words in a JSON array of idea texts (stdin when no file is given)
    Extract { file: Option<PathBuf> },
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    citizen_air::telemetry::init_tracing("info");

    let cli = Cli::parse();
    let cfg = Config::from_env()?;
    cfg.print_config();

    let extractor = Arc::new(cfg.load_extractor()?);

    match cli.command {
        Command::Extract { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            let texts: Vec<String> =
                serde_json::from_str(&raw).context("Expected a JSON array of strings")?;
            let weights = extractor.extract(&texts);
            println!("{}", serde_json::to_string_pretty(&weights)?);
        }
        command => {
            let db = SubmissionDatabase::new(&cfg.database_path)?;
            // SQLite calls are blocking; keep them off the async workers.
            let output =
                tokio::task::spawn_blocking(move || run_store_command(&db, &extractor, command))
                    .await??;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn run_store_command(
    db: &SubmissionDatabase,
    extractor: &WordFrequencyExtractor,
    command: Command,
) -> anyhow::Result<serde_json::Value> {
    match command {
        Command::Submit { district, idea, province, author } => {
            let mut form = NewSubmission::new(district, idea);
            form.province = province;
            form.author = author;
            let stored = db.ideas.submit(form)?;
            info!("Idea {} submitted", stored.id);
            Ok(serde_json::to_value(stored)?)
        }
        Command::Cloud { district } => {
            let report = DistrictReport::build(&db.ideas, extractor, &district)?;
            Ok(serde_json::to_value(report)?)
        }
        Command::Districts => Ok(serde_json::to_value(db.ideas.district_summaries()?)?),
        Command::Extract { .. } => anyhow::bail!("extract does not use the idea database"),
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Enable with --features cli");
}
