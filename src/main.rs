use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::info;

mod aggregate;
mod chart;
mod classify;
mod config;
mod error;
mod leaderboard;
mod models;
mod report;
mod source;
mod stats;
mod stories;
mod windows;

use config::MetricsConfig;
use models::StatsOutput;

#[derive(Parser)]
#[command(name = "team-batting-average")]
#[command(about = "Rolling batting averages and RBI leaderboards from tracker exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Tracker export (JSON array, or CSV when the file ends in .csv)
    #[arg(long)]
    issues: PathBuf,
    /// Active roster file (JSON array or one name per line)
    #[arg(long)]
    roster: Option<PathBuf>,
    /// Active roster names, used when no roster file is given
    #[arg(long = "member", env = "TEAM_ROSTER", value_delimiter = ',')]
    members: Vec<String>,
    #[command(flatten)]
    metrics: MetricsConfig,
}

#[derive(Subcommand)]
enum Commands {
    /// Write chart data and leaderboards as JSON
    Stats {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "stats.json")]
        out: PathBuf,
    },
    /// Print the batting average and RBI leaderboards
    Leaders {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

async fn compute(input: &InputArgs) -> anyhow::Result<StatsOutput> {
    let issues = source::load_issues(&input.issues).await?;
    let roster = source::load_roster(input.roster.as_deref(), &input.members).await?;
    let records = stories::stories_with_estimates(&issues)?;
    info!(stories = records.len(), "enriched stories");

    input
        .metrics
        .validate()
        .context("invalid metrics configuration")?;
    let now = Utc::now();
    let windows = windows::past_weeks(input.metrics.number_of_windows, now);
    stats::build_stats(&records, &roster, &windows, &input.metrics, now)
        .context("failed to aggregate batting averages")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { input, out } => {
            let stats = compute(&input).await?;
            let json = serde_json::to_string_pretty(&stats)?;
            tokio::fs::write(&out, json)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Stats written to {}.", out.display());
        }
        Commands::Leaders { input } => {
            let stats = compute(&input).await?;

            println!("Batting average leaders:");
            for entry in stats.leaderboard_by_ratio.iter() {
                println!("- {} {}", entry.assignee, entry.score);
            }
            println!("RBI leaders:");
            for entry in stats.leaderboard_by_points.iter() {
                println!("- {} {} points", entry.assignee, entry.score);
            }
        }
        Commands::Report { input, out } => {
            let stats = compute(&input).await?;
            let report = report::build_report(&stats);
            tokio::fs::write(&out, report)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
