//! Taproot CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod scanner;

#[derive(Parser)]
#[command(name = "taproot")]
#[command(about = "Multi-language symbol index, call graph, and structural defect analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project root path (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the project and emit a JSON report
    Analyze {
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only analyze these language tags (e.g. python, go); default all
        #[arg(short, long)]
        language: Vec<String>,

        /// Glob patterns to exclude, relative to the root
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Similarity threshold for duplicate detection, in [0, 1]
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,

        /// Minimum normalized body token count for duplicate candidates
        #[arg(long, default_value_t = 10)]
        min_tokens: usize,

        /// Extra entry-point names exempt from dead-code reporting
        #[arg(long)]
        entry_point: Vec<String>,

        /// Resolve ambiguous calls to the first candidate instead of
        /// fanning out one edge per candidate
        #[arg(long)]
        first_candidate: bool,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "taproot={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            output,
            language,
            exclude,
            threshold,
            min_tokens,
            entry_point,
            first_candidate,
        } => commands::analyze(
            cli.root,
            commands::AnalyzeOptions {
                output,
                languages: language,
                excludes: exclude,
                threshold,
                min_tokens,
                entry_points: entry_point,
                first_candidate,
            },
        ),
        Commands::Version => {
            println!("taproot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
