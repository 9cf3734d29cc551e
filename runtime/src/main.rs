//! `fame`: artist fame scorer.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fame get <name>` | Fame score for one artist |
//! | `fame resolve <name>` | Profile URL the artist resolves to |
//! | `fame batch <input.csv>` | Enrich a dataset with a fame column |
//! | `fame similarity <a> <b>` | Name similarity score |
//! | `fame doctor` | Check browser and configuration |

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fame_runtime::cli::batch_cmd::BatchArgs;
use fame_runtime::cli::output::{self, OutputFlags};
use fame_runtime::cli::{batch_cmd, doctor, get_cmd, resolve_cmd, similarity_cmd};
use fame_runtime::config::FameConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command line interface for the fame scorer.
#[derive(Parser, Debug)]
#[command(name = "fame")]
#[command(about = "Resolve artists to profile pages and score their fame")]
#[command(version)]
struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Browser platform (chrome, edge, firefox)
    #[arg(long, global = true)]
    platform: Option<String>,

    /// Print machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Only print results
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print debug logs and details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fame score (biography word count) for one artist
    Get {
        /// Artist name
        name: String,
    },
    /// Resolve an artist to a profile URL
    Resolve {
        /// Artist name
        name: String,
    },
    /// Score every artist in a CSV file
    Batch {
        /// Input CSV with an artist column
        input: PathBuf,

        /// Output CSV (default from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Where to write the names no profile was found for
        #[arg(long)]
        unresolved_log: Option<PathBuf>,

        /// Name of the artist column
        #[arg(long)]
        column: Option<String>,

        /// Concurrent browser sessions
        #[arg(short, long)]
        workers: Option<usize>,
    },
    /// Similarity of two names in [0, 1]
    Similarity { a: String, b: String },
    /// Check that a browser and configuration are usable
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let flags = OutputFlags::from_env().merge(OutputFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
        json: cli.json,
        no_color: cli.no_color,
    });
    output::init(flags);

    let level = if flags.verbose {
        "fame_runtime=debug"
    } else if flags.quiet || flags.json {
        "fame_runtime=warn"
    } else {
        "fame_runtime=info"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let mut config = FameConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(platform) = cli.platform {
        config.browser.platform = platform;
    }

    match cli.command {
        Command::Get { name } => get_cmd::run(&name, &config).await,
        Command::Resolve { name } => resolve_cmd::run(&name, &config).await,
        Command::Batch {
            input,
            output,
            unresolved_log,
            column,
            workers,
        } => {
            let args = BatchArgs {
                output,
                unresolved_log,
                column,
                workers,
            };
            batch_cmd::run(&input, args, &config).await
        }
        Command::Similarity { a, b } => similarity_cmd::run(&a, &b),
        Command::Doctor => doctor::run(&config, cli.config.as_deref()).await,
    }
}
