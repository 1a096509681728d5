// Rust guideline compliant 2026-02-06

//! Mands CLI Application
//!
//! Command-line interface for building and evaluating merge-and-shrink
//! heuristics of finite-domain planning tasks.

use clap::Parser;
use mands_cli::commands::{self, Overrides};
use mands_cli::{create_formatter, init_tracing};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mands",
    version,
    about = "Merge-and-shrink abstraction heuristics for planning tasks",
    long_about = "Mands builds merge-and-shrink abstractions of finite-domain planning tasks given as JSON and evaluates the resulting admissible heuristic.",
    after_help = "Examples:\n  mands build task.json\n  mands build task.json --merge-strategy sccs --max-states 10000 --json\n  mands eval task.json --state 0,1,0 --state 2,1,1\n  mands config --output mands.toml\n"
)]
struct Cli {
    /// Enable JSON output
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Custom config file path (default: mands.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log events to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Maximum abstraction size
    #[arg(long, global = true)]
    max_states: Option<usize>,

    /// Merge strategy (dfp, linear, sccs, max_pruning)
    #[arg(long, global = true)]
    merge_strategy: Option<String>,

    /// Shrink strategy (bisimulation, fh)
    #[arg(long, global = true)]
    shrink_strategy: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Table,
    Plain,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Build the heuristic of a task and report statistics
    Build {
        /// Task file (JSON)
        task: PathBuf,
    },

    /// Build the heuristic and evaluate states
    Eval {
        /// Task file (JSON)
        task: PathBuf,

        /// State as comma-separated values (default: the initial state)
        #[arg(long)]
        state: Vec<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write the configuration to this TOML file
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = Overrides {
        max_states: cli.max_states,
        merge_strategy: cli.merge_strategy,
        shrink_strategy: cli.shrink_strategy,
        log_level: cli.log_level,
    };
    let config = commands::load_config(cli.config.as_deref(), &overrides)?;
    let _guard = init_tracing(&config.log_level, cli.log_file.as_deref())?;

    let format = match cli.format {
        Some(OutputFormat::Json) => "json",
        Some(OutputFormat::Table) => "table",
        Some(OutputFormat::Plain) => "plain",
        None => {
            if cli.json {
                "json"
            } else {
                "table"
            }
        }
    };
    let formatter = create_formatter(format);

    match cli.command {
        Some(Commands::Build { task }) => {
            commands::build::execute(&task, &config, formatter.as_ref())?;
        }
        Some(Commands::Eval { task, state }) => {
            commands::eval::execute(&task, &state, &config, formatter.as_ref())?;
        }
        Some(Commands::Config { output }) => {
            commands::config::execute(&config, output.as_deref(), formatter.as_ref())?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
