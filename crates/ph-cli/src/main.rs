//! phists CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod run;

#[derive(Parser)]
#[command(name = "phists")]
#[command(about = "phists - electron isolation and identification histograms")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill histograms from a JSON event file
    Fill {
        /// Run config (YAML or JSON). Flags below override its values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Input events (JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Detail string, e.g. "kinematic isolation ISOL_FCTight PID PID_LHTight"
        #[arg(short, long)]
        detail: Option<String>,

        /// Base name prepended to every histogram name
        #[arg(short, long)]
        name: Option<String>,

        /// Output file for histograms (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the parsed switch and the histograms setup would book
    Describe {
        /// Detail string
        #[arg(short, long)]
        detail: String,

        /// Base name prepended to every histogram name
        #[arg(short, long, default_value = run::DEFAULT_NAME)]
        name: String,

        /// Output file (pretty JSON). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Fill { config, input, detail, name, output } => {
            let cfg = run::resolve_config(config.as_deref(), input, detail, name, output)?;
            run::cmd_fill(&cfg)
        }
        Commands::Describe { detail, name, output } => {
            run::cmd_describe(&detail, &name, output.as_ref())
        }
        Commands::Version => {
            println!("phists {}", ph_core::VERSION);
            Ok(())
        }
    }
}

pub(crate) fn write_json(output: Option<&PathBuf>, value: serde_json::Value) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, serde_json::to_string_pretty(&value)?)?;
    } else {
        println!("{}", serde_json::to_string_pretty(&value)?);
    }
    Ok(())
}
