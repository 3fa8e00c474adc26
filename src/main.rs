mod analyzer;
mod commands;
mod config;
mod domain;
mod exec;
mod speed;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pulsecheck",
    version,
    about = "Concurrent machine diagnostics with an AI-assisted health analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full run: snapshot + probe battery + report + health analysis
    Check {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Print the report without sending it for analysis
        #[arg(long)]
        no_analyze: bool,

        /// Path to config file (default: ~/.config/pulsecheck/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Collect and print the machine snapshot only
    Snapshot {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Run the probe battery only (no credential needed)
    Probes {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Path to config file (default: ~/.config/pulsecheck/config.toml)
        #[arg(long)]
        config: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            format,
            no_analyze,
            config,
        } => commands::check::run(&format, no_analyze, config.as_deref()),
        Commands::Snapshot { format } => commands::snapshot::run(&format),
        Commands::Probes { format, config } => {
            commands::probes::run(&format, config.as_deref())
        }
    }
}
