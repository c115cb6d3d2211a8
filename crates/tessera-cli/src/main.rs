//! Tessera Command-Line Demos
//!
//! Loads records from JSON files into a catalog or config manager, or drives
//! a pub-sub handler over the loopback transport, and prints the result.

mod commands;
mod error;
mod formatter;

use clap::{Parser, Subcommand};
use formatter::OutputFormat;
use std::path::PathBuf;
use tessera::Mode;

/// Tessera Command-Line Demos
#[derive(Parser, Debug)]
#[command(name = "tessera")]
#[command(version, about = "Tessera catalog, config, and pub-sub demos")]
pub struct Args {
    /// Output format
    #[arg(long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Insert a JSON array of entities into a catalog and list them in order
    Catalog {
        /// JSON file holding an array of objects with an integer "id"
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Add a JSON array of config records and optionally activate one
    Config {
        /// JSON file holding an array of objects with "version" and "status"
        #[arg(short, long)]
        file: PathBuf,

        /// Version to activate after loading
        #[arg(long)]
        activate: Option<i64>,
    },

    /// Run a handler through connect, subscribe, publish, and disconnect
    Pubsub {
        /// Handler mode: sub, pub, or dual
        #[arg(long, default_value = "dual")]
        mode: Mode,

        /// Channel to subscribe and publish on
        #[arg(long, default_value = "demo")]
        channel: String,

        /// Message to publish (repeatable)
        #[arg(short, long)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    tracing::debug!(format = %args.format, "starting");

    let output = match args.command {
        Command::Catalog { file } => commands::run_catalog(&file, args.format)?,
        Command::Config { file, activate } => commands::run_config(&file, activate, args.format)?,
        Command::Pubsub {
            mode,
            channel,
            message,
        } => commands::run_pubsub(mode, &channel, &message, args.format).await?,
    };

    println!("{}", output);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pubsub() {
        let argv = ["tessera", "pubsub", "--mode", "sub", "-m", "a", "-m", "b"];
        let args = Args::try_parse_from(argv).unwrap();
        match args.command {
            Command::Pubsub { mode, channel, message } => {
                assert_eq!(mode, Mode::Sub);
                assert_eq!(channel, "demo");
                assert_eq!(message, vec!["a", "b"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_pubsub_has_no_busy_flag() {
        assert!(Args::try_parse_from(["tessera", "pubsub", "--reject-busy"]).is_err());
    }
}
