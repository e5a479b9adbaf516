//! Imprint CLI - Content fingerprinting and registry client.

use std::path::PathBuf;
use std::process;

use clap::{error::ErrorKind, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

/// Default registry server.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  64  Usage error (invalid arguments)
  65  Data error (undecodable image, malformed hash)
  66  Input file not found or unreadable
  69  Registry server unavailable";

#[derive(Parser)]
#[command(name = "imprint")]
#[command(author, version, about = "Content fingerprinting and first-come registry client", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the exact and perceptual hash of an image
    Fingerprint {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print the fingerprint as JSON
        #[arg(long)]
        json: bool,
    },

    /// Hamming distance between two images or two perceptual hashes
    Distance {
        /// Image path or bit string
        #[arg(value_name = "A")]
        a: String,

        /// Image path or bit string
        #[arg(value_name = "B")]
        b: String,

        /// Threshold used to report a match
        #[arg(long, default_value_t = imprint_core::DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: u32,
    },

    /// Register an image with a registry server
    Register {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Registrant identifier
        #[arg(long)]
        owner: String,

        /// One-time verification code
        #[arg(long)]
        code: String,

        /// Device fingerprint (defaults to one derived from this machine)
        #[arg(long)]
        device: Option<String>,

        /// Registry server URL
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },

    /// Ask a registry server who registered an image first
    Claim {
        /// Path to the image file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Identity asserting ownership
        #[arg(long)]
        claimant: String,

        /// Claim category, e.g. "copyright"
        #[arg(long)]
        claim_type: Option<String>,

        /// Number of supporting documents
        #[arg(long)]
        evidence: Option<u32>,

        /// Registry server URL
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::USAGE_ERROR,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let quiet = cli.quiet;
    let result = match cli.command {
        Commands::Fingerprint { file, json } => commands::fingerprint::execute(file, json, quiet),
        Commands::Distance { a, b, threshold } => {
            commands::distance::execute(&a, &b, threshold, quiet)
        }
        Commands::Register {
            file,
            owner,
            code,
            device,
            server,
        } => commands::register::execute(file, owner, code, device, server, quiet).await,
        Commands::Claim {
            file,
            claimant,
            claim_type,
            evidence,
            server,
        } => commands::claim::execute(file, claimant, claim_type, evidence, server, quiet).await,
    };

    if let Err(e) = result {
        let exit = ExitCode::from_anyhow(&e);
        if let Some(message) = exit.message {
            eprintln!("{} {}", "error:".red().bold(), message);
        }
        process::exit(exit.code);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "imprint=debug,imprint_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
