use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod dump;
mod error;
mod input;
mod inspect;
mod output;
mod utils;

use error::Result;

#[derive(Parser)]
#[command(name = "certlens")]
#[command(about = "Extract fields from X.509 certificates", long_about = None)]
struct Cli {
    /// Log decoding details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the fields of a certificate
    Inspect {
        #[command(flatten)]
        config: inspect::Config,
    },
    /// Print the decoded ASN.1 structure of a certificate
    Dump {
        #[command(flatten)]
        config: dump::Config,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Inspect { config } => {
            inspect::execute(config)?;
        }
        Commands::Dump { config } => {
            dump::execute(config)?;
        }
    }

    Ok(())
}
