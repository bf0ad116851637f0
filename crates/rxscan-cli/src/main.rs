//! CLI application for prescription OCR and conflict checks.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{allergy, batch, check, config, extract, session};

/// Prescription scanner - extract medicine names and check them for conflicts
#[derive(Parser)]
#[command(name = "rxscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract medicine names from a prescription (text or image)
    Extract(extract::ExtractArgs),

    /// Extract medicine names from many prescriptions
    Batch(batch::BatchArgs),

    /// Check two prescriptions for drug and allergy conflicts
    Check(check::CheckArgs),

    /// Manage recorded allergies
    Allergy(allergy::AllergyArgs),

    /// Inspect or clear the saved session
    Session(session::SessionArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Check(args) => check::run(args, config_path).await,
        Commands::Allergy(args) => allergy::run(args, config_path).await,
        Commands::Session(args) => session::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
