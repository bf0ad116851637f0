//! Session command - inspect or clear the saved session.

use clap::{Args, Subcommand};
use console::style;

use rxscan_core::session::Slot;

use super::{load_config, load_session, open_store};

/// Arguments for the session command.
#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Show saved medicines and allergies
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear saved medicines
    Clear {
        /// Also clear allergies
        #[arg(long)]
        all: bool,
    },
}

pub async fn run(args: SessionArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config)?;
    let mut session = load_session(&config, &mut store)?;

    match args.command {
        SessionCommand::Show { json: true } => {
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        SessionCommand::Show { json: false } => {
            for slot in Slot::ALL {
                let medicines = session.medicines(slot);
                if medicines.is_empty() {
                    println!("Prescription {}: (none)", slot);
                } else {
                    println!("Prescription {}: {}", slot, medicines.join(", "));
                }
            }
            println!("Allergies: {}", session.allergies().join(", "));
            println!(
                "Ready for conflict check: {}",
                if session.can_check() { "yes" } else { "no" }
            );
        }
        SessionCommand::Clear { all } => {
            if all {
                session.clear_all(&mut store)?;
                println!("{} Cleared medicines and allergies", style("✓").green());
            } else {
                session.clear_medicines(&mut store)?;
                println!("{} Cleared medicines", style("✓").green());
            }
        }
    }

    Ok(())
}
