//! Allergy command - manage self-reported allergies.

use clap::{Args, Subcommand};
use console::style;

use super::{load_config, load_session, open_store};

/// Arguments for the allergy command.
#[derive(Args)]
pub struct AllergyArgs {
    #[command(subcommand)]
    command: AllergyCommand,
}

#[derive(Subcommand)]
enum AllergyCommand {
    /// Record an allergy
    Add {
        /// Allergy name (e.g., "penicillin")
        name: String,
    },

    /// Remove an allergy (exact name)
    Remove {
        name: String,
    },

    /// List recorded allergies
    List,
}

pub async fn run(args: AllergyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config)?;
    let mut session = load_session(&config, &mut store)?;

    match args.command {
        AllergyCommand::Add { name } => {
            session.add_allergy(&name, &mut store)?;
            println!("{} Added allergy {}", style("✓").green(), name.trim());
        }
        AllergyCommand::Remove { name } => {
            if session.remove_allergy(&name, &mut store)? {
                println!("{} Removed allergy {}", style("✓").green(), name);
            } else {
                println!("{} Allergy not found: {}", style("ℹ").blue(), name);
            }
        }
        AllergyCommand::List => {
            if session.allergies().is_empty() {
                println!("No allergies recorded.");
            }
            for allergy in session.allergies() {
                println!("{}", allergy);
            }
        }
    }

    Ok(())
}
