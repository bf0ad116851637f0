//! Extract command - medicine names from a single prescription.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rxscan_core::extraction::{ExtractionResult, MedicineExtractor, TieredExtractor};
use rxscan_core::session::Slot;

use super::{load_config, load_session, open_store, read_prescription};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (text or image), or "-" for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Record the result as prescription A or B in the saved session
    #[arg(short, long, value_enum)]
    slot: Option<SlotArg>,

    /// Treat the input as an image regardless of extension
    #[arg(long)]
    image: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SlotArg {
    A,
    B,
}

impl From<SlotArg> for Slot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::A => Slot::A,
            SlotArg::B => Slot::B,
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let extractor = TieredExtractor::from_config(&config.extraction)?;

    info!("Processing prescription: {}", args.input.display());

    let text = read_prescription(&args.input, args.image, &config)?;
    let result = extractor.extract(&text);

    println!("{}", format_result(&result, args.format)?);

    if let Some(slot) = args.slot {
        let slot = Slot::from(slot);
        let mut store = open_store(&config)?;
        let mut session = load_session(&config, &mut store)?;
        session.record_extraction(slot, result, &mut store)?;

        eprintln!(
            "{} Saved as prescription {} in {}",
            style("✓").green(),
            slot,
            store.path().display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["medicine"])?;
    for name in result.names() {
        wtr.write_record([name])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data.trim_end().to_string())
}

fn format_text(result: &ExtractionResult) -> String {
    if result.is_empty() {
        return format!(
            "{} No medicines detected. You can add them manually if needed.",
            style("ℹ").blue()
        );
    }

    let mut output = format!("Detected medicines ({}):", result.len());
    for name in result.names() {
        output.push_str(&format!("\n  - {}", name));
    }
    output
}
