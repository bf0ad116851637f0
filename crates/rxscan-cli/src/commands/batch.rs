//! Batch extraction over many prescription files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, warn};

use rxscan_core::extraction::{ExtractionResult, MatchTier, MedicineExtractor, TieredExtractor};
use rxscan_core::models::config::RxConfig;

use super::extract::OutputFormat;
use super::{load_config, read_prescription};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files
    #[arg(required = true)]
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one file.
#[derive(Debug, Serialize)]
struct FileResult {
    path: PathBuf,
    medicines: Vec<String>,
    tier: Option<MatchTier>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let extractor = TieredExtractor::from_config(&config.extraction)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = extract_file(&path, &extractor, &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => results.push(FileResult {
                path,
                tier: result.tier,
                medicines: result.into_names(),
                error: None,
                processing_time_ms,
            }),
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {}", path.display(), e);
                results.push(FileResult {
                    path,
                    medicines: Vec::new(),
                    tier: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                });
            }
            Err(e) => {
                pb.abandon();
                error!("Failed to process {}: {}", path.display(), e);
                anyhow::bail!("Processing failed for {}: {}", path.display(), e);
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Csv => print!("{}", format_csv(&results)?),
        OutputFormat::Text => print_text(&results),
    }

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    eprintln!(
        "{} Processed {} files in {:?} ({} failed)",
        style("✓").green(),
        results.len(),
        start.elapsed(),
        failed
    );

    Ok(())
}

fn extract_file(
    path: &Path,
    extractor: &TieredExtractor,
    config: &RxConfig,
) -> anyhow::Result<ExtractionResult> {
    let text = read_prescription(path, false, config)?;
    Ok(extractor.extract(&text))
}

fn format_csv(results: &[FileResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["file", "status", "tier", "medicines", "processing_time_ms", "error"])?;

    for result in results {
        let status = if result.error.is_some() { "error" } else { "success" };
        let tier = result
            .tier
            .map(|t| format!("{:?}", t).to_lowercase())
            .unwrap_or_default();

        wtr.write_record([
            result.path.display().to_string().as_str(),
            status,
            tier.as_str(),
            result.medicines.join(";").as_str(),
            result.processing_time_ms.to_string().as_str(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn print_text(results: &[FileResult]) {
    for result in results {
        match (&result.error, result.medicines.is_empty()) {
            (Some(e), _) => println!("{}: {} {}", result.path.display(), style("error").red(), e),
            (None, true) => println!("{}: no medicines detected", result.path.display()),
            (None, false) => println!("{}: {}", result.path.display(), result.medicines.join(", ")),
        }
    }
}
