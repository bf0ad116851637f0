//! Check command - submit two prescriptions to the conflict-check backend.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use rxscan_core::conflict::{ConflictClient, ConflictReport, RiskLevel};
use rxscan_core::extraction::{MedicineExtractor, TieredExtractor};
use rxscan_core::session::{MemoryStore, Slot};

use super::{load_config, load_session, open_store, read_prescription};

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Prescription A (text or image). Uses the saved session when omitted
    #[arg(requires = "prescription_b")]
    prescription_a: Option<PathBuf>,

    /// Prescription B (text or image)
    prescription_b: Option<PathBuf>,

    /// Print the raw JSON report
    #[arg(long)]
    json: bool,
}

pub async fn run(args: CheckArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut store = open_store(&config)?;
    let mut session = load_session(&config, &mut store)?;

    if let (Some(a), Some(b)) = (&args.prescription_a, &args.prescription_b) {
        let extractor = TieredExtractor::from_config(&config.extraction)?;
        // Fresh extractions are not written back to the saved session.
        let mut scratch = MemoryStore::new();

        for (slot, input) in [(Slot::A, a), (Slot::B, b)] {
            let text = read_prescription(input, false, &config)?;
            let result = extractor.extract(&text);
            info!("Prescription {}: {:?}", slot, result.names());
            session.record_extraction(slot, result, &mut scratch)?;
        }
    }

    let request = session.conflict_request(config.api.session_id.clone())?;
    let client = ConflictClient::new(&config.api)?;
    let report = client.check(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", format_report(&report));
    }

    Ok(())
}

fn risk_label(level: RiskLevel) -> String {
    let label = format!("{} RISK", level);
    match level {
        RiskLevel::Low => style(label).green().to_string(),
        RiskLevel::Medium => style(label).yellow().to_string(),
        RiskLevel::High => style(label).red().bold().to_string(),
    }
}

pub fn format_report(report: &ConflictReport) -> String {
    let mut output = String::new();

    output.push_str("Medicines found:\n");
    output.push_str(&format!("  Doctor A: {}\n", report.doctor_a_medicines.join(", ")));
    output.push_str(&format!("  Doctor B: {}\n", report.doctor_b_medicines.join(", ")));

    if !report.interactions.is_empty() {
        output.push_str(&format!("\nDrug interactions ({}):\n", report.interactions.len()));
        for interaction in &report.interactions {
            output.push_str(&format!("  {}\n    {}\n", interaction.pair, interaction.reason));
        }
    }

    if !report.allergy_conflicts.is_empty() {
        output.push_str(&format!(
            "\nAllergy conflicts ({}):\n",
            report.allergy_conflicts.len()
        ));
        for conflict in &report.allergy_conflicts {
            output.push_str(&format!(
                "  {} <-> {}\n    {}\n",
                conflict.medicine, conflict.allergy, conflict.reason
            ));
        }
    }

    output.push_str(&format!("\n{}\n{}", risk_label(report.risk_level), report.message));

    if !report.has_conflicts() {
        output.push_str(
            "\n\nNo conflicts detected. This is not a substitute for professional medical advice.",
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report_with_conflicts() {
        let report = ConflictReport::from_json(
            r#"{
                "doctorA_medicines": ["aspirin"],
                "doctorB_medicines": ["warfarin"],
                "interactions": [{"pair": "aspirin + warfarin", "reason": "Bleeding risk."}],
                "allergy_conflicts": [],
                "user_allergies": [],
                "risk_level": "HIGH",
                "message": "Unsafe combination detected."
            }"#,
        )
        .unwrap();

        let text = format_report(&report);
        assert!(text.contains("Doctor A: aspirin"));
        assert!(text.contains("Drug interactions (1):"));
        assert!(text.contains("aspirin + warfarin"));
        assert!(text.contains("HIGH RISK"));
        assert!(!text.contains("No conflicts detected"));
    }

    #[test]
    fn test_format_report_clean() {
        let report = ConflictReport::from_json(
            r#"{"doctorA_medicines": ["metformin"], "doctorB_medicines": ["insulin"],
                "risk_level": "LOW", "message": "No known conflicts."}"#,
        )
        .unwrap();

        let text = format_report(&report);
        assert!(text.contains("LOW RISK"));
        assert!(text.contains("No conflicts detected"));
    }
}
