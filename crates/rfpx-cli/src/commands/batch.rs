//! Batch processing command for multiple RFP documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use rfpx_core::{create_model, BatchItem, DocumentType, RfpPipeline};

use super::load_config;
use super::output::{format_record, OutputFormat};

/// File written by `--combine`.
const COMBINED_OUTPUT: &str = "rfp_structured_data.json";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Extract one record from the text of all files together
    #[arg(long)]
    combine: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let matches: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    // Combined runs see every match so unsupported files are reported as skipped
    let files: Vec<PathBuf> = if args.combine {
        matches
    } else {
        matches
            .into_iter()
            .filter(|p| DocumentType::from_path(p).is_ok())
            .collect()
    };

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let model = create_model(&config.llm)?;
    let pipeline = RfpPipeline::from_config(model, &config);

    if args.combine {
        return run_combined(&pipeline, files, &args, start);
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let results = pipeline.run_batch_with(files, |_| pb.inc(1));
    pb.finish_with_message("Complete");

    let (successful, failed): (Vec<&BatchItem>, Vec<&BatchItem>) =
        results.iter().partition(|r| r.result.is_ok());

    if let Some(output_dir) = &args.output_dir {
        for item in &successful {
            if let Ok(record) = &item.result {
                let output_path = output_dir.join(output_file_name(&item.label, args.format));
                fs::write(&output_path, format_record(record, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    } else {
        for item in &successful {
            if let Ok(record) = &item.result {
                println!("{}", style(&item.label).bold());
                println!("{}", format_record(record, args.format)?);
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for item in &failed {
            if let Err(e) = &item.result {
                println!("  - {}: {}", item.label, e);
            }
        }
    }

    Ok(())
}

fn run_combined<M: rfpx_core::CompletionModel>(
    pipeline: &RfpPipeline<M>,
    files: Vec<PathBuf>,
    args: &BatchArgs,
    start: Instant,
) -> anyhow::Result<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(format!("Extracting fields from {} combined files...", files.len()));

    let result = pipeline.run_combined(files);
    pb.finish_and_clear();
    let combined = result?;

    for skipped in &combined.skipped {
        println!(
            "{} Skipped {}: {}",
            style("!").yellow(),
            skipped.label,
            skipped.error
        );
    }

    let record = combined
        .record()
        .ok_or_else(|| anyhow::anyhow!("Combined run produced no record"))?;

    let output_path = args
        .output_dir
        .as_deref()
        .unwrap_or_else(|| Path::new("."))
        .join(COMBINED_OUTPUT);
    fs::write(&output_path, serde_json::to_string_pretty(record)?)?;

    let (filled, total) = record.coverage();
    println!(
        "{} Combined {} files in {:?}, {}/{} fields filled",
        style("✓").green(),
        combined.included.len(),
        start.elapsed(),
        filled,
        total
    );
    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// `bid.pdf` -> `bid.pdf.json`; the source extension is kept.
fn output_file_name(label: &str, format: OutputFormat) -> String {
    let name = Path::new(label)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("rfp");
    format!("{}.{}", name, format.extension())
}

fn write_summary(path: &Path, results: &[BatchItem]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "bid_number",
        "title",
        "due_date",
        "fields_filled",
        "processing_time_ms",
        "error",
    ])?;

    for item in results {
        let filename = item
            .file_path
            .as_deref()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or(&item.label);

        match &item.result {
            Ok(record) => {
                let (filled, total) = record.coverage();
                wtr.write_record([
                    filename,
                    "success",
                    record.get("Bid Number").unwrap_or_default(),
                    record.get("Title").unwrap_or_default(),
                    record.get("Due Date").unwrap_or_default(),
                    &format!("{}/{}", filled, total),
                    &item.processing_time_ms.to_string(),
                    "",
                ])?;
            }
            Err(e) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    &item.processing_time_ms.to_string(),
                    &e.to_string(),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_keep_source_extension() {
        let pdf = output_file_name("/data/bids/bid.pdf", OutputFormat::Json);
        let html = output_file_name("/data/bids/bid.html", OutputFormat::Json);
        assert_eq!(pdf, "bid.pdf.json");
        assert_eq!(html, "bid.html.json");
        assert_eq!(output_file_name("notice.HTM", OutputFormat::Csv), "notice.HTM.csv");
    }
}
