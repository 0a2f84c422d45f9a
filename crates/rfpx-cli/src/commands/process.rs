//! Process command - extract fields from a single RFP document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use rfpx_core::{
    create_model, schema, DocumentType, ExtractionEngine, PromptBuilder, RawDocument, RfpPipeline,
    TextExtractors,
};

use super::load_config;
use super::output::{format_record, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print the prompt that would be sent and exit without calling the model
    #[arg(long)]
    print_prompt: bool,

    /// Show how many fields were filled
    #[arg(long)]
    show_coverage: bool,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Reject unsupported types before touching the file
    DocumentType::from_path(&args.input)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    if args.print_prompt {
        let extractors = TextExtractors::with_html_config(&config.html);
        let text = extract_text(&extractors, &args.input)?;
        let prompt = PromptBuilder::new()
            .with_max_text_chars(config.extraction.max_text_chars)
            .build(schema::fields(), &text);
        println!("{}", prompt);
        return Ok(());
    }

    let model = create_model(&config.llm)?;
    let pipeline = RfpPipeline::new(
        TextExtractors::with_html_config(&config.html),
        ExtractionEngine::from_config(model, &config.extraction),
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb.set_message(format!("Extracting fields with {}...", config.llm.model));

    let result = pipeline.process(args.input.clone());
    pb.finish_and_clear();
    let record = result?;

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_coverage {
        let (filled, total) = record.coverage();
        eprintln!();
        eprintln!(
            "{} {}/{} fields filled in {:?}",
            style("ℹ").blue(),
            filled,
            total,
            start.elapsed()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn extract_text(extractors: &TextExtractors, path: &Path) -> anyhow::Result<String> {
    let document = RawDocument::from_path(path)?;
    Ok(extractors.extract(&document)?)
}
