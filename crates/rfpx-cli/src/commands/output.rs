//! Record formatting shared by `process` and `batch`.

use rfpx_core::schema;
use rfpx_core::ExtractionRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_record(record: &ExtractionRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &ExtractionRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(schema::fields().iter().map(|f| schema::attribute_name(f)))?;
    wtr.write_record(record.iter().map(|(_, value)| value))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ExtractionRecord) -> String {
    let width = schema::fields().iter().map(|f| f.len()).max().unwrap_or(0) + 1;
    let mut output = String::new();

    for (field, value) in record.iter() {
        let value = if value.is_empty() { "-" } else { value };
        output.push_str(&format!("{:<width$} {}\n", format!("{field}:"), value));
    }

    let (filled, total) = record.coverage();
    output.push_str(&format!("\n{filled}/{total} fields filled\n"));
    output
}
