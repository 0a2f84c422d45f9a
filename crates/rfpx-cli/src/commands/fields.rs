//! Fields command - print the extraction schema.

use clap::Args;
use serde::Serialize;

use rfpx_core::schema;

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FieldEntry {
    name: &'static str,
    attribute: String,
}

pub fn run(args: FieldsArgs) -> anyhow::Result<()> {
    let entries: Vec<FieldEntry> = schema::fields()
        .iter()
        .map(|&name| FieldEntry {
            name,
            attribute: schema::attribute_name(name),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for (i, entry) in entries.iter().enumerate() {
        println!("{:>2}. {:<width$}  {}", i + 1, entry.name, entry.attribute);
    }

    Ok(())
}
