use std::path::PathBuf;

use clap::Args;
use indexmap::IndexMap;

use crate::cli::{render, strictness, OutputFormat};
use crate::core::sample_sheet::{SampleSheet, SampleSheetRecord};
use crate::parsing::sample_sheet::SampleSheetParser;

#[derive(Args)]
pub struct SampleSheetArgs {
    /// SampleSheet.csv file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Fail on skipped lines, malformed values and short or long data rows
    #[arg(long)]
    pub strict: bool,

    /// Also print the raw lines of every section (text output only)
    #[arg(long)]
    pub sections: bool,
}

/// Execute sample-sheet subcommand
///
/// # Errors
///
/// Returns an error if the file cannot be read, has no `[Header]` section or
/// has content before its first section. In strict mode any problem that is
/// otherwise only reported also fails the command.
pub fn run(args: SampleSheetArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let sheet = SampleSheetParser::new()
        .with_strictness(strictness(args.strict))
        .read_file(&args.input)?;

    if verbose {
        eprintln!(
            "Read {} sections and {} samples from {}",
            sheet.sections().len(),
            sheet.records().len(),
            args.input.display()
        );
    }

    match format {
        OutputFormat::Text => print_text(&args, &sheet),
        OutputFormat::Json => print_json(&args, &sheet)?,
        OutputFormat::Tsv => print_tsv(sheet.records()),
    }

    Ok(())
}

fn print_text(args: &SampleSheetArgs, sheet: &SampleSheet) {
    let header = sheet.header();

    println!("Sample Sheet");
    println!("{}", "=".repeat(60));
    println!("\nFile: {}", args.input.display());

    println!("\nHeader:");
    println!("  IEM file version:  {}", render(&header.file_version));
    println!("  Investigator:      {}", render(&header.investigator_name));
    println!("  Experiment:        {}", render(&header.experiment_name));
    println!("  Date:              {}", render(&header.date));
    println!("  Workflow:          {}", render(&header.workflow));
    println!("  Application:       {}", render(&header.application));
    println!("  Assay:             {}", render(&header.assay));
    println!("  Description:       {}", render(&header.description));
    println!("  Chemistry:         {}", render(&header.chemistry));

    let investigators = sheet.split_investigator_name();
    if !investigators.is_empty() {
        println!("  Investigators:     {}", investigators.join(", "));
    }

    println!("\nReads:");
    println!("  Read 1 cycles: {}", sheet.cycles_read1());
    println!("  Read 2 cycles: {}", sheet.cycles_read2());

    print_pairs("Manifests", sheet.manifests());
    print_pairs("Settings", sheet.settings());

    println!("\nSamples ({}):", sheet.records().len());
    for record in sheet.records() {
        println!(
            "  {:>3}. {:<20} {:<20} {}",
            record.position(),
            record.sample_id().unwrap_or("-"),
            record.sample_name().unwrap_or("-"),
            index_pair(record)
        );
    }

    if args.sections {
        for (name, lines) in sheet.sections() {
            println!("\n[{name}] ({} lines)", lines.len());
            for line in lines {
                println!("  {line}");
            }
        }
    }
}

fn print_pairs(title: &str, pairs: &IndexMap<String, String>) {
    if pairs.is_empty() {
        return;
    }

    println!("\n{title}:");
    for (key, value) in pairs {
        println!("  {key}: {value}");
    }
}

/// `index` and `index2` joined with `+`, skipping whichever is empty
fn index_pair(record: &SampleSheetRecord) -> String {
    [record.index(), record.index2()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("+")
}

fn print_json(args: &SampleSheetArgs, sheet: &SampleSheet) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "path": args.input.display().to_string(),
        "investigators": sheet.split_investigator_name(),
        "sample_sheet": sheet,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One line per record, columns taken from the first record
fn print_tsv(records: &[SampleSheetRecord]) {
    let Some(first) = records.first() else {
        return;
    };

    let columns: Vec<&str> = first.fields().keys().map(String::as_str).collect();
    println!("position\t{}", columns.join("\t"));

    for record in records {
        let values: Vec<&str> = columns
            .iter()
            .map(|column| record.get(column).unwrap_or_default())
            .collect();
        println!("{}\t{}", record.position(), values.join("\t"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingDiagnostics;

    fn sheet(text: &str) -> SampleSheet {
        let mut parser = SampleSheetParser::new().with_diagnostics(CollectingDiagnostics::new());
        let sections = parser.parse_reader(text.as_bytes()).unwrap();
        parser.populate(sections).unwrap()
    }

    #[test]
    fn test_index_pair() {
        let sheet = sheet(
            "[Header]\n[Data]\nSample_ID,index,index2\nS1,TAAGGCGA,TAGATCGC\nS2,CGTACTAG,\nS3,,\n",
        );
        let pairs: Vec<String> = sheet.records().iter().map(index_pair).collect();

        assert_eq!(pairs, vec!["TAAGGCGA+TAGATCGC", "CGTACTAG", ""]);
    }
}
