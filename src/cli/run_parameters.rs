use std::path::PathBuf;

use clap::Args;

use crate::cli::{render, strictness, OutputFormat};
use crate::core::run_parameters::{RfidTag, RunParameters};
use crate::core::types::Extracted;
use crate::parsing::run_parameters::RunParametersParser;

#[derive(Args)]
pub struct RunParametersArgs {
    /// RunParameters.xml file
    #[arg(required = true)]
    pub input: PathBuf,

    /// Fail on the first unreadable document or malformed value
    #[arg(long)]
    pub strict: bool,
}

/// Execute run-parameters subcommand
///
/// # Errors
///
/// Returns an error in strict mode if the document or one of its fields
/// cannot be decoded, or if JSON serialization fails.
pub fn run(args: RunParametersArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let params = RunParametersParser::new()
        .with_strictness(strictness(args.strict))
        .parse_file(&args.input)?;

    let rows = field_rows(&params);

    if verbose {
        let missing = rows.iter().filter(|(_, value)| value == "-").count();
        eprintln!(
            "Decoded {} fields from {} ({missing} missing)",
            rows.len(),
            args.input.display()
        );
    }

    match format {
        OutputFormat::Text => print_text(&args, &rows),
        OutputFormat::Json => print_json(&args, &params)?,
        OutputFormat::Tsv => print_tsv(&rows),
    }

    Ok(())
}

fn field_rows(params: &RunParameters) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("run_id", render(params.run_id())),
        ("scanner_id", render(params.scanner_id())),
        ("run_start_date", render(params.run_start_date())),
        ("application_name", render(params.application_name())),
        ("application_version", render(params.application_version())),
        ("fpga_version", render(params.fpga_version())),
        ("rta_version", render(params.rta_version())),
        ("reagent_kit_barcode", render(params.reagent_kit_barcode())),
    ];

    rows.extend(tag_rows(
        [
            "flowcell_serial_number",
            "flowcell_part_number",
            "flowcell_expiration_date",
        ],
        params.flowcell(),
    ));
    rows.extend(tag_rows(
        [
            "pr2_bottle_serial_number",
            "pr2_bottle_part_number",
            "pr2_bottle_expiration_date",
        ],
        params.pr2_bottle(),
    ));
    rows.extend(tag_rows(
        [
            "reagent_kit_serial_number",
            "reagent_kit_part_number",
            "reagent_kit_expiration_date",
        ],
        params.reagent_kit(),
    ));

    rows.push(("analysis_folder", render_path(params.analysis_folder())));
    rows.push(("output_folder", render_path(params.output_folder())));
    rows.push(("fastq_folder", render_path(params.fastq_folder())));
    rows
}

/// Serial number, part number and expiry rows for one consumable
fn tag_rows(names: [&'static str; 3], tag: &RfidTag) -> [(&'static str, String); 3] {
    let [serial, part, expiry] = names;
    [
        (serial, render(&tag.serial_number)),
        (part, render(&tag.part_number)),
        (expiry, render(&tag.expiration_date)),
    ]
}

fn render_path(path: &Extracted<PathBuf>) -> String {
    render(&path.as_ref().map(|p| p.display()))
}

fn print_text(args: &RunParametersArgs, rows: &[(&'static str, String)]) {
    println!("Run Parameters");
    println!("{}", "=".repeat(60));
    println!("\nFile: {}\n", args.input.display());

    for (name, value) in rows {
        println!("  {:<28} {value}", name.replace('_', " "));
    }
}

fn print_json(args: &RunParametersArgs, params: &RunParameters) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "path": args.input.display().to_string(),
        "run_parameters": params,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(rows: &[(&'static str, String)]) {
    println!("field\tvalue");
    for (name, value) in rows {
        println!("{name}\t{value}");
    }
}
