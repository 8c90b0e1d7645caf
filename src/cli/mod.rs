//! Command-line interface for seqrun-meta.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **run-parameters**: Decode a `RunParameters.xml` file
//! - **sample-sheet**: Decode a `SampleSheet.csv` file
//!
//! ## Usage
//!
//! ```text
//! # Show consumables and software versions for a run
//! seqrun-meta run-parameters /runs/150127_M00766_0086/RunParameters.xml
//!
//! # List samples as TSV for scripting
//! seqrun-meta sample-sheet SampleSheet.csv --format tsv
//!
//! # Fail instead of warning on malformed values
//! seqrun-meta sample-sheet SampleSheet.csv --strict --format json
//! ```

use clap::{Parser, Subcommand};

use crate::core::types::{Extracted, Strictness};

pub mod run_parameters;
pub mod sample_sheet;

#[derive(Parser)]
#[command(name = "seqrun-meta")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Extract run metadata from Illumina RunParameters.xml and SampleSheet.csv files")]
#[command(
    long_about = "seqrun-meta decodes the metadata files an Illumina instrument writes into its run folder.\n\nIt reports:\n- Flowcell, PR2 bottle and reagent kit identifiers and expiry dates\n- Instrument software versions and run folders\n- Sample sheet header values, manifests, settings, read cycles and samples"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a RunParameters.xml file
    RunParameters(run_parameters::RunParametersArgs),

    /// Decode a SampleSheet.csv file
    SampleSheet(sample_sheet::SampleSheetArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

pub(crate) fn strictness(strict: bool) -> Strictness {
    if strict {
        Strictness::Strict
    } else {
        Strictness::Lenient
    }
}

/// Render a field for text and TSV output
pub(crate) fn render<T: std::fmt::Display>(value: &Extracted<T>) -> String {
    match value {
        Extracted::Value(v) => v.to_string(),
        Extracted::Absent => "-".to_string(),
        Extracted::Malformed(reason) => format!("<malformed: {reason}>"),
    }
}
