//! Parsers for the metadata files an Illumina instrument writes into a run folder.
//!
//! This module provides parsers for:
//!
//! - **RunParameters.xml**: consumable RFID tags, software versions and folders
//! - **SampleSheet.csv**: section-delimited run settings and per-sample rows
//!
//! ## Example
//!
//! ```rust,no_run
//! use seqrun_meta::parsing::run_parameters::RunParametersParser;
//! use seqrun_meta::parsing::sample_sheet::SampleSheetParser;
//! use std::path::Path;
//!
//! let params = RunParametersParser::new()
//!     .parse_file(Path::new("RunParameters.xml"))
//!     .unwrap();
//! println!("{:?}", params.run_id());
//!
//! let mut parser = SampleSheetParser::new();
//! let sections = parser.parse_file(Path::new("SampleSheet.csv")).unwrap();
//! let sheet = parser.populate(sections).unwrap();
//! println!("{} samples", sheet.records().len());
//! ```
//!
//! ## Sample Sheet Sections
//!
//! | Section | Decoded into |
//! |---------|--------------|
//! | `[Header]` | typed header fields (required) |
//! | `[Manifests]` | name -> manifest file |
//! | `[Reads]` | read 1 / read 2 cycle counts |
//! | `[Settings]` | name -> value |
//! | `[Data]` | one record per sample row |
//!
//! Any other section is kept as raw lines.

use thiserror::Error;

pub mod run_parameters;
pub mod sample_sheet;
pub mod sample_sheet_record;
pub mod xml;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid XML document: {0}")]
    InvalidDocument(String),

    #[error("Sample sheet is malformed: [{0}] section missing")]
    MissingSection(String),

    #[error("Line {line} appears before any [Section] header")]
    ContentBeforeSection { line: usize },

    #[error("Line {line} is not valid UTF-8")]
    InvalidEncoding { line: usize },

    #[error("Column '{0}' appears more than once in the [Data] header")]
    DuplicateColumn(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Invalid line {line} in [{section}] section: {reason}")]
    InvalidLine {
        section: String,
        line: usize,
        reason: String,
    },
}
