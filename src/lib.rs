//! # seqrun-meta
//!
//! A library for reading the metadata an Illumina sequencer leaves in its run folder.
//!
//! Two files are supported:
//!
//! - **`RunParameters.xml`**: consumable identifiers (flowcell, PR2 bottle, reagent
//!   kit) with their expiry dates, control software and firmware versions, the run
//!   ID, start date and output folders
//! - **`SampleSheet.csv`**: the sectioned Illumina Experiment Manager sample sheet,
//!   with its `[Header]` values, manifests, settings, read lengths and sample rows
//!
//! Both parsers are best effort. A missing or undecodable value affects only that
//! value: it is reported through [`Diagnostics`] and recorded as
//! [`Extracted::Absent`] or [`Extracted::Malformed`]. Setting
//! [`Strictness::Strict`] turns those reports into errors instead.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use seqrun_meta::{RunParametersParser, SampleSheetParser};
//!
//! let params = RunParametersParser::new()
//!     .parse_file(Path::new("RunParameters.xml"))
//!     .unwrap();
//! if let Some(serial) = params.flowcell().serial_number.value() {
//!     println!("Flowcell {serial}");
//! }
//!
//! let sheet = SampleSheetParser::new()
//!     .read_file(Path::new("SampleSheet.csv"))
//!     .unwrap();
//! for record in sheet.records() {
//!     println!("{:?} {:?}", record.sample_id(), record.index());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Decoded records and the types describing per-field outcomes
//! - [`parsing`]: Parsers for `RunParameters.xml` and `SampleSheet.csv`
//! - [`utils`]: Date formats and line helpers shared by the parsers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::diagnostics::{CollectingDiagnostics, Diagnostics, TracingDiagnostics};
pub use crate::core::run_parameters::{RfidTag, RunParameters};
pub use crate::core::sample_sheet::{SampleSheet, SampleSheetHeader, SampleSheetRecord};
pub use crate::core::types::*;
pub use crate::parsing::run_parameters::RunParametersParser;
pub use crate::parsing::sample_sheet::{SampleSheetParser, SampleSheetSections};
pub use crate::parsing::sample_sheet_record::SampleSheetRecordParser;
pub use crate::parsing::ParseError;
