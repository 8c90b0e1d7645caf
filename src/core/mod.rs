//! Core data types for sequencing run metadata.
//!
//! This module provides the records the parsers produce:
//!
//! - [`RunParameters`](run_parameters::RunParameters): consumables, software versions and
//!   folders from `RunParameters.xml`
//! - [`SampleSheet`](sample_sheet::SampleSheet): header values, manifests, settings, read
//!   cycles and sample rows from `SampleSheet.csv`
//! - [`Extracted`](types::Extracted): the per-field outcome of a best-effort lookup
//! - [`Diagnostics`](diagnostics::Diagnostics): where recoverable problems are reported
//!
//! ## Field Outcomes
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | `Value(T)` | Found and decoded |
//! | `Absent` | Not present in the source |
//! | `Malformed(reason)` | Present but could not be decoded |

pub mod diagnostics;
pub mod run_parameters;
pub mod sample_sheet;
pub mod types;
