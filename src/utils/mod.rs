//! Shared helpers for the parsers.

pub mod dates;
pub mod validation;
