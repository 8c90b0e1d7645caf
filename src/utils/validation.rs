//! Centralized line validation and helper functions for comma-delimited input.

use csv::{ReaderBuilder, StringRecord, Trim};

/// True for lines carrying no content: empty, or nothing but commas.
///
/// Spreadsheet exports pad every row out to the widest section, which leaves
/// rows such as `,,,,,,` between sections.
///
/// # Examples
///
/// ```
/// use seqrun_meta::utils::validation::is_blank_line;
///
/// assert!(is_blank_line(""));
/// assert!(is_blank_line(",,,,"));
/// assert!(!is_blank_line("151,,,"));
/// assert!(!is_blank_line(" "));
/// ```
#[must_use]
pub fn is_blank_line(line: &str) -> bool {
    line.chars().all(|c| c == ',')
}

/// Name of the section a `[Name]...` line opens, or `None` for any other line.
///
/// The name is the text between the leading `[` and the first `]`, trimmed.
/// Anything after the `]` (usually padding commas) is ignored.
#[must_use]
pub fn section_name(line: &str) -> Option<&str> {
    let (name, _) = line.strip_prefix('[')?.split_once(']')?;
    Some(name.trim())
}

/// Decode one comma-separated line into trimmed fields.
///
/// Quoted cells may contain commas and doubled quotes. Every field is kept,
/// including empty trailing cells.
///
/// # Errors
///
/// Returns `csv::Error` if the line cannot be decoded as a CSV record.
pub fn parse_line(line: &str) -> Result<StringRecord, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

/// Like [`parse_line`], with trailing empty fields dropped.
///
/// Trailing padding from spreadsheet exports is not treated as data, so
/// `Date,,,,` has a single field while `Date,27/01/2015,,` has two.
///
/// # Errors
///
/// Returns `csv::Error` if the line cannot be decoded as a CSV record.
pub fn split_fields(line: &str) -> Result<StringRecord, csv::Error> {
    let mut record = parse_line(line)?;
    let len = (0..record.len())
        .rev()
        .find(|&i| !record[i].is_empty())
        .map_or(0, |last| last + 1);
    record.truncate(len);
    Ok(record)
}
