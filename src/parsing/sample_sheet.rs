//! Parser for Illumina Experiment Manager sample sheets (`SampleSheet.csv`).
//!
//! Parsing happens in two phases. [`SampleSheetParser::parse_reader`] splits
//! the file into named sections of raw lines, then
//! [`SampleSheetParser::populate`] decodes the sections it knows about.
//!
//! ```text
//! [Header],,,
//! IEMFileVersion,4,,
//! Investigator Name,jsmith,,
//! [Reads],,,
//! 151,,,
//! 151,,,
//! [Data],,,
//! Sample_ID,Sample_Name,index,index2
//! S1,Alpha,TAAGGCGA,TAGATCGC
//! ```

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use csv::StringRecord;
use indexmap::IndexMap;
use tracing::debug;

use crate::core::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::core::sample_sheet::{SampleSheet, SampleSheetHeader, SampleSheetRecord};
use crate::core::types::{Extracted, Strictness};
use crate::parsing::sample_sheet_record::SampleSheetRecordParser;
use crate::parsing::ParseError;
use crate::utils::dates::{parse_date, SAMPLE_SHEET_DATE_FORMAT};
use crate::utils::validation::{is_blank_line, section_name, split_fields};

pub const HEADER_SECTION: &str = "Header";
pub const MANIFESTS_SECTION: &str = "Manifests";
pub const READS_SECTION: &str = "Reads";
pub const SETTINGS_SECTION: &str = "Settings";
pub const DATA_SECTION: &str = "Data";

/// Raw lines of each section, as produced by the first parsing phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSheetSections {
    sections: IndexMap<String, Vec<String>>,
}

impl SampleSheetSections {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    /// Section names in the order they were declared
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

}

enum ScanState {
    NoSection,
    InSection(String),
}

/// Decodes `SampleSheet.csv` into a [`SampleSheet`]
#[derive(Debug, Default)]
pub struct SampleSheetParser<D = TracingDiagnostics> {
    diagnostics: D,
    strictness: Strictness,
}

impl SampleSheetParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Diagnostics> SampleSheetParser<D> {
    /// Report problems to `diagnostics` instead of the `tracing` subscriber
    pub fn with_diagnostics<E: Diagnostics>(self, diagnostics: E) -> SampleSheetParser<E> {
        SampleSheetParser {
            diagnostics,
            strictness: self.strictness,
        }
    }

    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Parse and populate a sample sheet file in one call
    ///
    /// # Errors
    ///
    /// Returns any error from [`parse_file`](Self::parse_file) or
    /// [`populate`](Self::populate).
    pub fn read_file(&mut self, path: &Path) -> Result<SampleSheet, ParseError> {
        let sections = self.parse_file(path)?;
        self.populate(sections)
    }

    /// Split a sample sheet file into sections
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the file cannot be read, or
    /// `ParseError::ContentBeforeSection` if a content line precedes the first
    /// `[Section]` header. In strict mode also returns
    /// `ParseError::InvalidEncoding` for a line that is not valid UTF-8.
    pub fn parse_file(&mut self, path: &Path) -> Result<SampleSheetSections, ParseError> {
        debug!(path = %path.display(), "Parsing sample sheet");
        let reader = File::open(path).map(BufReader::new)?;
        self.parse_reader(reader)
    }

    /// Split sample sheet text into sections
    ///
    /// Blank and comma-only lines are dropped. A `[Name]` line opens a new
    /// section; declaring the same name twice starts its line list afresh.
    /// Bytes that are not valid UTF-8 are replaced and reported as a warning.
    ///
    /// # Errors
    ///
    /// See [`parse_file`](Self::parse_file).
    pub fn parse_reader<R: BufRead>(
        &mut self,
        mut reader: R,
    ) -> Result<SampleSheetSections, ParseError> {
        let mut sections: IndexMap<String, Vec<String>> = IndexMap::new();
        let mut state = ScanState::NoSection;
        let mut buf = Vec::new();
        let mut line_num = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_num += 1;

            let decoded = String::from_utf8_lossy(&buf);
            if matches!(decoded, Cow::Owned(_)) {
                if self.strictness.is_strict() {
                    return Err(ParseError::InvalidEncoding { line: line_num });
                }
                self.diagnostics.warn(&format!(
                    "Sample sheet line {line_num} is not valid UTF-8, undecodable bytes replaced"
                ));
            }

            let line = decoded.strip_suffix('\n').unwrap_or(&decoded);
            let mut line = line.strip_suffix('\r').unwrap_or(line);
            if line_num == 1 {
                line = line.trim_start_matches('\u{feff}');
            }

            if is_blank_line(line) {
                continue;
            }

            if let Some(name) = section_name(line) {
                sections.insert(name.to_string(), Vec::new());
                state = ScanState::InSection(name.to_string());
                continue;
            }

            match &state {
                ScanState::NoSection => {
                    return Err(ParseError::ContentBeforeSection { line: line_num });
                }
                ScanState::InSection(name) => {
                    sections
                        .entry(name.clone())
                        .or_default()
                        .push(line.to_string());
                }
            }
        }

        debug!(sections = sections.len(), "Split sample sheet into sections");
        Ok(SampleSheetSections { sections })
    }

    /// Decode the sections produced by [`parse_reader`](Self::parse_reader)
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingSection` if there is no `[Header]` section.
    /// In strict mode also returns `ParseError::InvalidLine` for lines that
    /// would otherwise be skipped and `ParseError::InvalidField` for values
    /// that do not decode.
    pub fn populate(&mut self, sections: SampleSheetSections) -> Result<SampleSheet, ParseError> {
        let Some(header_lines) = sections.get(HEADER_SECTION) else {
            self.diagnostics
                .error("Sample sheet is malformed. Header section missing.");
            return Err(ParseError::MissingSection(HEADER_SECTION.to_string()));
        };

        let mut sheet = SampleSheet {
            header: self.decode_header(header_lines)?,
            ..SampleSheet::default()
        };

        if let Some(lines) = sections.get(MANIFESTS_SECTION) {
            sheet.manifests = self.decode_pairs(MANIFESTS_SECTION, lines)?;
        }

        if let Some(lines) = sections.get(READS_SECTION) {
            (sheet.cycles_read1, sheet.cycles_read2) = self.decode_reads(lines)?;
        }

        if let Some(lines) = sections.get(SETTINGS_SECTION) {
            sheet.settings = self.decode_pairs(SETTINGS_SECTION, lines)?;
        }

        if let Some(lines) = sections.get(DATA_SECTION) {
            sheet.records = self.decode_records(lines)?;
        }

        debug!(
            records = sheet.records.len(),
            manifests = sheet.manifests.len(),
            settings = sheet.settings.len(),
            "Populated sample sheet"
        );

        sheet.sections = sections.sections;
        Ok(sheet)
    }

    fn decode_header(&mut self, lines: &[String]) -> Result<SampleSheetHeader, ParseError> {
        let mut header = SampleSheetHeader::default();

        for (index, line) in lines.iter().enumerate() {
            let fields = split_fields(line)?;
            let Some((key, value)) = key_value(&fields) else {
                self.skip_line(HEADER_SECTION, index + 1, &fields)?;
                continue;
            };

            let text = Extracted::Value(value.to_string());
            match key {
                "IEMFileVersion" => {
                    header.file_version = self.check(key, Extracted::from(value.parse::<u32>()))?;
                }
                "Investigator Name" => header.investigator_name = text,
                "Experiment Name" => header.experiment_name = text,
                "Date" => {
                    let date = Extracted::from(parse_date(value, SAMPLE_SHEET_DATE_FORMAT));
                    header.date = self.check(key, date)?;
                }
                "Workflow" => header.workflow = text,
                "Application" => header.application = text,
                "Assay" => header.assay = text,
                "Description" => header.description = text,
                "Chemistry" => header.chemistry = text,
                _ => debug!(key, "Ignoring unrecognised sample sheet header key"),
            }
        }

        Ok(header)
    }

    /// Decode `name,value` lines into an ordered map
    fn decode_pairs(
        &mut self,
        section: &str,
        lines: &[String],
    ) -> Result<IndexMap<String, String>, ParseError> {
        let mut pairs = IndexMap::new();

        for (index, line) in lines.iter().enumerate() {
            let fields = split_fields(line)?;
            match key_value(&fields) {
                Some((key, value)) => {
                    pairs.insert(key.to_string(), value.to_string());
                }
                None => self.skip_line(section, index + 1, &fields)?,
            }
        }

        Ok(pairs)
    }

    /// Cycle counts for read 1 and read 2 from the first field of the first two lines
    fn decode_reads(&mut self, lines: &[String]) -> Result<(u32, u32), ParseError> {
        let mut cycles = [0_u32; 2];

        for (index, line) in lines.iter().take(2).enumerate() {
            let fields = split_fields(line)?;
            let raw = fields.get(0).unwrap_or_default();
            let field = format!("read {} cycles", index + 1);
            let count = Extracted::from(raw.parse::<u32>());
            if let Extracted::Value(count) = self.check(&field, count)? {
                cycles[index] = count;
            }
        }

        Ok((cycles[0], cycles[1]))
    }

    fn decode_records(&mut self, lines: &[String]) -> Result<Vec<SampleSheetRecord>, ParseError> {
        let Some((header_line, rows)) = lines.split_first() else {
            return Ok(Vec::new());
        };

        let columns: Vec<String> = split_fields(header_line)?
            .iter()
            .map(String::from)
            .collect();
        self.check_columns(&columns)?;

        let record_parser = SampleSheetRecordParser::new(&columns).with_strictness(self.strictness);

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            records.push(record_parser.parse(row, index + 1, &mut self.diagnostics)?);
        }

        Ok(records)
    }

    /// A repeated column keeps only its last value in each record
    fn check_columns(&mut self, columns: &[String]) -> Result<(), ParseError> {
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                continue;
            }
            if !columns[i + 1..].contains(column) {
                continue;
            }

            if self.strictness.is_strict() {
                return Err(ParseError::DuplicateColumn(column.clone()));
            }
            self.diagnostics.warn(&format!(
                "[{DATA_SECTION}] header repeats column '{column}', only its last value is kept"
            ));
        }
        Ok(())
    }

    fn skip_line(
        &mut self,
        section: &str,
        line_num: usize,
        fields: &StringRecord,
    ) -> Result<(), ParseError> {
        let key = fields.get(0).unwrap_or_default();
        let reason = format!("missing value for '{key}', line ignored");

        if self.strictness.is_strict() {
            return Err(ParseError::InvalidLine {
                section: section.to_string(),
                line: line_num,
                reason,
            });
        }

        self.diagnostics
            .warn(&format!("[{section}] line {line_num}: {reason}"));
        Ok(())
    }

    fn check<T>(&mut self, field: &str, value: Extracted<T>) -> Result<Extracted<T>, ParseError> {
        if let Extracted::Malformed(reason) = &value {
            self.diagnostics
                .error(&format!("Could not convert {field}: {reason}"));
            if self.strictness.is_strict() {
                return Err(ParseError::InvalidField {
                    field: field.to_string(),
                    reason: reason.clone(),
                });
            }
        }
        Ok(value)
    }
}

/// First two fields of a line, if it has at least two
fn key_value(fields: &StringRecord) -> Option<(&str, &str)> {
    match (fields.get(0), fields.get(1)) {
        (Some(key), Some(value)) => Some((key, value)),
        _ => None,
    }
}

/// Parse and populate a sample sheet, reporting problems through `tracing`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or a structural error
/// if the sheet has no `[Header]` section or has content before its first section.
pub fn parse_sample_sheet_file(path: &Path) -> Result<SampleSheet, ParseError> {
    SampleSheetParser::new().read_file(path)
}
