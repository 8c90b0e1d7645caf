//! Decoding of individual `[Data]` rows.
//!
//! Rows are paired positionally with the section's header row. A row with
//! fewer values than the header is padded with empty strings; values beyond
//! the last header column are dropped. Either case is reported as a warning
//! and the record is still produced.

use indexmap::IndexMap;

use crate::core::diagnostics::Diagnostics;
use crate::core::sample_sheet::SampleSheetRecord;
use crate::core::types::Strictness;
use crate::parsing::sample_sheet::DATA_SECTION;
use crate::parsing::ParseError;
use crate::utils::validation::parse_line;

/// Pairs `[Data]` rows with the column names from the section's header row
#[derive(Debug, Clone)]
pub struct SampleSheetRecordParser<'a> {
    columns: &'a [String],
    strictness: Strictness,
}

impl<'a> SampleSheetRecordParser<'a> {
    #[must_use]
    pub fn new(columns: &'a [String]) -> Self {
        Self {
            columns,
            strictness: Strictness::default(),
        }
    }

    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Decode one row; `position` is its 1-based index after the header row.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Csv` if the row cannot be decoded. In strict mode
    /// also returns `ParseError::InvalidLine` if the number of values differs
    /// from the number of columns.
    pub fn parse(
        &self,
        line: &str,
        position: usize,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<SampleSheetRecord, ParseError> {
        let values = parse_line(line)?;
        // Empty trailing cells are export padding, not extra values
        let extra_values = values
            .iter()
            .skip(self.columns.len())
            .any(|v| !v.is_empty());

        if values.len() < self.columns.len() || extra_values {
            let reason = if values.len() < self.columns.len() {
                format!(
                    "{} values for {} columns, missing values left empty",
                    values.len(),
                    self.columns.len()
                )
            } else {
                format!(
                    "{} values for {} columns, extra values ignored",
                    values.len(),
                    self.columns.len()
                )
            };

            if self.strictness.is_strict() {
                return Err(ParseError::InvalidLine {
                    section: DATA_SECTION.to_string(),
                    line: position,
                    reason,
                });
            }
            diagnostics.warn(&format!("Sample sheet record {position}: {reason}"));
        }

        let fields: IndexMap<String, String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                (column.clone(), values.get(i).unwrap_or_default().to_string())
            })
            .collect();

        Ok(SampleSheetRecord { position, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingDiagnostics;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_record() {
        let header = columns(&["Sample_ID", "Sample_Name"]);
        let mut diagnostics = CollectingDiagnostics::new();

        let record = SampleSheetRecordParser::new(&header)
            .parse("S1,Alpha", 1, &mut diagnostics)
            .unwrap();

        assert_eq!(record.position(), 1);
        assert_eq!(record.get("Sample_ID"), Some("S1"));
        assert_eq!(record.get("Sample_Name"), Some("Alpha"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_values_are_trimmed_and_ordered() {
        let header = columns(&["Sample_ID", "index", "Description"]);
        let mut diagnostics = CollectingDiagnostics::new();

        let record = SampleSheetRecordParser::new(&header)
            .parse(" S1 , TAAGGCGA ,pan 001 ", 4, &mut diagnostics)
            .unwrap();

        let pairs: Vec<(&str, &str)> = record
            .fields()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Sample_ID", "S1"),
                ("index", "TAAGGCGA"),
                ("Description", "pan 001")
            ]
        );
    }

    #[test]
    fn test_short_row_is_padded() {
        let header = columns(&["Sample_ID", "Sample_Name", "Sample_Project"]);
        let mut diagnostics = CollectingDiagnostics::new();

        let record = SampleSheetRecordParser::new(&header)
            .parse("S1", 2, &mut diagnostics)
            .unwrap();

        assert_eq!(record.fields().len(), 3);
        assert_eq!(record.get("Sample_ID"), Some("S1"));
        assert_eq!(record.get("Sample_Name"), Some(""));
        assert_eq!(record.get("Sample_Project"), Some(""));

        let warnings = diagnostics.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Sample sheet record 2:"));
    }

    #[test]
    fn test_long_row_is_truncated() {
        let header = columns(&["Sample_ID", "Sample_Name"]);
        let mut diagnostics = CollectingDiagnostics::new();

        let record = SampleSheetRecordParser::new(&header)
            .parse("S1,Alpha,extra,values", 1, &mut diagnostics)
            .unwrap();

        assert_eq!(record.fields().len(), 2);
        assert_eq!(record.get("Sample_Name"), Some("Alpha"));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_trailing_padding_is_not_extra() {
        let header = columns(&["Sample_ID", "Sample_Name"]);
        let mut diagnostics = CollectingDiagnostics::new();

        SampleSheetRecordParser::new(&header)
            .parse("S1,Alpha,,,,", 1, &mut diagnostics)
            .unwrap();

        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_quoted_value_keeps_its_commas() {
        let header = columns(&["Sample_ID", "Sample_Name", "Description"]);
        let mut diagnostics = CollectingDiagnostics::new();

        let record = SampleSheetRecordParser::new(&header)
            .parse(r#"S1,Alpha,"heart, lung""#, 1, &mut diagnostics)
            .unwrap();

        assert_eq!(record.description(), Some("heart, lung"));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_strict_mode_rejects_width_mismatch() {
        let header = columns(&["Sample_ID", "Sample_Name"]);
        let mut diagnostics = CollectingDiagnostics::new();

        let result = SampleSheetRecordParser::new(&header)
            .with_strictness(Strictness::Strict)
            .parse("S1", 7, &mut diagnostics);

        match result {
            Err(ParseError::InvalidLine { section, line, .. }) => {
                assert_eq!(section, "Data");
                assert_eq!(line, 7);
            }
            other => panic!("expected InvalidLine, got {other:?}"),
        }
    }
}
