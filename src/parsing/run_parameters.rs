//! Parser for `RunParameters.xml`.
//!
//! Every field is looked up independently. A missing tag or an undecodable
//! value is reported to the parser's [`Diagnostics`] and leaves that one field
//! `Absent` or `Malformed`; the remaining fields are still filled in.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::core::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::core::run_parameters::{RfidTag, RunParameters};
use crate::core::types::{Extracted, Strictness};
use crate::parsing::xml::XmlDocument;
use crate::parsing::ParseError;
use crate::utils::dates::{parse_date, strip_time, COMPACT_DATE_FORMAT, EXPIRY_DATE_FORMAT};

const FLOWCELL_TAG: &str = "FlowcellRFIDTag";
const PR2_BOTTLE_TAG: &str = "PR2BottleRFIDTag";
const REAGENT_KIT_TAG: &str = "ReagentKitRFIDTag";
const SETUP_TAG: &str = "Setup";
const ROOT_TAG: &str = "RunParameters";

/// Path of the base calls relative to the analysis folder
const BASECALLS_SUBPATH: [&str; 3] = ["Data", "Intensities", "BaseCalls"];

/// Decodes `RunParameters.xml` into [`RunParameters`]
#[derive(Debug, Default)]
pub struct RunParametersParser<D = TracingDiagnostics> {
    diagnostics: D,
    strictness: Strictness,
}

impl RunParametersParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: Diagnostics> RunParametersParser<D> {
    /// Report problems to `diagnostics` instead of the `tracing` subscriber
    pub fn with_diagnostics<E: Diagnostics>(self, diagnostics: E) -> RunParametersParser<E> {
        RunParametersParser {
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

    /// Parse a `RunParameters.xml` file
    ///
    /// # Errors
    ///
    /// Never fails in lenient mode: an unreadable file yields a record whose
    /// fields are all `Malformed`. In strict mode returns
    /// `ParseError::InvalidDocument` if the file cannot be loaded, or
    /// `ParseError::InvalidField` for the first malformed field.
    pub fn parse_file(&mut self, path: &Path) -> Result<RunParameters, ParseError> {
        debug!(path = %path.display(), "Parsing run parameters");
        self.parse_document(&XmlDocument::open(path))
    }

    /// Parse `RunParameters.xml` content held in memory
    ///
    /// # Errors
    ///
    /// See [`parse_file`](Self::parse_file).
    pub fn parse_text(&mut self, text: &str) -> Result<RunParameters, ParseError> {
        self.parse_document(&XmlDocument::from_text(text))
    }

    /// Decode every field from an already loaded document
    ///
    /// # Errors
    ///
    /// See [`parse_file`](Self::parse_file).
    pub fn parse_document(&mut self, doc: &XmlDocument) -> Result<RunParameters, ParseError> {
        // A document that failed to load is reported once, not once per field
        let document_failed = if let Some(reason) = doc.failure() {
            self.diagnostics
                .error(&format!("Could not parse RunParameters.xml: {reason}"));
            if self.strictness.is_strict() {
                return Err(ParseError::InvalidDocument(reason.to_string()));
            }
            true
        } else {
            false
        };

        let mut fields = FieldReporter {
            doc,
            diagnostics: &mut self.diagnostics,
            strictness: self.strictness,
            quiet: document_failed,
        };

        let flowcell = RfidTag {
            serial_number: fields.text_with(FLOWCELL_TAG, "SerialNumber", flowcell_serial)?,
            part_number: fields.text(FLOWCELL_TAG, "PartNumber")?,
            expiration_date: fields.text_with(FLOWCELL_TAG, "ExpirationDate", |s| {
                expiry_date(s, COMPACT_DATE_FORMAT)
            })?,
        };

        let pr2_bottle = RfidTag {
            serial_number: fields.text(PR2_BOTTLE_TAG, "SerialNumber")?,
            part_number: fields.text(PR2_BOTTLE_TAG, "PartNumber")?,
            expiration_date: fields.text_with(PR2_BOTTLE_TAG, "ExpirationDate", |s| {
                expiry_date(s, EXPIRY_DATE_FORMAT)
            })?,
        };

        let reagent_kit = RfidTag {
            serial_number: fields.text(REAGENT_KIT_TAG, "SerialNumber")?,
            part_number: fields.text(REAGENT_KIT_TAG, "PartNumber")?,
            expiration_date: fields.text_with(REAGENT_KIT_TAG, "ExpirationDate", |s| {
                expiry_date(s, EXPIRY_DATE_FORMAT)
            })?,
        };

        let analysis_folder = fields.text(ROOT_TAG, "AnalysisFolder")?.map(PathBuf::from);
        let fastq_folder = analysis_folder.clone().map(fastq_folder);

        Ok(RunParameters {
            flowcell,
            pr2_bottle,
            reagent_kit,
            application_version: fields.text(SETUP_TAG, "ApplicationVersion")?,
            application_name: fields.text(SETUP_TAG, "ApplicationName")?,
            run_id: fields.text(ROOT_TAG, "RunID")?,
            fpga_version: fields.text(ROOT_TAG, "FPGAVersion")?,
            rta_version: fields.text(ROOT_TAG, "RTAVersion")?,
            reagent_kit_barcode: fields.text(ROOT_TAG, "ReagentKitBarcode")?,
            analysis_folder,
            run_start_date: fields.text_with(ROOT_TAG, "RunStartDate", |s| {
                Extracted::from(parse_date(&s, COMPACT_DATE_FORMAT))
            })?,
            output_folder: fields.text(ROOT_TAG, "OutputFolder")?.map(PathBuf::from),
            scanner_id: fields.text(ROOT_TAG, "ScannerID")?,
            fastq_folder,
        })
    }
}

/// Looks up fields and reports anything that did not decode
struct FieldReporter<'a, D> {
    doc: &'a XmlDocument,
    diagnostics: &'a mut D,
    strictness: Strictness,
    quiet: bool,
}

impl<D: Diagnostics> FieldReporter<'_, D> {
    fn text(&mut self, element: &str, child: &str) -> Result<Extracted<String>, ParseError> {
        self.text_with(element, child, Extracted::Value)
    }

    fn text_with<T>(
        &mut self,
        element: &str,
        child: &str,
        decode: impl FnOnce(String) -> Extracted<T>,
    ) -> Result<Extracted<T>, ParseError> {
        let value = self.doc.lookup(element, child).and_then(decode);
        if self.quiet {
            return Ok(value);
        }

        let field = format!("{element}/{child}");
        match &value {
            Extracted::Value(_) => {}
            Extracted::Absent => {
                self.diagnostics
                    .warn(&format!("RunParameters.xml has no value for {field}"));
            }
            Extracted::Malformed(reason) => {
                self.diagnostics
                    .error(&format!("Could not convert {field}: {reason}"));
                if self.strictness.is_strict() {
                    return Err(ParseError::InvalidField {
                        field,
                        reason: reason.clone(),
                    });
                }
            }
        }
        Ok(value)
    }
}

/// Keep the part of a flowcell serial after the first `-` (`000000000-A9WFL` -> `A9WFL`)
fn flowcell_serial(raw: String) -> Extracted<String> {
    match raw.split('-').nth(1) {
        Some(serial) => Extracted::Value(serial.to_string()),
        None => Extracted::Malformed(format!("'{raw}' is not of the form '<prefix>-<serial>'")),
    }
}

fn expiry_date(raw: String, format: &str) -> Extracted<NaiveDate> {
    parse_date(strip_time(&raw), format).into()
}

fn fastq_folder(analysis_folder: PathBuf) -> PathBuf {
    BASECALLS_SUBPATH
        .iter()
        .fold(analysis_folder, |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::diagnostics::CollectingDiagnostics;

    const RUN_PARAMETERS: &str = r#"<?xml version="1.0"?>
<RunParameters xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <FlowcellRFIDTag>
    <SerialNumber>000000000-A9WFL</SerialNumber>
    <PartNumber>15028382</PartNumber>
    <ExpirationDate>151006T00:00:00</ExpirationDate>
  </FlowcellRFIDTag>
  <PR2BottleRFIDTag>
    <SerialNumber>MS2912374-00PR2</SerialNumber>
    <PartNumber>15041807</PartNumber>
    <ExpirationDate>2015-09-19T00:00:00</ExpirationDate>
  </PR2BottleRFIDTag>
  <ReagentKitRFIDTag>
    <SerialNumber>MS2886405-600V3</SerialNumber>
    <PartNumber>15043962</PartNumber>
    <ExpirationDate>2015-09-22T00:00:00</ExpirationDate>
  </ReagentKitRFIDTag>
  <Setup>
    <ApplicationVersion>2.5.0.5</ApplicationVersion>
    <ApplicationName>MiSeq Control Software</ApplicationName>
  </Setup>
  <RunID>150127_M00766_0086_000000000-A9WFL</RunID>
  <ScannerID>M00766</ScannerID>
  <FPGAVersion>9.5.12</FPGAVersion>
  <RTAVersion>1.18.54</RTAVersion>
  <ReagentKitBarcode>MS2886405-600V3</ReagentKitBarcode>
  <AnalysisFolder>/data/MiSeqAnalysis/150127_M00766_0086_000000000-A9WFL</AnalysisFolder>
  <RunStartDate>150127</RunStartDate>
  <OutputFolder>/data/MiSeqOutput/150127_M00766_0086_000000000-A9WFL</OutputFolder>
</RunParameters>
"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn value(s: &str) -> Extracted<String> {
        Extracted::Value(s.to_string())
    }

    #[test]
    fn test_parse_all_fields() {
        let mut parser = RunParametersParser::new().with_diagnostics(CollectingDiagnostics::new());
        let params = parser.parse_text(RUN_PARAMETERS).unwrap();

        assert_eq!(params.flowcell().serial_number, value("A9WFL"));
        assert_eq!(params.flowcell().part_number, value("15028382"));
        assert_eq!(
            params.flowcell().expiration_date,
            Extracted::Value(date(2015, 10, 6))
        );
        assert_eq!(params.pr2_bottle().serial_number, value("MS2912374-00PR2"));
        assert_eq!(params.pr2_bottle().part_number, value("15041807"));
        assert_eq!(
            params.pr2_bottle().expiration_date,
            Extracted::Value(date(2015, 9, 19))
        );
        assert_eq!(params.reagent_kit().serial_number, value("MS2886405-600V3"));
        assert_eq!(params.reagent_kit().part_number, value("15043962"));
        assert_eq!(
            params.reagent_kit().expiration_date,
            Extracted::Value(date(2015, 9, 22))
        );
        assert_eq!(params.application_version(), &value("2.5.0.5"));
        assert_eq!(params.application_name(), &value("MiSeq Control Software"));
        assert_eq!(
            params.run_id(),
            &value("150127_M00766_0086_000000000-A9WFL")
        );
        assert_eq!(params.fpga_version(), &value("9.5.12"));
        assert_eq!(params.rta_version(), &value("1.18.54"));
        assert_eq!(params.reagent_kit_barcode(), &value("MS2886405-600V3"));
        assert_eq!(params.scanner_id(), &value("M00766"));
        assert_eq!(
            params.run_start_date(),
            &Extracted::Value(date(2015, 1, 27))
        );
        assert_eq!(
            params.output_folder().value(),
            Some(&PathBuf::from(
                "/data/MiSeqOutput/150127_M00766_0086_000000000-A9WFL"
            ))
        );

        assert!(parser.diagnostics().is_empty());
    }

    #[test]
    fn test_fastq_folder_appends_basecalls() {
        let params = RunParametersParser::new()
            .with_diagnostics(CollectingDiagnostics::new())
            .parse_text(RUN_PARAMETERS)
            .unwrap();

        let analysis = PathBuf::from("/data/MiSeqAnalysis/150127_M00766_0086_000000000-A9WFL");
        assert_eq!(params.analysis_folder().value(), Some(&analysis));
        assert_eq!(
            params.fastq_folder().value(),
            Some(&analysis.join("Data").join("Intensities").join("BaseCalls"))
        );
    }

    #[test]
    fn test_flowcell_serial_keeps_second_segment() {
        assert_eq!(flowcell_serial("AB12-CD34".to_string()), value("CD34"));
        assert_eq!(flowcell_serial("AB12-CD34-EF56".to_string()), value("CD34"));
        assert!(flowcell_serial("A9WFL".to_string()).is_malformed());
    }

    #[test]
    fn test_flowcell_expiry_uses_compact_format() {
        // Four-digit-year expiry dates do not fit the compact flowcell format
        let xml = "<RunParameters><FlowcellRFIDTag><ExpirationDate>2015-10-06T00:00:00</ExpirationDate></FlowcellRFIDTag></RunParameters>";
        let mut parser = RunParametersParser::new().with_diagnostics(CollectingDiagnostics::new());
        let params = parser.parse_text(xml).unwrap();

        assert!(params.flowcell().expiration_date.is_malformed());
        let errors = parser.diagnostics().errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("FlowcellRFIDTag/ExpirationDate"));
    }

    #[test]
    fn test_malformed_dates_do_not_escape() {
        let xml = r"<RunParameters>
  <PR2BottleRFIDTag><ExpirationDate>19/09/2015</ExpirationDate></PR2BottleRFIDTag>
  <RunStartDate>yesterday</RunStartDate>
  <RunID>run1</RunID>
</RunParameters>";
        let mut parser = RunParametersParser::new().with_diagnostics(CollectingDiagnostics::new());
        let params = parser.parse_text(xml).unwrap();

        assert!(params.pr2_bottle().expiration_date.is_malformed());
        assert!(params.run_start_date().is_malformed());
        assert_eq!(params.run_id(), &value("run1"));
        assert_eq!(parser.diagnostics().errors().len(), 2);
    }

    #[test]
    fn test_missing_tags_are_absent_and_warned() {
        let mut parser = RunParametersParser::new().with_diagnostics(CollectingDiagnostics::new());
        let params = parser
            .parse_text("<RunParameters><RunID>run1</RunID></RunParameters>")
            .unwrap();

        assert_eq!(params.run_id(), &value("run1"));
        assert!(params.scanner_id().is_absent());
        assert!(params.flowcell().serial_number.is_absent());
        assert!(params.analysis_folder().is_absent());
        assert!(params.fastq_folder().is_absent());
        assert!(parser.diagnostics().errors().is_empty());
        assert!(parser
            .diagnostics()
            .warnings()
            .contains(&"RunParameters.xml has no value for RunParameters/ScannerID"));
    }

    #[test]
    fn test_unreadable_document_reports_once() {
        let mut parser = RunParametersParser::new().with_diagnostics(CollectingDiagnostics::new());
        let params = parser.parse_text("<RunParameters><RunID>").unwrap();

        assert!(params.run_id().is_malformed());
        assert!(params.flowcell().serial_number.is_malformed());
        assert!(params.run_start_date().is_malformed());
        assert!(params.fastq_folder().is_malformed());
        assert_eq!(parser.diagnostics().entries().len(), 1);
        assert_eq!(parser.diagnostics().errors().len(), 1);
    }

    #[test]
    fn test_strict_mode_fails_on_malformed_field() {
        let xml = "<RunParameters><RunStartDate>yesterday</RunStartDate></RunParameters>";
        let result = RunParametersParser::new()
            .with_diagnostics(CollectingDiagnostics::new())
            .with_strictness(Strictness::Strict)
            .parse_text(xml);

        match result {
            Err(ParseError::InvalidField { field, .. }) => {
                assert_eq!(field, "RunParameters/RunStartDate");
            }
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_mode_fails_on_unreadable_document() {
        let result = RunParametersParser::new()
            .with_diagnostics(CollectingDiagnostics::new())
            .with_strictness(Strictness::Strict)
            .parse_file(Path::new("does/not/exist/RunParameters.xml"));

        assert!(matches!(result, Err(ParseError::InvalidDocument(_))));
    }
}
