use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::core::types::Extracted;

/// Values from the `[Header]` section of a sample sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleSheetHeader {
    /// `IEMFileVersion`
    pub file_version: Extracted<u32>,
    pub investigator_name: Extracted<String>,
    pub experiment_name: Extracted<String>,
    pub date: Extracted<NaiveDate>,
    pub workflow: Extracted<String>,
    pub application: Extracted<String>,
    pub assay: Extracted<String>,
    pub description: Extracted<String>,
    pub chemistry: Extracted<String>,
}

/// One row of the `[Data]` section keyed by the section's own header row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleSheetRecord {
    /// 1-based row number within the `[Data]` section, not counting the header row
    pub(crate) position: usize,
    pub(crate) fields: IndexMap<String, String>,
}

impl SampleSheetRecord {
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// All fields in header order
    #[must_use]
    pub fn fields(&self) -> &IndexMap<String, String> {
        &self.fields
    }

    /// Value of a column, or `None` if the header row does not declare it
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    #[must_use]
    pub fn sample_id(&self) -> Option<&str> {
        self.get("Sample_ID")
    }

    #[must_use]
    pub fn sample_name(&self) -> Option<&str> {
        self.get("Sample_Name")
    }

    #[must_use]
    pub fn sample_plate(&self) -> Option<&str> {
        self.get("Sample_Plate")
    }

    #[must_use]
    pub fn sample_well(&self) -> Option<&str> {
        self.get("Sample_Well")
    }

    #[must_use]
    pub fn i7_index_id(&self) -> Option<&str> {
        self.get("I7_Index_ID")
    }

    #[must_use]
    pub fn index(&self) -> Option<&str> {
        self.get("index")
    }

    #[must_use]
    pub fn i5_index_id(&self) -> Option<&str> {
        self.get("I5_Index_ID")
    }

    #[must_use]
    pub fn index2(&self) -> Option<&str> {
        self.get("index2")
    }

    #[must_use]
    pub fn sample_project(&self) -> Option<&str> {
        self.get("Sample_Project")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get("Description")
    }
}

/// A fully decoded sample sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SampleSheet {
    pub(crate) header: SampleSheetHeader,
    pub(crate) sections: IndexMap<String, Vec<String>>,
    pub(crate) manifests: IndexMap<String, String>,
    pub(crate) settings: IndexMap<String, String>,
    pub(crate) cycles_read1: u32,
    pub(crate) cycles_read2: u32,
    pub(crate) records: Vec<SampleSheetRecord>,
}

impl SampleSheet {
    #[must_use]
    pub fn header(&self) -> &SampleSheetHeader {
        &self.header
    }

    /// Raw lines of every declared section, in file order
    #[must_use]
    pub fn sections(&self) -> &IndexMap<String, Vec<String>> {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&[String]> {
        self.sections.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn manifests(&self) -> &IndexMap<String, String> {
        &self.manifests
    }

    #[must_use]
    pub fn settings(&self) -> &IndexMap<String, String> {
        &self.settings
    }

    #[must_use]
    pub fn cycles_read1(&self) -> u32 {
        self.cycles_read1
    }

    /// Zero for single-end runs
    #[must_use]
    pub fn cycles_read2(&self) -> u32 {
        self.cycles_read2
    }

    #[must_use]
    pub fn records(&self) -> &[SampleSheetRecord] {
        &self.records
    }

    /// Split the investigator name on `:` into trimmed, upper-cased parts
    ///
    /// # Examples
    ///
    /// ```
    /// use seqrun_meta::parsing::sample_sheet::SampleSheetParser;
    ///
    /// let text = "[Header]\nInvestigator Name,jsmith: lab : genetics\n";
    /// let mut parser = SampleSheetParser::new();
    /// let sections = parser.parse_reader(text.as_bytes()).unwrap();
    /// let sheet = parser.populate(sections).unwrap();
    ///
    /// assert_eq!(sheet.split_investigator_name(), vec!["JSMITH", "LAB", "GENETICS"]);
    /// ```
    #[must_use]
    pub fn split_investigator_name(&self) -> Vec<String> {
        self.header
            .investigator_name
            .value()
            .map(|name| split_investigator_name(name))
            .unwrap_or_default()
    }
}

/// Trailing empty parts (`jsmith:`) are dropped
pub(crate) fn split_investigator_name(name: &str) -> Vec<String> {
    let mut parts: Vec<&str> = name.split(':').collect();
    while parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }
    parts.iter().map(|s| s.trim().to_uppercase()).collect()
}
