use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::types::Extracted;

/// Identifiers read from the RFID tag of a consumable (flowcell, PR2 bottle, reagent kit)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RfidTag {
    pub serial_number: Extracted<String>,
    pub part_number: Extracted<String>,
    pub expiration_date: Extracted<NaiveDate>,
}

/// Metadata decoded from a `RunParameters.xml` file
///
/// Built once by [`RunParametersParser`](crate::parsing::run_parameters::RunParametersParser);
/// there are no setters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunParameters {
    pub(crate) flowcell: RfidTag,
    pub(crate) pr2_bottle: RfidTag,
    pub(crate) reagent_kit: RfidTag,
    pub(crate) application_name: Extracted<String>,
    pub(crate) application_version: Extracted<String>,
    pub(crate) run_id: Extracted<String>,
    pub(crate) fpga_version: Extracted<String>,
    pub(crate) rta_version: Extracted<String>,
    pub(crate) reagent_kit_barcode: Extracted<String>,
    pub(crate) scanner_id: Extracted<String>,
    pub(crate) analysis_folder: Extracted<PathBuf>,
    pub(crate) output_folder: Extracted<PathBuf>,
    pub(crate) fastq_folder: Extracted<PathBuf>,
    pub(crate) run_start_date: Extracted<NaiveDate>,
}

impl RunParameters {
    #[must_use]
    pub fn flowcell(&self) -> &RfidTag {
        &self.flowcell
    }

    #[must_use]
    pub fn pr2_bottle(&self) -> &RfidTag {
        &self.pr2_bottle
    }

    #[must_use]
    pub fn reagent_kit(&self) -> &RfidTag {
        &self.reagent_kit
    }

    #[must_use]
    pub fn application_name(&self) -> &Extracted<String> {
        &self.application_name
    }

    #[must_use]
    pub fn application_version(&self) -> &Extracted<String> {
        &self.application_version
    }

    #[must_use]
    pub fn run_id(&self) -> &Extracted<String> {
        &self.run_id
    }

    #[must_use]
    pub fn fpga_version(&self) -> &Extracted<String> {
        &self.fpga_version
    }

    #[must_use]
    pub fn rta_version(&self) -> &Extracted<String> {
        &self.rta_version
    }

    #[must_use]
    pub fn reagent_kit_barcode(&self) -> &Extracted<String> {
        &self.reagent_kit_barcode
    }

    #[must_use]
    pub fn scanner_id(&self) -> &Extracted<String> {
        &self.scanner_id
    }

    /// Folder the instrument writes its analysis output to
    #[must_use]
    pub fn analysis_folder(&self) -> &Extracted<PathBuf> {
        &self.analysis_folder
    }

    /// Root run folder on the instrument
    #[must_use]
    pub fn output_folder(&self) -> &Extracted<PathBuf> {
        &self.output_folder
    }

    /// `<analysis folder>/Data/Intensities/BaseCalls`
    #[must_use]
    pub fn fastq_folder(&self) -> &Extracted<PathBuf> {
        &self.fastq_folder
    }

    #[must_use]
    pub fn run_start_date(&self) -> &Extracted<NaiveDate> {
        &self.run_start_date
    }
}
