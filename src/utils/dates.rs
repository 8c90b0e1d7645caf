//! Date formats used by the instrument files.
//!
//! `RunParameters.xml` uses two different conventions for its dates and they
//! are kept as separate constants. The flowcell expiry and the run start date
//! use the compact six-digit form while the PR2 bottle and reagent kit expiry
//! dates use a four-digit year.

use chrono::NaiveDate;

/// `yyMMdd`, e.g. `150127`
pub const COMPACT_DATE_FORMAT: &str = "%y%m%d";

/// `yyyy-MM-dd`, e.g. `2015-09-22`
pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

/// `dd/MM/yyyy`, e.g. `27/01/2015`
pub const SAMPLE_SHEET_DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a trimmed date string against a `chrono` format.
///
/// # Errors
///
/// Returns a message naming the input and the expected format if the
/// string does not match.
pub fn parse_date(value: &str, format: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, format)
        .map_err(|e| format!("'{value}' does not match date format '{format}': {e}"))
}

/// Strip a trailing time component (`2015-09-22T00:00:00` -> `2015-09-22`)
#[must_use]
pub fn strip_time(value: &str) -> &str {
    value.split_once('T').map_or(value, |(date, _)| date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_date() {
        let date = parse_date("150127", COMPACT_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 1, 27).unwrap());
    }

    #[test]
    fn test_expiry_date() {
        let date = parse_date(strip_time("2015-09-22T00:00:00"), EXPIRY_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 9, 22).unwrap());
    }

    #[test]
    fn test_sample_sheet_date() {
        let date = parse_date(" 27/01/2015 ", SAMPLE_SHEET_DATE_FORMAT).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2015, 1, 27).unwrap());
    }

    #[test]
    fn test_formats_are_not_interchangeable() {
        assert!(parse_date("2015-09-22", COMPACT_DATE_FORMAT).is_err());
        assert!(parse_date("150922", EXPIRY_DATE_FORMAT).is_err());
        assert!(parse_date("not a date", SAMPLE_SHEET_DATE_FORMAT).is_err());
    }

    #[test]
    fn test_strip_time_without_time() {
        assert_eq!(strip_time("151006"), "151006");
        assert_eq!(strip_time(""), "");
    }
}
