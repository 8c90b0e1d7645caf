use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Outcome of extracting a single field from a metadata file
///
/// Lookups never fail outright: a field is either present and decoded,
/// missing from the source, or present but not decodable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    /// Field was found and decoded
    Value(T),
    /// Field (or its enclosing element) does not exist in the source
    Absent,
    /// Field exists but could not be decoded; carries the reason
    Malformed(String),
}

impl<T> Default for Extracted<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Extracted<T> {
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Reason the field could not be decoded, if it is malformed
    #[must_use]
    pub fn malformed_reason(&self) -> Option<&str> {
        match self {
            Self::Malformed(reason) => Some(reason),
            Self::Value(_) | Self::Absent => None,
        }
    }

    pub fn as_ref(&self) -> Extracted<&T> {
        match self {
            Self::Value(v) => Extracted::Value(v),
            Self::Absent => Extracted::Absent,
            Self::Malformed(reason) => Extracted::Malformed(reason.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Self::Value(v) => Extracted::Value(f(v)),
            Self::Absent => Extracted::Absent,
            Self::Malformed(reason) => Extracted::Malformed(reason),
        }
    }

    /// Chain a decoding step that may itself fail
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Extracted<U>) -> Extracted<U> {
        match self {
            Self::Value(v) => f(v),
            Self::Absent => Extracted::Absent,
            Self::Malformed(reason) => Extracted::Malformed(reason),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Extracted<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(e) => Self::Malformed(e.to_string()),
        }
    }
}

// Values serialize as themselves, absent fields as null and malformed
// fields as `{"malformed": "<reason>"}`.
impl<T: Serialize> Serialize for Extracted<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Absent => serializer.serialize_none(),
            Self::Malformed(reason) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("malformed", reason)?;
                map.end()
            }
        }
    }
}

/// How the parsers treat recoverable problems
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strictness {
    /// Log malformed fields and skippable lines, then carry on
    #[default]
    Lenient,
    /// Fail on the first malformed field or skippable line
    Strict,
}

impl Strictness {
    #[must_use]
    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_and_then_short_circuits() {
        let absent: Extracted<String> = Extracted::Absent;
        assert!(absent.and_then(|s| Extracted::Value(s.len())).is_absent());

        let malformed: Extracted<String> = Extracted::Malformed("bad".to_string());
        let chained = malformed.and_then(|s| Extracted::Value(s.len()));
        assert_eq!(chained.malformed_reason(), Some("bad"));

        let value = Extracted::Value("AB12-CD34".to_string());
        assert_eq!(value.map(|s| s.len()).into_value(), Some(9));
    }

    #[test]
    fn test_extracted_from_result() {
        let ok: Extracted<u32> = "151".parse::<u32>().into();
        assert_eq!(ok, Extracted::Value(151));

        let err: Extracted<u32> = "abc".parse::<u32>().into();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_extracted_serialization() {
        let value = Extracted::Value("M00766".to_string());
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""M00766""#);

        let absent: Extracted<String> = Extracted::Absent;
        assert_eq!(serde_json::to_string(&absent).unwrap(), "null");

        let malformed: Extracted<String> = Extracted::Malformed("no dash".to_string());
        assert_eq!(
            serde_json::to_string(&malformed).unwrap(),
            r#"{"malformed":"no dash"}"#
        );
    }

    #[test]
    fn test_strictness_default_is_lenient() {
        assert_eq!(Strictness::default(), Strictness::Lenient);
        assert!(!Strictness::default().is_strict());
    }
}
