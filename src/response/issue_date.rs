use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, de, ser};

/// Issue date of a BankID, normalized to UTC.
///
/// The service encodes this field inconsistently: full RFC 3339
/// timestamps with or without fractional seconds, calendar dates with a
/// zone suffix (`2025-08-09Z`, `2025-08-09+02:00`) and bare calendar
/// dates. Date-only forms resolve to midnight UTC of the named day; a
/// zone suffix on a date never shifts it across a day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueDate(DateTime<Utc>);

impl IssueDate {
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    fn parse(value: &str) -> Option<DateTime<Utc>> {
        if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
            return Some(stamp.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dZ", "%Y-%m-%d%:z", "%Y-%m-%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Some(NaiveDateTime::new(date, NaiveTime::MIN).and_utc());
            }
        }
        None
    }
}

impl From<DateTime<Utc>> for IssueDate {
    fn from(stamp: DateTime<Utc>) -> Self {
        IssueDate(stamp)
    }
}

impl fmt::Display for IssueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl Serialize for IssueDate {
    fn serialize<S: ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl<'de> Deserialize<'de> for IssueDate {
    fn deserialize<D: de::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        IssueDate::parse(&value).map(IssueDate).ok_or_else(|| {
            de::Error::invalid_value(
                de::Unexpected::Str(&value),
                &"an RFC 3339 timestamp or calendar date",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn decode(raw: &str) -> IssueDate {
        serde_json::from_str(&format!("\"{raw}\"")).unwrap()
    }

    #[test]
    fn test_rfc3339_timestamp_converts_to_utc() {
        assert_eq!(
            decode("2023-07-10T14:30:00+02:00").as_datetime(),
            Utc.with_ymd_and_hms(2023, 7, 10, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_fractional_seconds_are_accepted() {
        let stamp = decode("2023-07-10T12:00:00.123456789Z");
        assert_eq!(
            stamp.to_string(),
            "2023-07-10T12:00:00Z",
            "display truncates to whole seconds"
        );
    }

    #[test]
    fn test_date_with_utc_suffix_is_midnight_utc() {
        assert_eq!(
            decode("2025-08-09Z").as_datetime(),
            Utc.with_ymd_and_hms(2025, 8, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_date_with_offset_keeps_the_named_day() {
        assert_eq!(
            decode("2025-08-09+02:00").as_datetime(),
            Utc.with_ymd_and_hms(2025, 8, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bare_date_is_midnight_utc() {
        assert_eq!(
            decode("2025-08-09").as_datetime(),
            Utc.with_ymd_and_hms(2025, 8, 9, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_unparseable_value_is_rejected() {
        assert!(serde_json::from_str::<IssueDate>("\"ninth of august\"").is_err());
        assert!(serde_json::from_str::<IssueDate>("\"2025-13-40\"").is_err());
    }

    #[test]
    fn test_serializes_as_rfc3339_utc() {
        let stamp = IssueDate::from(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(serde_json::to_string(&stamp).unwrap(), "\"2023-01-01T00:00:00Z\"");
    }
}
