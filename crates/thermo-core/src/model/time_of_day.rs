// ── Time of day ──
//
// Schedule rows are keyed by a zero-padded "HH:MM" string. Ordering is
// plain string comparison of that canonical form, which is only a total
// order on time because parsing refuses anything non-canonical.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A 24-hour "HH:MM" time of day.
///
/// `Ord` is derived from the inner string and is therefore lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(String);

impl TimeOfDay {
    /// Parse a canonical `HH:MM` value.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bytes = s.as_bytes();
        let well_formed = bytes.len() == 5
            && bytes[2] == b':'
            && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
        if !well_formed {
            return Err(CoreError::validation(format!(
                "time must be HH:MM (24-hour, zero padded), got '{s}'"
            )));
        }

        let hour = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
        let minute = (bytes[3] - b'0') * 10 + (bytes[4] - b'0');
        if hour > 23 || minute > 59 {
            return Err(CoreError::validation(format!("time out of range: '{s}'")));
        }

        Ok(Self(s.to_owned()))
    }

    /// Truncate a wall-clock time to the minute.
    pub fn from_naive(time: NaiveTime) -> Self {
        Self(format!("{:02}:{:02}", time.hour(), time.minute()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Total order over times of day: ordinary string comparison.
pub fn compare(a: &TimeOfDay, b: &TimeOfDay) -> Ordering {
    a.as_str().cmp(b.as_str())
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TimeOfDay {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    #[test]
    fn compare_is_string_order() {
        assert_eq!(compare(&t("07:00"), &t("18:00")), Ordering::Less);
        assert_eq!(compare(&t("18:00"), &t("07:00")), Ordering::Greater);
        assert_eq!(compare(&t("12:30"), &t("12:30")), Ordering::Equal);
        assert_eq!(compare(&t("09:59"), &t("10:00")), Ordering::Less);
    }

    #[test]
    fn derived_ord_matches_compare() {
        let (a, b) = (t("00:00"), t("23:59"));
        assert_eq!(a.cmp(&b), compare(&a, &b));
    }

    #[test]
    fn rejects_non_canonical_input() {
        for bad in ["7:00", "07:0", "0700", "24:00", "12:60", "ab:cd", "07:00:00", ""] {
            let err = TimeOfDay::parse(bad).unwrap_err();
            assert!(err.is_validation(), "{bad} should fail validation");
        }
    }

    #[test]
    fn from_naive_truncates_seconds() {
        let time = NaiveTime::from_hms_opt(6, 5, 59).unwrap();
        assert_eq!(TimeOfDay::from_naive(time).as_str(), "06:05");
    }

    #[test]
    fn serde_round_trips_through_string() {
        let parsed: TimeOfDay = serde_json::from_str("\"21:15\"").unwrap();
        assert_eq!(parsed, t("21:15"));
        assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
    }
}
