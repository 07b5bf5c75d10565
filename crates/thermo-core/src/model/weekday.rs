// ── Weekday ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr};

use crate::error::CoreError;

/// Day of the week, 0-based from Monday as the server counts them.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum Weekday {
    #[default]
    #[strum(to_string = "Monday", serialize = "mon")]
    Monday = 0,
    #[strum(to_string = "Tuesday", serialize = "tue")]
    Tuesday = 1,
    #[strum(to_string = "Wednesday", serialize = "wed")]
    Wednesday = 2,
    #[strum(to_string = "Thursday", serialize = "thu")]
    Thursday = 3,
    #[strum(to_string = "Friday", serialize = "fri")]
    Friday = 4,
    #[strum(to_string = "Saturday", serialize = "sat")]
    Saturday = 5,
    #[strum(to_string = "Sunday", serialize = "sun")]
    Sunday = 6,
}

impl Weekday {
    /// Zero-based index used on the wire.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Map chrono's weekday onto ours.
    pub fn from_chrono(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_repr(value)
            .ok_or_else(|| CoreError::validation(format!("day of week must be 0..=6, got {value}")))
    }
}
