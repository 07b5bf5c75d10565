// ── Zone domain types ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Server-assigned zone identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneId(pub i64);

impl ZoneId {
    /// Zone used for rows from single-zone servers, which carry no zone.
    pub const LEGACY: ZoneId = ZoneId(0);

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ZoneId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for ZoneId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CoreError::validation(format!("zone must be an integer id, got '{s}'")))
    }
}

/// A target temperature in degrees Celsius.
///
/// Construction enforces the range the server accepts for schedule and
/// override targets.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(f64);

impl Temperature {
    pub const MIN: f64 = 0.0;
    /// Exclusive upper bound.
    pub const MAX: f64 = 35.0;

    pub fn new(celsius: f64) -> Result<Self, CoreError> {
        if !celsius.is_finite() {
            return Err(CoreError::validation("temperature must be a number"));
        }
        if !(Self::MIN..Self::MAX).contains(&celsius) {
            return Err(CoreError::validation(format!(
                "temperature {celsius} outside {}..{}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(celsius))
    }

    /// Wrap a value reported by the server without range checks.
    pub(crate) fn from_server(celsius: f64) -> Self {
        Self(celsius)
    }

    pub fn celsius(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl FromStr for Temperature {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| CoreError::validation(format!("temperature must be a number, got '{s}'")))?;
        Self::new(value)
    }
}

/// Last state reported by a zone's heating device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceReport {
    pub state: Option<String>,
    pub target: Option<f64>,
    pub current_temp: Option<f64>,
    pub current_outside_temp: Option<f64>,
    pub time_to_target_secs: Option<i64>,
    pub duty_cycle: Option<f64>,
}

/// A zone as cached from the last summary.
///
/// Owned by the server; replaced wholesale on every summary refresh. The
/// zone's override state is kept in the summary's `OverrideBook`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub current_temp: Option<f64>,
    pub target: Option<f64>,
    pub report: Option<DeviceReport>,
}

/// A zone as listed by the zone registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInfo {
    pub id: ZoneId,
    pub name: String,
    pub boiler_relay: Option<String>,
    pub sensor_id: Option<i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn temperature_range_is_half_open() {
        assert!(Temperature::new(0.0).is_ok());
        assert!(Temperature::new(34.9).is_ok());
        assert!(Temperature::new(35.0).is_err());
        assert!(Temperature::new(-0.5).is_err());
        assert!(Temperature::new(f64::NAN).is_err());
    }

    #[test]
    fn temperature_parses_decimal_text() {
        let t: Temperature = "21.5".parse().unwrap();
        assert!((t.celsius() - 21.5).abs() < f64::EPSILON);
        assert!("warm".parse::<Temperature>().unwrap_err().is_validation());
    }

    #[test]
    fn zone_id_parses_integers_only() {
        assert_eq!("3".parse::<ZoneId>().unwrap(), ZoneId(3));
        assert!("upstairs".parse::<ZoneId>().is_err());
    }
}
