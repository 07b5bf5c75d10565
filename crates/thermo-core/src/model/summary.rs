// ── Summary snapshot ──

use serde::{Deserialize, Serialize};

use super::override_state::OverrideBook;
use super::schedule::DaySchedule;
use super::weekday::Weekday;
use super::zone::{Zone, ZoneId};

/// What the server last reported: zones, overrides and today's schedule.
///
/// Replaced as a whole on each refresh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub zones: Vec<Zone>,
    pub overrides: OverrideBook,
    pub server_day: Weekday,
    pub today: DaySchedule,
    /// Row of `today` currently in force.
    pub active_entry: Option<usize>,
    /// Single-zone servers report these at the top level.
    pub current: Option<f64>,
    pub target: Option<f64>,
}

impl Summary {
    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }
}
