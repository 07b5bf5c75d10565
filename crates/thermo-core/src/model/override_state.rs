// ── Override state ──
//
// A temporary target that beats the schedule until `until`. The client
// never expires an override on its own: only a fresh summary can report
// that the server dropped it.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::zone::{Temperature, ZoneId};
use crate::error::CoreError;

/// Override status of one zone (or of a single-zone deployment).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OverrideState {
    #[default]
    Normal,
    /// Server-local wall-clock expiry.
    Overridden { until: NaiveDateTime },
}

impl OverrideState {
    /// Whether an override is in force. Does not look at the clock.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Overridden { .. })
    }

    pub fn until(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Normal => None,
            Self::Overridden { until } => Some(*until),
        }
    }
}

/// Which overrides a clear request removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    /// Every zone, plus the single-zone override.
    All,
    Zone(ZoneId),
}

/// A validated request to override one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverrideRequest {
    pub zone: ZoneId,
    pub temp: Temperature,
    pub hours: u32,
}

impl OverrideRequest {
    /// Longest override accepted: one year.
    pub const MAX_HOURS: u32 = 24 * 366;

    pub fn new(zone: ZoneId, temp: Temperature, hours: u32) -> Result<Self, CoreError> {
        if hours == 0 {
            return Err(CoreError::validation("override duration must be at least one hour"));
        }
        if hours > Self::MAX_HOURS {
            return Err(CoreError::validation(format!(
                "override duration {hours}h exceeds {}h",
                Self::MAX_HOURS
            )));
        }
        Ok(Self { zone, temp, hours })
    }

    /// End of the override if it started at `start`.
    pub fn until_from(&self, start: NaiveDateTime) -> Result<NaiveDateTime, CoreError> {
        start
            .checked_add_signed(TimeDelta::hours(i64::from(self.hours)))
            .ok_or_else(|| CoreError::validation(format!("override of {}h ends out of range", self.hours)))
    }
}

/// Override states of every known zone plus the single-zone instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideBook {
    global: OverrideState,
    zones: BTreeMap<ZoneId, OverrideState>,
}

impl OverrideBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the single-zone override.
    pub fn global(&self) -> OverrideState {
        self.global
    }

    /// State for `zone`. Zones the book has never heard of fall back to the
    /// single-zone state.
    pub fn get(&self, zone: ZoneId) -> OverrideState {
        self.zones.get(&zone).copied().unwrap_or(self.global)
    }

    pub fn set(&mut self, zone: ZoneId, state: OverrideState) {
        self.zones.insert(zone, state);
    }

    pub fn set_global(&mut self, state: OverrideState) {
        self.global = state;
    }

    pub fn clear(&mut self, scope: ClearScope) {
        match scope {
            ClearScope::All => {
                self.global = OverrideState::Normal;
                for state in self.zones.values_mut() {
                    *state = OverrideState::Normal;
                }
            }
            ClearScope::Zone(zone) => {
                self.zones.insert(zone, OverrideState::Normal);
            }
        }
    }

    /// Zones with an override in force.
    pub fn active(&self) -> impl Iterator<Item = (ZoneId, NaiveDateTime)> + '_ {
        self.zones
            .iter()
            .filter_map(|(zone, state)| state.until().map(|until| (*zone, until)))
    }
}
