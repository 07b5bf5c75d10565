// ── API-to-domain conversions ──
//
// Bridges the raw `thermo_api::models` wire shapes into validated domain
// types. Server data is trusted for ranges (temperatures are not
// re-validated) but not for shape: malformed times and dates are errors.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta};
use strum::IntoEnumIterator;
use tracing::warn;

use thermo_api::models::{
    OverrideRecord, ReportedState, ScheduleResponse, SummaryResponse, WeekPayload, WireEntry,
    ZoneRecord, ZoneSummary,
};

use crate::error::CoreError;
use crate::model::{
    DaySchedule, DeviceReport, OverrideBook, OverrideState, ScheduleEntry, Summary, Temperature,
    TimeOfDay, WeekSchedule, Weekday, Zone, ZoneId, ZoneInfo,
};

/// Formats the server uses for override expiry times.
const UNTIL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

// ── Helpers ────────────────────────────────────────────────────────

fn malformed(what: &str, raw: &str) -> CoreError {
    CoreError::Internal(format!("server sent malformed {what}: '{raw}'"))
}

/// Parse an override expiry in the server's local-time format.
pub fn parse_until(raw: &str) -> Result<NaiveDateTime, CoreError> {
    UNTIL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| malformed("override expiry", raw))
}

/// Parse a summary's override expiry. Single-zone servers send a bare
/// `%H:%M` and only while the override has not ended, so a time earlier
/// than `server_now` falls on the next day.
fn parse_summary_until(raw: &str, server_now: NaiveDateTime) -> Result<NaiveDateTime, CoreError> {
    if let Ok(until) = parse_until(raw) {
        return Ok(until);
    }
    let time = NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| malformed("override expiry", raw))?;
    let until = server_now.date().and_time(time);
    if until >= server_now {
        return Ok(until);
    }
    until
        .checked_add_signed(TimeDelta::days(1))
        .ok_or_else(|| malformed("override expiry", raw))
}

/// `now` moved onto the server's weekday (at most three days either way).
fn server_now(now: NaiveDateTime, server_day: Weekday) -> NaiveDateTime {
    let local = Weekday::from_chrono(now.weekday());
    let ahead = (i64::from(server_day.index()) - i64::from(local.index())).rem_euclid(7);
    let shift = if ahead > 3 { ahead - 7 } else { ahead };
    now.checked_add_signed(TimeDelta::days(shift)).unwrap_or(now)
}

fn override_state(
    record: Option<&OverrideRecord>,
    server_now: Option<NaiveDateTime>,
) -> Result<OverrideState, CoreError> {
    let Some(record) = record else {
        return Ok(OverrideState::Normal);
    };
    let until = match server_now {
        Some(now) => parse_summary_until(&record.until, now)?,
        None => parse_until(&record.until)?,
    };
    Ok(OverrideState::Overridden { until })
}

// ── Schedule ───────────────────────────────────────────────────────

impl TryFrom<&WireEntry> for ScheduleEntry {
    type Error = CoreError;

    fn try_from(wire: &WireEntry) -> Result<Self, Self::Error> {
        let when = TimeOfDay::parse(&wire.when).map_err(|_| malformed("schedule time", &wire.when))?;
        let mut entry = ScheduleEntry::new(when);
        for zt in &wire.zones {
            entry = entry.with_zone(ZoneId(zt.zone), Temperature::from_server(zt.temp));
        }
        // Single-zone servers put the target on the row itself.
        if let Some(temp) = wire.temp.filter(|_| wire.zones.is_empty()) {
            entry = entry.with_zone(ZoneId::LEGACY, Temperature::from_server(temp));
        }
        Ok(entry)
    }
}

/// Build a day from server rows. Rows sharing a start time are merged.
pub fn day_from_wire(rows: &[WireEntry]) -> Result<DaySchedule, CoreError> {
    let mut by_time: BTreeMap<TimeOfDay, ScheduleEntry> = BTreeMap::new();
    for row in rows {
        let entry = ScheduleEntry::try_from(row)?;
        match by_time.get_mut(&entry.when) {
            Some(existing) => existing.zone_temps.extend(entry.zone_temps),
            None => {
                by_time.insert(entry.when.clone(), entry);
            }
        }
    }
    DaySchedule::from_entries(by_time.into_values())
}

/// Build the week from a `GET schedule` response.
pub fn week_from_wire(response: &ScheduleResponse) -> Result<WeekSchedule, CoreError> {
    let mut week = WeekSchedule::new();
    match &response.schedule {
        WeekPayload::ByDay(days) => {
            for (key, rows) in days {
                let day = key
                    .parse::<u8>()
                    .ok()
                    .and_then(Weekday::from_repr)
                    .ok_or_else(|| malformed("day key", key))?;
                week.set_day(day, day_from_wire(rows)?);
            }
        }
        WeekPayload::Days(days) => {
            if days.len() > 7 {
                return Err(malformed("week", &format!("{} days", days.len())));
            }
            for (day, rows) in Weekday::iter().zip(days) {
                week.set_day(day, day_from_wire(rows)?);
            }
        }
    }
    Ok(week)
}

/// Override records as listed alongside the schedule. Records without a
/// zone belong to the single-zone instance.
pub fn overrides_from_records(records: &[OverrideRecord]) -> Result<OverrideBook, CoreError> {
    let mut book = OverrideBook::new();
    for record in records {
        let state = override_state(Some(record), None)?;
        match record.zone {
            Some(zone) => book.set(ZoneId(zone), state),
            None => book.set_global(state),
        }
    }
    Ok(book)
}

// ── Zones ──────────────────────────────────────────────────────────

impl From<&ReportedState> for DeviceReport {
    fn from(r: &ReportedState) -> Self {
        Self {
            state: r.state.clone(),
            target: r.target,
            current_temp: r.current_temp,
            current_outside_temp: r.current_outside_temp,
            time_to_target_secs: r.time_to_target,
            duty_cycle: r.dutycycle,
        }
    }
}

impl From<&ZoneSummary> for Zone {
    fn from(z: &ZoneSummary) -> Self {
        let report = z.reported_state.as_ref().map(DeviceReport::from);
        Self {
            id: ZoneId(z.zone_id),
            name: z.name.clone(),
            current_temp: report.as_ref().and_then(|r| r.current_temp),
            target: z.target,
            report,
        }
    }
}

impl From<ZoneRecord> for ZoneInfo {
    fn from(z: ZoneRecord) -> Self {
        Self {
            id: ZoneId(z.zone_id),
            name: z.name,
            boiler_relay: z.boiler_relay,
            sensor_id: z.sensor_id,
        }
    }
}

// ── Summary ────────────────────────────────────────────────────────

/// Convert a `GET summary` response.
///
/// `now` is local wall-clock time. It locates the active row when the
/// server does not say which one is in force, and dates bare override
/// expiry times.
pub fn summary_from_wire(response: &SummaryResponse, now: NaiveDateTime) -> Result<Summary, CoreError> {
    let server_day = Weekday::try_from(response.server_day_of_week)
        .map_err(|_| malformed("day of week", &response.server_day_of_week.to_string()))?;
    let today = day_from_wire(&response.today)?;
    let server_now = server_now(now, server_day);

    let mut overrides = OverrideBook::new();
    let global = override_state(response.target_override.as_ref(), Some(server_now))?;
    let global = match (response.target_overridden, global) {
        (Some(false), _) => OverrideState::Normal,
        (Some(true), OverrideState::Normal) => {
            warn!("server reports an override without an expiry; treating as none");
            OverrideState::Normal
        }
        (_, state) => state,
    };
    overrides.set_global(global);
    for zone in &response.zones {
        overrides.set(
            ZoneId(zone.zone_id),
            override_state(zone.target_override.as_ref(), Some(server_now))?,
        );
    }

    let active_entry = match response.target_entry {
        Some(index) => usize::try_from(index).ok().filter(|i| *i < today.len()),
        None => today.active_index(&TimeOfDay::from_naive(now.time())),
    };

    Ok(Summary {
        zones: response.zones.iter().map(Zone::from).collect(),
        overrides,
        server_day,
        today,
        active_entry,
        current: response.current,
        target: response.target,
    })
}
