// Wire types for the scheduler web API
//
// These mirror the JSON the server emits and the forms it accepts, and
// nothing more. Domain types (validated times, typed zone ids, override
// states) live in thermo-core.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de};

// ── Schedule rows ──────────────────────────────────────────────────

/// One zone's target within a schedule row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneTemp {
    pub zone: i64,
    pub temp: f64,
}

/// A schedule row as sent by the server.
///
/// Zone-aware servers send `{ "when": "07:00", "zones": [...] }`; older
/// single-zone servers send `{ "time": "07:00", "temp": 20.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEntry {
    #[serde(alias = "time")]
    pub when: String,
    #[serde(default)]
    pub zones: Vec<ZoneTemp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

/// The week as returned by `GET schedule`.
///
/// Flask serialises the integer-keyed day map with string keys; a plain
/// seven-element array is accepted too.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeekPayload {
    ByDay(BTreeMap<String, Vec<WireEntry>>),
    Days(Vec<Vec<WireEntry>>),
}

/// Response of `GET schedule`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub schedule: WeekPayload,
    #[serde(default)]
    pub target_override: Vec<OverrideRecord>,
}

// ── Overrides ──────────────────────────────────────────────────────

/// An override as stored by the server.
///
/// `until` uses the server's `%Y-%m-%dT%H:%M` local-time format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub until: String,
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub zone: Option<i64>,
}

// ── Summary ────────────────────────────────────────────────────────

/// Last state reported by a zone's device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportedState {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub current_temp: Option<f64>,
    #[serde(default)]
    pub target_overridden: Option<bool>,
    #[serde(default)]
    pub current_outside_temp: Option<f64>,
    #[serde(default)]
    pub time_to_target: Option<i64>,
    #[serde(default)]
    pub dutycycle: Option<f64>,
}

/// Per-zone block of the summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone_id: i64,
    pub name: String,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub reported_state: Option<ReportedState>,
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub target_override: Option<OverrideRecord>,
}

/// Response of `GET summary`.
///
/// The top-level `current`/`target`/`target_overridden`/`target_override`
/// and `target_entry` fields are only sent by single-zone servers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub zones: Vec<ZoneSummary>,
    pub server_day_of_week: u8,
    #[serde(default)]
    pub today: Vec<WireEntry>,
    #[serde(default)]
    pub target_entry: Option<i64>,
    #[serde(default)]
    pub current: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub target_overridden: Option<bool>,
    /// Single-zone servers send `{}` when no override is in place, and
    /// `until` as a bare `%H:%M`.
    #[serde(default, deserialize_with = "empty_object_as_none")]
    pub target_override: Option<OverrideRecord>,
}

/// `null`, a missing field and `{}` all mean "no override".
fn empty_object_as_none<'de, D>(deserializer: D) -> Result<Option<OverrideRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(map) if map.is_empty() => Ok(None),
        Some(map) => serde_json::from_value(serde_json::Value::Object(map))
            .map(Some)
            .map_err(de::Error::custom),
    }
}

/// A zone as listed by `GET zones/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub zone_id: i64,
    pub name: String,
    #[serde(default)]
    pub boiler_relay: Option<String>,
    #[serde(default)]
    pub sensor_id: Option<i64>,
}

// ── Forms ──────────────────────────────────────────────────────────

/// Body of `POST schedule/new_entry`.
#[derive(Debug, Clone, Serialize)]
pub struct NewEntryForm {
    pub time: String,
    pub temp: f64,
    pub day: u8,
    pub zone: i64,
}

/// Body of `POST schedule/delete_entry`.
///
/// `zone` is omitted for the whole-entry form.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteEntryForm {
    pub time: String,
    pub day: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<i64>,
}

/// Body of `POST target_override`.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideForm {
    pub hours: u32,
    pub temp: f64,
    pub zone: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_entry_accepts_legacy_time_field() {
        let entry: WireEntry = serde_json::from_value(json!({ "time": "06:30", "temp": 19.5 })).unwrap();
        assert_eq!(entry.when, "06:30");
        assert!(entry.zones.is_empty());
        assert_eq!(entry.temp, Some(19.5));
    }

    #[test]
    fn week_payload_accepts_string_keyed_map() {
        let payload: WeekPayload = serde_json::from_value(json!({
            "0": [{ "when": "07:00", "zones": [{ "zone": 1, "temp": 20.0 }] }],
            "6": []
        }))
        .unwrap();
        let WeekPayload::ByDay(days) = payload else {
            panic!("expected day map");
        };
        assert_eq!(days["0"][0].zones[0].zone, 1);
    }

    #[test]
    fn summary_tolerates_missing_legacy_fields() {
        let summary: SummaryResponse = serde_json::from_value(json!({
            "zones": [{ "zone_id": 1, "name": "Living room", "target": 20.0,
                        "reported_state": null, "target_override": null }],
            "server_day_of_week": 3,
            "today": []
        }))
        .unwrap();
        assert_eq!(summary.zones.len(), 1);
        assert!(summary.target_overridden.is_none());
        assert!(summary.target_entry.is_none());
    }

    #[test]
    fn empty_legacy_override_object_is_none() {
        let summary: SummaryResponse = serde_json::from_value(json!({
            "target": 20.0,
            "target_entry": 0,
            "target_overridden": false,
            "current": 19.0,
            "server_day_of_week": 2,
            "today": [{ "time": "07:00", "temp": 20.0 }],
            "target_override": {}
        }))
        .unwrap();
        assert!(summary.target_override.is_none());
        assert_eq!(summary.target_overridden, Some(false));
    }

    #[test]
    fn legacy_override_keeps_bare_time() {
        let summary: SummaryResponse = serde_json::from_value(json!({
            "target": 22.0,
            "target_entry": -2,
            "target_overridden": true,
            "server_day_of_week": 2,
            "today": [],
            "target_override": { "until": "18:30", "temp": 22.0 }
        }))
        .unwrap();
        let record = summary.target_override.unwrap();
        assert_eq!(record.until, "18:30");
        assert_eq!(record.zone, None);
    }

    #[test]
    fn partial_override_object_is_an_error() {
        let result = serde_json::from_value::<SummaryResponse>(json!({
            "server_day_of_week": 2,
            "target_override": { "temp": 22.0 }
        }));
        assert!(result.is_err());
    }
}
