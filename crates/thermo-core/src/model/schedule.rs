// ── Schedule domain types ──
//
// A day is a short list of rows kept strictly increasing by start time.
// Rows are diffs: a zone missing from a row keeps whatever target an
// earlier row gave it. Days hold at most a few dozen rows, so every
// lookup below is a linear scan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::time_of_day::{TimeOfDay, compare};
use super::weekday::Weekday;
use super::zone::{Temperature, ZoneId};
use crate::error::CoreError;

/// One schedule row: a start time and the zones it sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub when: TimeOfDay,
    pub zone_temps: BTreeMap<ZoneId, Temperature>,
}

impl ScheduleEntry {
    pub fn new(when: TimeOfDay) -> Self {
        Self {
            when,
            zone_temps: BTreeMap::new(),
        }
    }

    pub fn with_zone(mut self, zone: ZoneId, temp: Temperature) -> Self {
        self.zone_temps.insert(zone, temp);
        self
    }

    /// Target this row sets for `zone`, if it mentions the zone at all.
    pub fn zone_temp(&self, zone: ZoneId) -> Option<Temperature> {
        self.zone_temps.get(&zone).copied()
    }

    pub fn zones(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.zone_temps.keys().copied()
    }
}

/// One weekday's rows, strictly increasing by `when`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DaySchedule {
    entries: Vec<ScheduleEntry>,
}

impl DaySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a day from rows in any order. Two rows at the same time are a
    /// conflict.
    pub fn from_entries(entries: impl IntoIterator<Item = ScheduleEntry>) -> Result<Self, CoreError> {
        let mut day = Self::new();
        for entry in entries {
            day.insert(entry)?;
        }
        Ok(day)
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleEntry> {
        self.entries.iter()
    }

    pub fn position(&self, when: &TimeOfDay) -> Option<usize> {
        self.entries.iter().position(|e| e.when == *when)
    }

    pub fn get(&self, when: &TimeOfDay) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.when == *when)
    }

    /// Index at which a row starting at `when` belongs: every earlier row
    /// starts strictly before it.
    pub fn insertion_index(&self, when: &TimeOfDay) -> usize {
        self.entries
            .iter()
            .filter(|e| compare(&e.when, when).is_lt())
            .count()
    }

    /// Insert a row at its ordered position and return that position.
    ///
    /// Rejects a second row with an occupied `when`.
    pub fn insert(&mut self, entry: ScheduleEntry) -> Result<usize, CoreError> {
        if self.position(&entry.when).is_some() {
            return Err(CoreError::Conflict {
                when: entry.when.to_string(),
            });
        }
        let index = self.insertion_index(&entry.when);
        self.entries.insert(index, entry);
        debug_assert!(self.is_strictly_ordered());
        Ok(index)
    }

    /// Remove the row starting at `when`.
    pub fn remove(&mut self, when: &TimeOfDay) -> Result<ScheduleEntry, CoreError> {
        let index = self.position(when).ok_or_else(|| CoreError::EntryNotFound {
            when: when.to_string(),
        })?;
        Ok(self.entries.remove(index))
    }

    /// Drop one zone's target from the row at `when`; the row goes away
    /// once no zone is left. Returns the removed temperature.
    pub fn remove_zone(&mut self, when: &TimeOfDay, zone: ZoneId) -> Result<Temperature, CoreError> {
        let not_found = || CoreError::EntryNotFound {
            when: format!("{when} (zone {zone})"),
        };
        let index = self.position(when).ok_or_else(not_found)?;
        let temp = self.entries[index]
            .zone_temps
            .remove(&zone)
            .ok_or_else(not_found)?;
        if self.entries[index].zone_temps.is_empty() {
            self.entries.remove(index);
        }
        Ok(temp)
    }

    /// Target in force for `zone` at `when`: the latest row at or before
    /// `when` that mentions the zone.
    pub fn effective_target(&self, zone: ZoneId, when: &TimeOfDay) -> Option<Temperature> {
        self.entries
            .iter()
            .take_while(|e| compare(&e.when, when).is_le())
            .filter_map(|e| e.zone_temp(zone))
            .last()
    }

    /// Index of the row in force at `now`, if any row has started yet.
    pub fn active_index(&self, now: &TimeOfDay) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| compare(&e.when, now).is_le())
    }

    /// Start time of the row after `index`; `None` means the row runs until
    /// the end of the day.
    pub fn end_of(&self, index: usize) -> Option<&TimeOfDay> {
        self.entries.get(index + 1).map(|e| &e.when)
    }

    pub fn is_strictly_ordered(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| compare(&pair[0].when, &pair[1].when).is_lt())
    }
}

impl<'a> IntoIterator for &'a DaySchedule {
    type Item = &'a ScheduleEntry;
    type IntoIter = std::slice::Iter<'a, ScheduleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The seven days of the recurring weekly schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekSchedule {
    days: [DaySchedule; 7],
}

impl WeekSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn day(&self, day: Weekday) -> &DaySchedule {
        &self.days[usize::from(day.index())]
    }

    pub fn day_mut(&mut self, day: Weekday) -> &mut DaySchedule {
        &mut self.days[usize::from(day.index())]
    }

    pub fn set_day(&mut self, day: Weekday, schedule: DaySchedule) {
        *self.day_mut(day) = schedule;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySchedule)> {
        Weekday::iter().map(|day| (day, self.day(day)))
    }

    /// Total number of rows across the week.
    pub fn entry_count(&self) -> usize {
        self.days.iter().map(DaySchedule::len).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn temp(c: f64) -> Temperature {
        Temperature::new(c).unwrap()
    }

    fn entry(when: &str) -> ScheduleEntry {
        ScheduleEntry::new(t(when)).with_zone(ZoneId(1), temp(20.0))
    }

    fn times(day: &DaySchedule) -> Vec<&str> {
        day.iter().map(|e| e.when.as_str()).collect()
    }

    #[test]
    fn insert_between_existing_rows() {
        let mut day = DaySchedule::from_entries([entry("07:00"), entry("18:00")]).unwrap();

        let index = day.insert(entry("12:00")).unwrap();

        assert_eq!(index, 1);
        assert_eq!(times(&day), vec!["07:00", "12:00", "18:00"]);
    }

    #[test]
    fn every_insert_keeps_strict_order() {
        let mut day = DaySchedule::new();
        for when in ["18:00", "06:30", "23:59", "00:00", "12:00", "06:31", "17:59"] {
            day.insert(entry(when)).unwrap();
            assert!(day.is_strictly_ordered(), "out of order after {when}: {:?}", times(&day));
        }
        assert_eq!(
            times(&day),
            vec!["00:00", "06:30", "06:31", "12:00", "17:59", "18:00", "23:59"]
        );
    }

    #[test]
    fn duplicate_when_is_rejected_and_day_unchanged() {
        let mut day = DaySchedule::from_entries([entry("07:00"), entry("18:00")]).unwrap();
        let before = day.clone();

        let err = day
            .insert(ScheduleEntry::new(t("07:00")).with_zone(ZoneId(2), temp(15.0)))
            .unwrap_err();

        assert!(matches!(err, CoreError::Conflict { ref when } if when == "07:00"));
        assert_eq!(day, before);
        assert_eq!(day.iter().filter(|e| e.when == t("07:00")).count(), 1);
    }

    #[test]
    fn remove_then_reinsert_restores_order() {
        let original =
            DaySchedule::from_entries([entry("06:00"), entry("09:00"), entry("17:30"), entry("22:00")])
                .unwrap();
        let mut day = original.clone();

        let removed = day.remove(&t("09:00")).unwrap();
        assert_eq!(times(&day), vec!["06:00", "17:30", "22:00"]);

        day.insert(removed).unwrap();
        assert_eq!(day, original);
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut day = DaySchedule::from_entries([entry("07:00")]).unwrap();
        let err = day.remove(&t("08:00")).unwrap_err();
        assert!(matches!(err, CoreError::EntryNotFound { .. }));
        assert_eq!(day.len(), 1);
    }

    #[test]
    fn remove_zone_drops_empty_rows() {
        let mut day = DaySchedule::from_entries([ScheduleEntry::new(t("07:00"))
            .with_zone(ZoneId(1), temp(20.0))
            .with_zone(ZoneId(2), temp(18.0))])
        .unwrap();

        day.remove_zone(&t("07:00"), ZoneId(1)).unwrap();
        assert_eq!(day.get(&t("07:00")).unwrap().zones().collect::<Vec<_>>(), vec![ZoneId(2)]);

        day.remove_zone(&t("07:00"), ZoneId(2)).unwrap();
        assert!(day.is_empty());

        assert!(day.remove_zone(&t("07:00"), ZoneId(2)).is_err());
    }

    #[test]
    fn zone_temp_absent_for_unmentioned_zone() {
        let row = entry("07:00");
        assert_eq!(row.zone_temp(ZoneId(1)), Some(temp(20.0)));
        assert_eq!(row.zone_temp(ZoneId(9)), None);
    }

    #[test]
    fn effective_target_follows_diffs() {
        let day = DaySchedule::from_entries([
            ScheduleEntry::new(t("06:00"))
                .with_zone(ZoneId(1), temp(20.0))
                .with_zone(ZoneId(2), temp(18.0)),
            ScheduleEntry::new(t("09:00")).with_zone(ZoneId(1), temp(16.0)),
            ScheduleEntry::new(t("17:00")).with_zone(ZoneId(2), temp(21.0)),
        ])
        .unwrap();

        assert_eq!(day.effective_target(ZoneId(1), &t("05:59")), None);
        assert_eq!(day.effective_target(ZoneId(1), &t("10:00")), Some(temp(16.0)));
        // Zone 2 is untouched by the 09:00 row.
        assert_eq!(day.effective_target(ZoneId(2), &t("10:00")), Some(temp(18.0)));
        assert_eq!(day.effective_target(ZoneId(2), &t("17:00")), Some(temp(21.0)));
    }

    #[test]
    fn active_index_and_end_labels() {
        let day = DaySchedule::from_entries([entry("07:00"), entry("18:00")]).unwrap();

        assert_eq!(day.active_index(&t("06:59")), None);
        assert_eq!(day.active_index(&t("07:00")), Some(0));
        assert_eq!(day.active_index(&t("23:00")), Some(1));
        assert_eq!(day.end_of(0), Some(&t("18:00")));
        assert_eq!(day.end_of(1), None);
    }

    #[test]
    fn week_days_are_independent() {
        let mut week = WeekSchedule::new();
        week.day_mut(Weekday::Tuesday).insert(entry("07:00")).unwrap();

        assert_eq!(week.day(Weekday::Tuesday).len(), 1);
        assert!(week.day(Weekday::Monday).is_empty());
        assert_eq!(week.entry_count(), 1);
        assert_eq!(week.iter().count(), 7);
    }
}
