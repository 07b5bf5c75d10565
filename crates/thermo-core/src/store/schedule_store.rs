// ── Schedule store ──
//
// Owns the editing session's `WeekSchedule`. Edits land in a private
// working copy immediately; readers only see what has been published.
// Rows whose add is still in flight are marked pending and left out of
// every publication until they settle. The lock is never held across an
// await.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::error::CoreError;
use crate::model::{DaySchedule, ScheduleEntry, Temperature, TimeOfDay, WeekSchedule, Weekday, ZoneId};
use crate::stream::SnapshotStream;

pub struct ScheduleStore {
    working: Mutex<Working>,
    published: watch::Sender<Arc<WeekSchedule>>,
}

#[derive(Default)]
struct Working {
    week: WeekSchedule,
    pending: BTreeSet<(Weekday, TimeOfDay)>,
}

impl Working {
    /// The week as subscribers may see it.
    fn settled(&self) -> WeekSchedule {
        let mut week = self.week.clone();
        for (day, when) in &self.pending {
            let _ = week.day_mut(*day).remove(when);
        }
        week
    }
}

impl ScheduleStore {
    pub fn new() -> Self {
        let (published, _) = watch::channel(Arc::new(WeekSchedule::new()));
        Self {
            working: Mutex::new(Working::default()),
            published,
        }
    }

    fn working(&self) -> MutexGuard<'_, Working> {
        self.working.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Whole-week replacement ───────────────────────────────────────

    /// Replace the working copy and publish it. Pending marks survive.
    pub fn load(&self, week: WeekSchedule) {
        let mut working = self.working();
        working.week = week;
        let snapshot = Arc::new(working.settled());
        drop(working);
        self.published.send_replace(snapshot);
    }

    // ── Working-copy edits (unpublished) ─────────────────────────────

    /// Insert a row and mark it pending until [`settle`](Self::settle)
    /// or [`roll_back`](Self::roll_back).
    pub(crate) fn insert(&self, day: Weekday, entry: ScheduleEntry) -> Result<usize, CoreError> {
        let mut working = self.working();
        let when = entry.when.clone();
        let index = working.week.day_mut(day).insert(entry)?;
        working.pending.insert((day, when));
        Ok(index)
    }

    /// Make a pending row publishable.
    pub(crate) fn settle(&self, day: Weekday, when: &TimeOfDay) {
        self.working().pending.remove(&(day, when.clone()));
    }

    /// Take back a pending row, but only if it is still the one inserted.
    ///
    /// Returns `false` and leaves the working copy alone otherwise. The
    /// pending mark is cleared either way.
    pub(crate) fn roll_back(&self, day: Weekday, inserted: &ScheduleEntry) -> bool {
        let mut working = self.working();
        let was_pending = working.pending.remove(&(day, inserted.when.clone()));
        let unchanged = working.week.day(day).get(&inserted.when) == Some(inserted);
        if was_pending && unchanged {
            working.week.day_mut(day).remove(&inserted.when).is_ok()
        } else {
            false
        }
    }

    pub(crate) fn remove(&self, day: Weekday, when: &TimeOfDay) -> Result<ScheduleEntry, CoreError> {
        self.working().week.day_mut(day).remove(when)
    }

    pub(crate) fn remove_zone(
        &self,
        day: Weekday,
        when: &TimeOfDay,
        zone: ZoneId,
    ) -> Result<Temperature, CoreError> {
        self.working().week.day_mut(day).remove_zone(when, zone)
    }

    /// Copy the working copy, minus pending rows, out to subscribers.
    pub(crate) fn publish(&self) {
        let snapshot = Arc::new(self.working().settled());
        self.published.send_replace(snapshot);
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Row at `when` in the working copy.
    pub fn get(&self, day: Weekday, when: &TimeOfDay) -> Option<ScheduleEntry> {
        self.working().week.day(day).get(when).cloned()
    }

    /// Row at `when` unless its add is still in flight.
    pub fn get_settled(&self, day: Weekday, when: &TimeOfDay) -> Option<ScheduleEntry> {
        let working = self.working();
        if working.pending.contains(&(day, when.clone())) {
            return None;
        }
        working.week.day(day).get(when).cloned()
    }

    /// The working copy of one day, including unpublished edits.
    pub fn working_day(&self, day: Weekday) -> DaySchedule {
        self.working().week.day(day).clone()
    }

    /// Last published week.
    pub fn snapshot(&self) -> Arc<WeekSchedule> {
        self.published.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotStream<WeekSchedule> {
        SnapshotStream::new(self.published.subscribe())
    }
}

impl Default for ScheduleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(when: &str) -> ScheduleEntry {
        ScheduleEntry::new(TimeOfDay::parse(when).unwrap())
            .with_zone(ZoneId(1), Temperature::new(19.0).unwrap())
    }

    #[test]
    fn edits_stay_private_until_published() {
        let store = ScheduleStore::new();
        store.insert(Weekday::Monday, entry("07:00")).unwrap();

        assert!(store.snapshot().day(Weekday::Monday).is_empty());
        assert_eq!(store.working_day(Weekday::Monday).len(), 1);

        store.publish();
        assert!(store.snapshot().day(Weekday::Monday).is_empty(), "pending rows are held back");

        store.settle(Weekday::Monday, &TimeOfDay::parse("07:00").unwrap());
        store.publish();
        assert_eq!(store.snapshot().day(Weekday::Monday).len(), 1);
    }

    #[test]
    fn publishing_one_row_holds_back_another_in_flight() {
        let store = ScheduleStore::new();
        let slow = entry("07:00");
        let fast = entry("12:00");
        store.insert(Weekday::Monday, slow.clone()).unwrap();
        store.insert(Weekday::Monday, fast.clone()).unwrap();

        store.settle(Weekday::Monday, &fast.when);
        store.publish();
        let published = store.snapshot();
        assert!(published.day(Weekday::Monday).get(&slow.when).is_none());
        assert!(published.day(Weekday::Monday).get(&fast.when).is_some());
        assert!(store.get_settled(Weekday::Monday, &slow.when).is_none());
        assert!(store.get(Weekday::Monday, &slow.when).is_some());
    }

    #[test]
    fn roll_back_takes_only_the_inserted_row() {
        let store = ScheduleStore::new();
        let inserted = entry("07:00");
        store.insert(Weekday::Monday, inserted.clone()).unwrap();

        assert!(store.roll_back(Weekday::Monday, &inserted));
        assert!(store.working_day(Weekday::Monday).is_empty());

        // A row that is no longer pending is left in place.
        store.insert(Weekday::Monday, inserted.clone()).unwrap();
        store.settle(Weekday::Monday, &inserted.when);
        assert!(!store.roll_back(Weekday::Monday, &inserted));
        assert_eq!(store.working_day(Weekday::Monday).len(), 1);

        // So is a pending row that was changed underneath.
        let other = entry("18:00").with_zone(ZoneId(2), Temperature::new(17.0).unwrap());
        store.insert(Weekday::Monday, other.clone()).unwrap();
        store.remove_zone(Weekday::Monday, &other.when, ZoneId(2)).unwrap();
        assert!(!store.roll_back(Weekday::Monday, &other));
        assert!(store.get(Weekday::Monday, &other.when).is_some());
    }

    #[tokio::test]
    async fn subscribers_see_publications() {
        let store = ScheduleStore::new();
        let mut sub = store.subscribe();
        assert_eq!(sub.current().entry_count(), 0);

        let mut week = WeekSchedule::new();
        week.day_mut(Weekday::Friday).insert(entry("08:00")).unwrap();
        store.load(week);

        let snap = sub.changed().await.unwrap();
        assert_eq!(snap.day(Weekday::Friday).len(), 1);
    }
}
