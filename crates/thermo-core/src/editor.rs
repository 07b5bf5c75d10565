// ── Schedule editing session ──
//
// Mirrors the weekly schedule for the life of one editing session and
// keeps it in step with the server. Adds are optimistic: the row lands in
// the working copy before any request goes out, one `new_entry` request
// per zone is sent concurrently, and the row is published once every
// request has settled. Other edits may publish meanwhile without exposing
// it. Removals wait for the server first.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use thermo_api::SchedulerClient;
use thermo_api::models::{DeleteEntryForm, NewEntryForm};

use crate::convert;
use crate::error::CoreError;
use crate::model::{DaySchedule, ScheduleEntry, Temperature, TimeOfDay, WeekSchedule, Weekday, ZoneId};
use crate::store::ScheduleStore;
use crate::stream::SnapshotStream;

/// Result of an add that reached the server for at least one zone.
#[derive(Debug)]
pub struct AddOutcome {
    pub day: Weekday,
    /// Position the row was inserted at.
    pub index: usize,
    /// The row as kept locally, including zones whose request failed.
    pub entry: ScheduleEntry,
    pub confirmed: Vec<ZoneId>,
    pub failed: Vec<(ZoneId, CoreError)>,
}

impl AddOutcome {
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// An open schedule editing session.
///
/// Dropping or [closing](Self::close) the session cancels anything still
/// in flight; those calls resolve to [`CoreError::Cancelled`] without
/// publishing.
pub struct ScheduleEditor {
    client: SchedulerClient,
    store: Arc<ScheduleStore>,
    cancel: CancellationToken,
}

impl ScheduleEditor {
    pub(crate) async fn open(client: SchedulerClient, cancel: CancellationToken) -> Result<Self, CoreError> {
        let editor = Self {
            client,
            store: Arc::new(ScheduleStore::new()),
            cancel,
        };
        editor.reload().await?;
        Ok(editor)
    }

    /// Replace the mirror with the server's full schedule.
    pub async fn reload(&self) -> Result<(), CoreError> {
        let response = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(CoreError::Cancelled),
            r = self.client.get_schedule() => r?,
        };
        let week = convert::week_from_wire(&response)?;
        debug!(entries = week.entry_count(), "schedule loaded");
        self.store.load(week);
        Ok(())
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Last published week.
    pub fn week(&self) -> Arc<WeekSchedule> {
        self.store.snapshot()
    }

    pub fn day(&self, day: Weekday) -> DaySchedule {
        self.store.snapshot().day(day).clone()
    }

    pub fn subscribe(&self) -> SnapshotStream<WeekSchedule> {
        self.store.subscribe()
    }

    /// The store backing this session, including unpublished edits.
    pub fn store(&self) -> &Arc<ScheduleStore> {
        &self.store
    }

    // ── Edits ────────────────────────────────────────────────────

    /// Add a row at `when` on `day`.
    ///
    /// Zones paired with `None` are left out of the row. The call returns
    /// once every zone request has settled. Zones whose request failed are
    /// reported in [`AddOutcome::failed`] but stay in the local row; if no
    /// zone got through the row is taken out again and the first error is
    /// returned.
    pub async fn add_entry(
        &self,
        day: Weekday,
        when: &TimeOfDay,
        temps: impl IntoIterator<Item = (ZoneId, Option<Temperature>)>,
    ) -> Result<AddOutcome, CoreError> {
        let included: Vec<(ZoneId, Temperature)> = temps
            .into_iter()
            .filter_map(|(zone, temp)| temp.map(|t| (zone, t)))
            .collect();
        if included.is_empty() {
            return Err(CoreError::ValidationFailed {
                message: "no zone has a temperature for this entry".into(),
            });
        }
        if self.cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }

        let entry = included
            .iter()
            .fold(ScheduleEntry::new(when.clone()), |e, (zone, temp)| e.with_zone(*zone, *temp));
        let index = self.store.insert(day, entry.clone())?;
        debug!(%day, %when, index, zones = included.len(), "entry inserted locally");

        let requests = included.iter().map(|(zone, temp)| {
            let client = &self.client;
            let form = NewEntryForm {
                time: when.to_string(),
                temp: temp.celsius(),
                day: day.index(),
                zone: zone.get(),
            };
            async move { (*zone, client.add_schedule_entry(&form).await) }
        });

        let results = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                self.roll_back(day, &entry);
                return Err(CoreError::Cancelled);
            }
            results = join_all(requests) => results,
        };

        let mut confirmed = Vec::new();
        let mut failed = Vec::new();
        for (zone, result) in results {
            match result {
                Ok(()) => confirmed.push(zone),
                Err(e) => failed.push((zone, CoreError::from(e))),
            }
        }

        if confirmed.is_empty() {
            self.roll_back(day, &entry);
            let first = failed
                .into_iter()
                .next()
                .map_or_else(|| CoreError::Internal("add finished without results".into()), |(_, e)| e);
            warn!(%day, %when, error = %first, "entry rejected for every zone, rolled back");
            return Err(first);
        }

        if !failed.is_empty() {
            let zones: Vec<String> = failed.iter().map(|(z, _)| z.to_string()).collect();
            warn!(
                %day,
                %when,
                failed = %zones.join(","),
                "entry only partially saved; failed zones are kept locally"
            );
        }

        self.store.settle(day, when);
        self.store.publish();
        info!(%day, %when, confirmed = confirmed.len(), "schedule entry added");
        Ok(AddOutcome {
            day,
            index,
            entry,
            confirmed,
            failed,
        })
    }

    /// Remove the whole row at `when` on `day`.
    ///
    /// Nothing is sent when the row is not known locally or its add is
    /// still in flight. The local row is removed only after the server
    /// accepted the deletion.
    pub async fn remove_entry(&self, day: Weekday, when: &TimeOfDay) -> Result<ScheduleEntry, CoreError> {
        if self.store.get_settled(day, when).is_none() {
            return Err(CoreError::EntryNotFound {
                when: when.to_string(),
            });
        }

        let form = DeleteEntryForm {
            time: when.to_string(),
            day: day.index(),
            zone: None,
        };
        self.send_delete(&form).await?;

        let removed = self.store.remove(day, when)?;
        self.store.publish();
        info!(%day, %when, "schedule entry removed");
        Ok(removed)
    }

    /// Remove one zone's target from the row at `when` on `day`.
    pub async fn remove_zone_entry(
        &self,
        day: Weekday,
        when: &TimeOfDay,
        zone: ZoneId,
    ) -> Result<Temperature, CoreError> {
        let known = self
            .store
            .get_settled(day, when)
            .is_some_and(|e| e.zone_temp(zone).is_some());
        if !known {
            return Err(CoreError::EntryNotFound {
                when: format!("{when} (zone {zone})"),
            });
        }

        let form = DeleteEntryForm {
            time: when.to_string(),
            day: day.index(),
            zone: Some(zone.get()),
        };
        self.send_delete(&form).await?;

        let removed = self.store.remove_zone(day, when, zone)?;
        self.store.publish();
        info!(%day, %when, %zone, "zone removed from schedule entry");
        Ok(removed)
    }

    fn roll_back(&self, day: Weekday, entry: &ScheduleEntry) {
        if !self.store.roll_back(day, entry) {
            warn!(%day, when = %entry.when, "row changed while its add was in flight, left in place");
        }
    }

    async fn send_delete(&self, form: &DeleteEntryForm) -> Result<(), CoreError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            r = self.client.delete_schedule_entry(form) => r.map_err(CoreError::from),
        }
    }

    // ── Session end ──────────────────────────────────────────────

    /// End the session. In-flight edits resolve to `Cancelled`.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            debug!("closing schedule editor");
            self.cancel.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ScheduleEditor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
