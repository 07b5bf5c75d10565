// Schedule endpoints
//
// Full-week fetch plus the entry-and-zone grained mutations. A single
// "add" in the UI maps to one `new_entry` call per zone.

use tracing::debug;

use crate::client::SchedulerClient;
use crate::error::Error;
use crate::models::{DeleteEntryForm, NewEntryForm, ScheduleResponse};

impl SchedulerClient {
    /// Fetch the whole weekly schedule.
    ///
    /// `GET api/schedule`
    pub async fn get_schedule(&self) -> Result<ScheduleResponse, Error> {
        let url = self.api_url("schedule")?;
        self.get_json(url).await
    }

    /// Add one zone's target to a schedule row.
    ///
    /// `POST api/schedule/new_entry` with `time`, `temp`, `day`, `zone`
    pub async fn add_schedule_entry(&self, form: &NewEntryForm) -> Result<(), Error> {
        let url = self.api_url("schedule/new_entry")?;
        debug!(time = %form.time, day = form.day, zone = form.zone, "adding schedule entry");
        self.post_form(url, form).await
    }

    /// Delete a schedule row, or one zone's part of it when `zone` is set.
    ///
    /// `POST api/schedule/delete_entry` with `time`, `day` and optional `zone`
    pub async fn delete_schedule_entry(&self, form: &DeleteEntryForm) -> Result<(), Error> {
        let url = self.api_url("schedule/delete_entry")?;
        debug!(time = %form.time, day = form.day, zone = ?form.zone, "deleting schedule entry");
        self.post_form(url, form).await
    }
}
