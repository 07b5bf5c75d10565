// Summary and zone listing endpoints

use crate::client::SchedulerClient;
use crate::error::Error;
use crate::models::{SummaryResponse, ZoneRecord};

impl SchedulerClient {
    /// Fetch the point-in-time summary (zones, today's schedule, overrides).
    ///
    /// `GET api/summary`
    pub async fn get_summary(&self) -> Result<SummaryResponse, Error> {
        let url = self.api_url("summary")?;
        self.get_json(url).await
    }

    /// List configured zones.
    ///
    /// `GET api/zones/`
    pub async fn list_zones(&self) -> Result<Vec<ZoneRecord>, Error> {
        let url = self.api_url("zones/")?;
        self.get_json(url).await
    }
}
