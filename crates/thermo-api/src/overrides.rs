// Target override endpoints
//
// The legacy `target_override` resource clears every zone at once; the
// zone API exposes a per-zone deletion as well.

use tracing::debug;

use crate::client::SchedulerClient;
use crate::error::Error;
use crate::models::OverrideForm;

impl SchedulerClient {
    /// Set a temporary target for a zone.
    ///
    /// `POST api/target_override` with `hours`, `temp`, `zone`
    pub async fn set_target_override(&self, form: &OverrideForm) -> Result<(), Error> {
        let url = self.api_url("target_override")?;
        debug!(zone = form.zone, temp = form.temp, hours = form.hours, "setting override");
        self.post_form(url, form).await
    }

    /// Clear the current override on every zone.
    ///
    /// `DELETE api/target_override`
    pub async fn clear_target_override(&self) -> Result<(), Error> {
        let url = self.api_url("target_override")?;
        debug!("clearing all overrides");
        self.delete(url).await
    }

    /// Clear the override of a single zone.
    ///
    /// `DELETE api/zones/{zone}/override`
    pub async fn clear_zone_override(&self, zone: i64) -> Result<(), Error> {
        let url = self.api_url(&format!("zones/{zone}/override"))?;
        debug!(zone, "clearing zone override");
        self.delete(url).await
    }
}
