// ── Summary application ──
//
// A summary replaces everything the store knew: zones, overrides, today's
// rows and the active row. Nothing is merged with the previous snapshot.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::DataStore;
use crate::model::Summary;

impl DataStore {
    pub(crate) fn apply_summary(&self, summary: Summary) {
        debug!(
            zones = summary.zones.len(),
            today = summary.today.len(),
            server_day = %summary.server_day,
            "applying summary"
        );
        self.summary.send_replace(Arc::new(summary));
        self.last_refresh.send_replace(Some(Utc::now()));
    }
}
