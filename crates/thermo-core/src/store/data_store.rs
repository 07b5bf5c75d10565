// ── Summary data store ──
//
// Holds the last summary the server sent, behind a `watch` channel.
// A refresh swaps the whole snapshot; override mutations patch the
// override book in place until the next refresh replaces it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::model::{ClearScope, OverrideBook, OverrideState, Summary, Zone, ZoneId};
use crate::stream::SnapshotStream;

pub struct DataStore {
    pub(crate) summary: watch::Sender<Arc<Summary>>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (summary, _) = watch::channel(Arc::new(Summary::default()));
        let (last_refresh, _) = watch::channel(None);
        Self {
            summary,
            last_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn summary_snapshot(&self) -> Arc<Summary> {
        self.summary.borrow().clone()
    }

    pub fn zones_snapshot(&self) -> Vec<Zone> {
        self.summary.borrow().zones.clone()
    }

    pub fn overrides(&self) -> OverrideBook {
        self.summary.borrow().overrides.clone()
    }

    pub fn override_state(&self, zone: ZoneId) -> OverrideState {
        self.summary.borrow().overrides.get(zone)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_summary(&self) -> SnapshotStream<Summary> {
        SnapshotStream::new(self.summary.subscribe())
    }

    // ── Override patches ─────────────────────────────────────────────

    pub(crate) fn set_override_state(&self, zone: ZoneId, state: OverrideState) {
        self.patch_overrides(|book| book.set(zone, state));
    }

    pub(crate) fn clear_overrides(&self, scope: ClearScope) {
        self.patch_overrides(|book| book.clear(scope));
    }

    fn patch_overrides(&self, f: impl FnOnce(&mut OverrideBook)) {
        self.summary.send_modify(|summary| {
            f(&mut Arc::make_mut(summary).overrides);
        });
    }

    // ── Metadata ─────────────────────────────────────────────────────

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    /// How long ago the last summary arrived, or `None` if never refreshed.
    pub fn data_age(&self) -> Option<chrono::Duration> {
        self.last_refresh().map(|t| Utc::now() - t)
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
