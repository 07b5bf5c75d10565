// ── Reactive state stores ──
//
// Working state behind `watch` channels. Consumers read snapshots and
// subscribe to changes; only the controller and the editor write.

mod data_store;
mod refresh;
mod schedule_store;

pub use data_store::DataStore;
pub use schedule_store::ScheduleStore;
