// thermo-core: Schedule and override state model between thermo-api and consumers (CLI).

pub mod config;
pub mod controller;
pub mod convert;
pub mod editor;
pub mod error;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ThermostatConfig, TlsVerification};
pub use controller::Thermostat;
pub use editor::{AddOutcome, ScheduleEditor};
pub use error::CoreError;
pub use store::{DataStore, ScheduleStore};
pub use stream::SnapshotStream;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ClearScope, DaySchedule, DeviceReport, OverrideBook, OverrideRequest, OverrideState,
    ScheduleEntry, Summary, Temperature, TimeOfDay, WeekSchedule, Weekday, Zone, ZoneId, ZoneInfo,
};
