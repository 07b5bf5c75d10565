// ── Domain model ──
//
// Validated client-side representation of the thermostat: times of day,
// zones, the weekly schedule and override states. Wire shapes live in
// thermo-api and are converted in `crate::convert`.

pub mod override_state;
pub mod schedule;
pub mod summary;
pub mod time_of_day;
pub mod weekday;
pub mod zone;

// ── Re-exports ──────────────────────────────────────────────────────

pub use override_state::{ClearScope, OverrideBook, OverrideRequest, OverrideState};
pub use schedule::{DaySchedule, ScheduleEntry, WeekSchedule};
pub use summary::Summary;
pub use time_of_day::TimeOfDay;
pub use weekday::Weekday;
pub use zone::{DeviceReport, Temperature, Zone, ZoneId, ZoneInfo};
