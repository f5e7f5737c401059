pub mod types;
pub mod capacity;
pub mod grid;
pub mod store;

pub use types::{Employee, Preference, PreferenceShift, PreferredShift, ShiftType};
pub use capacity::{Capacity, DEFAULT_MAX_SHIFTS};
pub use grid::{roster_days, DaySlots, ScheduleGrid, DAYS_IN_ROSTER};
pub use store::{GridState, RosterStore};
