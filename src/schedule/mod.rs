pub mod slot_utils;
pub mod preference;
pub mod backfill;

pub use preference::place_preferences;
pub use backfill::backfill;
pub use slot_utils::{first_empty_slot, tally_assignments, ShiftCounts};

use crate::roster::{Capacity, Employee, Preference, ScheduleGrid};

/// Builds a complete grid from scratch: preference placement, then
/// load-balanced backfill. The result is independent of any previous grid.
pub fn generate_schedule(employees: &[Employee], preferences: &[Preference], capacity: Capacity) -> ScheduleGrid {
    let mut grid = ScheduleGrid::new(capacity);
    place_preferences(&mut grid, employees, preferences);
    backfill(&mut grid, employees, preferences, capacity);
    grid
}
