use crate::roster::{Employee, Preference, ScheduleGrid};

use super::slot_utils::first_empty_slot;

/// Places every exact day/night preference into the first empty slot of its
/// day and shift type.
///
/// Employees are visited in stored order and each employee's preferences in
/// stored order, so earlier entries win contested slots. A preference whose
/// slot list is already full is dropped.
pub fn place_preferences(grid: &mut ScheduleGrid, employees: &[Employee], preferences: &[Preference]) {
    for employee in employees {
        for pref in preferences.iter().filter(|p| p.employee == employee.name) {
            let Some(shift) = pref.shift.placeable() else {
                continue;
            };
            let Some(slots) = grid.slots_mut(pref.day, shift) else {
                continue;
            };
            match first_empty_slot(slots) {
                Some(idx) => slots[idx] = Some(employee.name.clone()),
                None => tracing::debug!(
                    employee = %employee.name,
                    day = pref.day,
                    shift = shift.as_str(),
                    "Preference dropped, no empty slot"
                ),
            }
        }
    }
}
