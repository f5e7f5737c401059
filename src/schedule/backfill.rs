use crate::roster::{roster_days, Capacity, Employee, Preference, ScheduleGrid, ShiftType};

use super::slot_utils::{tally_assignments, ShiftCounts};

/// Fills the slots left empty after preference placement.
///
/// Days are visited in order, day shift before night shift, slots by index.
/// Each empty slot goes to the eligible employee with the fewest shifts of
/// that type so far; ties go to whoever is stored first. A slot with no
/// eligible employee stays empty.
pub fn backfill(grid: &mut ScheduleGrid, employees: &[Employee], preferences: &[Preference], capacity: Capacity) {
    let mut counts = tally_assignments(grid, employees);

    for day in roster_days() {
        for shift in ShiftType::ALL {
            let limit = capacity.for_shift(shift);
            let Some(slots) = grid.slots_mut(day, shift) else {
                continue;
            };
            for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
                let Some(idx) = select_employee(employees, preferences, &counts, day, shift, limit) else {
                    continue;
                };
                *slot = Some(employees[idx].name.clone());
                counts[idx].increment(shift);
            }
        }
    }
}

/// Picks the least loaded eligible employee, first in stored order on ties
fn select_employee(
    employees: &[Employee],
    preferences: &[Preference],
    counts: &[ShiftCounts],
    day: u32,
    shift: ShiftType,
    limit: u32,
) -> Option<usize> {
    employees
        .iter()
        .enumerate()
        .filter(|(idx, employee)| is_eligible(employee, counts[*idx], preferences, day, shift, limit))
        .min_by_key(|(idx, _)| counts[*idx].get(shift))
        .map(|(idx, _)| idx)
}

/// Under the limit, affinity matches, and no conflicting request for `day`
fn is_eligible(
    employee: &Employee,
    counts: ShiftCounts,
    preferences: &[Preference],
    day: u32,
    shift: ShiftType,
    limit: u32,
) -> bool {
    if counts.get(shift) >= limit || !employee.preferred_shift.accepts(shift) {
        return false;
    }
    match preferences.iter().find(|p| p.matches(&employee.name, day)) {
        Some(pref) => !pref.shift.excludes(shift),
        None => true,
    }
}
