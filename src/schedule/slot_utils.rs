use crate::roster::{Employee, ScheduleGrid, ShiftType};

/// Index of the first empty slot in a slot list
pub fn first_empty_slot(slots: &[Option<String>]) -> Option<usize> {
    slots.iter().position(|slot| slot.is_none())
}

/// Running per-employee shift counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftCounts {
    pub day: u32,
    pub night: u32,
}

impl ShiftCounts {
    pub fn get(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Day => self.day,
            ShiftType::Night => self.night,
        }
    }

    pub fn increment(&mut self, shift: ShiftType) {
        match shift {
            ShiftType::Day => self.day += 1,
            ShiftType::Night => self.night += 1,
        }
    }
}

/// Counts how many slots of each shift type every employee holds.
/// Returns counts parallel to `employees`; names that match no employee
/// are not counted.
pub fn tally_assignments(grid: &ScheduleGrid, employees: &[Employee]) -> Vec<ShiftCounts> {
    let mut counts = vec![ShiftCounts::default(); employees.len()];
    for (_, slots) in grid.iter() {
        for shift in ShiftType::ALL {
            for name in slots.slots(shift).iter().flatten() {
                if let Some(idx) = employees.iter().position(|e| &e.name == name) {
                    counts[idx].increment(shift);
                }
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Capacity, PreferredShift};

    fn employee(name: &str) -> Employee {
        Employee {
            name: name.to_string(),
            scout_data: String::new(),
            preferred_shift: PreferredShift::Any,
        }
    }

    #[test]
    fn first_empty() {
        assert_eq!(first_empty_slot(&[Some("A".into()), None, None]), Some(1));
        assert_eq!(first_empty_slot(&[Some("A".into())]), None);
        assert_eq!(first_empty_slot(&[]), None);
    }

    #[test]
    fn tally_counts_per_shift() {
        let mut grid = ScheduleGrid::new(Capacity::new(Some(2), Some(2)));
        grid.set(1, ShiftType::Day, 0, Some("A".into()));
        grid.set(2, ShiftType::Day, 1, Some("A".into()));
        grid.set(2, ShiftType::Night, 0, Some("B".into()));
        grid.set(3, ShiftType::Night, 0, Some("Gone".into()));

        let counts = tally_assignments(&grid, &[employee("A"), employee("B")]);
        assert_eq!(counts[0], ShiftCounts { day: 2, night: 0 });
        assert_eq!(counts[1], ShiftCounts { day: 0, night: 1 });
    }
}
