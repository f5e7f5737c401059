use serde::Serialize;

use crate::schedule::generate_schedule;

use super::capacity::Capacity;
use super::grid::{is_roster_day, ScheduleGrid};
use super::types::{Employee, Preference, PreferenceShift, PreferredShift, ShiftType};

/// Whether the grid still reflects the current employees, preferences and capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GridState {
    Stale,
    Generated,
}

/// Owns employees, preferences, capacity and the schedule grid.
///
/// Invalid input is rejected silently: mutators return `false` instead of an
/// error and leave the store untouched.
#[derive(Debug, Clone)]
pub struct RosterStore {
    employees: Vec<Employee>,
    preferences: Vec<Preference>,
    capacity: Capacity,
    grid: ScheduleGrid,
    state: GridState,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterStore {
    pub fn new() -> Self {
        Self::with_capacity(Capacity::default())
    }

    pub fn with_capacity(capacity: Capacity) -> Self {
        Self {
            employees: Vec::new(),
            preferences: Vec::new(),
            capacity,
            grid: ScheduleGrid::new(capacity),
            state: GridState::Stale,
        }
    }

    /// Reassembles a store from already validated parts
    pub fn from_parts(
        employees: Vec<Employee>,
        preferences: Vec<Preference>,
        capacity: Capacity,
        grid: ScheduleGrid,
    ) -> Self {
        Self {
            employees,
            preferences,
            capacity,
            grid,
            state: GridState::Stale,
        }
    }

    /// Inserts or replaces an employee by name. Blank names are ignored.
    pub fn upsert_employee(&mut self, name: &str, scout_data: &str, preferred_shift: PreferredShift) -> bool {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring employee with blank name");
            return false;
        }

        let employee = Employee {
            name: name.to_string(),
            scout_data: scout_data.trim().to_string(),
            preferred_shift,
        };
        match self.employees.iter_mut().find(|e| e.name == name) {
            // Replacing keeps the original position
            Some(existing) => *existing = employee,
            None => self.employees.push(employee),
        }
        self.state = GridState::Stale;
        true
    }

    /// Removes an employee together with all of their preferences.
    /// Slots already holding the name are left as they are.
    pub fn remove_employee(&mut self, name: &str) {
        let before = (self.employees.len(), self.preferences.len());
        self.employees.retain(|e| e.name != name);
        self.preferences.retain(|p| p.employee != name);
        if (self.employees.len(), self.preferences.len()) != before {
            self.state = GridState::Stale;
        }
    }

    /// Inserts or replaces the preference for (employee, day).
    /// An empty employee or a day outside 1..=31 is ignored.
    pub fn upsert_preference(&mut self, employee: &str, day: u32, shift: PreferenceShift) -> bool {
        if employee.is_empty() || !is_roster_day(day) {
            tracing::debug!(employee, day, "Ignoring invalid preference");
            return false;
        }

        match self.preferences.iter_mut().find(|p| p.matches(employee, day)) {
            Some(existing) => existing.shift = shift,
            None => self.preferences.push(Preference {
                employee: employee.to_string(),
                day,
                shift,
            }),
        }
        self.state = GridState::Stale;
        true
    }

    pub fn remove_preference(&mut self, employee: &str, day: u32) {
        let before = self.preferences.len();
        self.preferences.retain(|p| !p.matches(employee, day));
        if self.preferences.len() != before {
            self.state = GridState::Stale;
        }
    }

    /// Applies new limits (absent ones become the default) and clears the grid
    pub fn set_capacity(&mut self, max_day: Option<u32>, max_night: Option<u32>) {
        self.capacity = Capacity::new(max_day, max_night);
        self.grid = ScheduleGrid::new(self.capacity);
        self.state = GridState::Stale;
        tracing::debug!(
            max_day = self.capacity.max_day_shifts,
            max_night = self.capacity.max_night_shifts,
            "Capacity changed, grid reset"
        );
    }

    /// Overrides a single slot without any validation of who goes there.
    /// Positions outside the grid are ignored.
    pub fn set_slot(&mut self, day: u32, shift: ShiftType, index: usize, employee: Option<String>) -> bool {
        let applied = self.grid.set(day, shift, index, employee);
        if !applied {
            tracing::debug!(day, shift = shift.as_str(), index, "Ignoring slot outside the grid");
        }
        applied
    }

    /// Recomputes the whole grid from scratch, discarding manual edits
    pub fn generate_schedule(&mut self) {
        let grid = generate_schedule(&self.employees, &self.preferences, self.capacity);
        tracing::info!(
            filled = grid.filled_slots(),
            total = grid.total_slots(),
            employees = self.employees.len(),
            "Schedule generated"
        );
        self.grid = grid;
        self.state = GridState::Generated;
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.name == name)
    }

    pub fn preferences(&self) -> &[Preference] {
        &self.preferences
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn grid(&self) -> &ScheduleGrid {
        &self.grid
    }

    pub fn state(&self) -> GridState {
        self.state
    }

    /// Distinct non-empty scout tags in the order employees were added
    pub fn scouts(&self) -> Vec<&str> {
        let mut scouts: Vec<&str> = Vec::new();
        for employee in &self.employees {
            let tag = employee.scout_data.as_str();
            if !tag.is_empty() && !scouts.contains(&tag) {
                scouts.push(tag);
            }
        }
        scouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_ignored() {
        let mut store = RosterStore::new();
        assert!(!store.upsert_employee("   ", "", PreferredShift::Any));
        assert!(store.employees().is_empty());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut store = RosterStore::new();
        store.upsert_employee("A", "", PreferredShift::Any);
        store.upsert_employee("B", "", PreferredShift::Any);
        store.upsert_employee(" A ", "s1", PreferredShift::Night);

        let names: Vec<_> = store.employees().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(store.employees()[0].preferred_shift, PreferredShift::Night);
        assert_eq!(store.employees()[0].scout_data, "s1");
    }

    #[test]
    fn state_tracks_mutations() {
        let mut store = RosterStore::new();
        assert_eq!(store.state(), GridState::Stale);
        store.generate_schedule();
        assert_eq!(store.state(), GridState::Generated);
        store.set_slot(1, ShiftType::Day, 0, Some("X".into()));
        assert_eq!(store.state(), GridState::Generated);
        store.upsert_employee("A", "", PreferredShift::Any);
        assert_eq!(store.state(), GridState::Stale);
    }

    #[test]
    fn removing_orphan_preferences_marks_grid_stale() {
        let mut store = RosterStore::new();
        store.upsert_preference("Ghost", 4, PreferenceShift::Day);
        store.generate_schedule();
        assert_eq!(store.state(), GridState::Generated);

        store.remove_employee("Ghost");
        assert!(store.preferences().is_empty());
        assert_eq!(store.state(), GridState::Stale);
    }

    #[test]
    fn removing_unknown_name_keeps_grid_state() {
        let mut store = RosterStore::new();
        store.generate_schedule();
        store.remove_employee("Nobody");
        assert_eq!(store.state(), GridState::Generated);
    }

    #[test]
    fn scouts_are_distinct_and_ordered() {
        let mut store = RosterStore::new();
        store.upsert_employee("A", "north", PreferredShift::Any);
        store.upsert_employee("B", "", PreferredShift::Any);
        store.upsert_employee("C", "south", PreferredShift::Any);
        store.upsert_employee("D", "north", PreferredShift::Any);
        assert_eq!(store.scouts(), ["north", "south"]);
    }
}
