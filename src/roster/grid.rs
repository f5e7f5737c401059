use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::capacity::Capacity;
use super::types::ShiftType;

/// Number of days covered by one roster
pub const DAYS_IN_ROSTER: u32 = 31;

/// Iterates day numbers 1..=31 in order
pub fn roster_days() -> impl Iterator<Item = u32> {
    1..=DAYS_IN_ROSTER
}

pub fn is_roster_day(day: u32) -> bool {
    (1..=DAYS_IN_ROSTER).contains(&day)
}

/// Reads a day number typed by a user: leading digits count, so `"5th"` is 5.
/// Returns `None` when there are no digits or the day is outside the roster.
pub fn parse_day(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|day| is_roster_day(*day))
}

/// Same as [`parse_day`] for a loosely typed JSON value
pub fn day_from_json(value: Option<&serde_json::Value>) -> Option<u32> {
    match value? {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .filter(|day| is_roster_day(*day)),
        serde_json::Value::String(s) => parse_day(s),
        _ => None,
    }
}

/// Slots of a single day, one list per shift type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySlots {
    #[serde(default)]
    pub day: Vec<Option<String>>,
    #[serde(default)]
    pub night: Vec<Option<String>>,
}

impl DaySlots {
    pub fn empty(capacity: Capacity) -> Self {
        Self {
            day: vec![None; capacity.max_day_shifts as usize],
            night: vec![None; capacity.max_night_shifts as usize],
        }
    }

    pub fn slots(&self, shift: ShiftType) -> &[Option<String>] {
        match shift {
            ShiftType::Day => &self.day,
            ShiftType::Night => &self.night,
        }
    }

    pub fn slots_mut(&mut self, shift: ShiftType) -> &mut Vec<Option<String>> {
        match shift {
            ShiftType::Day => &mut self.day,
            ShiftType::Night => &mut self.night,
        }
    }

    /// Pads with empty slots or truncates so both lists match `capacity`.
    /// Returns true if anything had to change.
    fn fit_to(&mut self, capacity: Capacity) -> bool {
        let mut changed = false;
        for shift in ShiftType::ALL {
            let want = capacity.for_shift(shift) as usize;
            let slots = self.slots_mut(shift);
            if slots.len() != want {
                slots.resize(want, None);
                changed = true;
            }
        }
        changed
    }
}

/// The full month grid: for every day, an ordered slot list per shift type.
/// Slot counts always equal the capacity the grid was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    days: Vec<DaySlots>,
}

impl ScheduleGrid {
    /// An all-empty grid sized for `capacity`
    pub fn new(capacity: Capacity) -> Self {
        Self {
            days: roster_days().map(|_| DaySlots::empty(capacity)).collect(),
        }
    }

    /// Rebuilds a grid from persisted days, filling in missing days and
    /// resizing slot lists that disagree with `capacity`. Days outside the
    /// roster are ignored. Returns the grid and how many days were adjusted.
    pub fn from_days(mut stored: BTreeMap<u32, DaySlots>, capacity: Capacity) -> (Self, usize) {
        let mut adjusted = 0;
        let days = roster_days()
            .map(|day| match stored.remove(&day) {
                Some(mut slots) => {
                    if slots.fit_to(capacity) {
                        adjusted += 1;
                    }
                    slots
                }
                None => {
                    adjusted += 1;
                    DaySlots::empty(capacity)
                }
            })
            .collect();
        adjusted += stored.len();
        (Self { days }, adjusted)
    }

    /// Day-number keyed copy, the shape the grid is persisted in
    pub fn to_days(&self) -> BTreeMap<u32, DaySlots> {
        self.iter()
            .map(|(day, slots)| (day, slots.clone()))
            .collect()
    }

    pub fn day(&self, day: u32) -> Option<&DaySlots> {
        if !is_roster_day(day) {
            return None;
        }
        self.days.get(day as usize - 1)
    }

    pub fn day_mut(&mut self, day: u32) -> Option<&mut DaySlots> {
        if !is_roster_day(day) {
            return None;
        }
        self.days.get_mut(day as usize - 1)
    }

    pub fn slots(&self, day: u32, shift: ShiftType) -> Option<&[Option<String>]> {
        self.day(day).map(|d| d.slots(shift))
    }

    pub fn slots_mut(&mut self, day: u32, shift: ShiftType) -> Option<&mut Vec<Option<String>>> {
        self.day_mut(day).map(|d| d.slots_mut(shift))
    }

    /// Overwrites one slot. Returns false when the day or index is outside the grid.
    pub fn set(&mut self, day: u32, shift: ShiftType, index: usize, employee: Option<String>) -> bool {
        match self.slots_mut(day, shift).and_then(|slots| slots.get_mut(index)) {
            Some(slot) => {
                *slot = employee;
                true
            }
            None => false,
        }
    }

    /// Days in ascending order with their slots
    pub fn iter(&self) -> impl Iterator<Item = (u32, &DaySlots)> {
        roster_days().zip(self.days.iter())
    }

    pub fn filled_slots(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.day.iter().chain(d.night.iter()))
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn total_slots(&self) -> usize {
        self.days.iter().map(|d| d.day.len() + d.night.len()).sum()
    }
}

impl Serialize for ScheduleGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, slots) in self.iter() {
            map.serialize_entry(&day.to_string(), slots)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_matches_capacity() {
        let grid = ScheduleGrid::new(Capacity::new(Some(3), Some(1)));
        assert_eq!(grid.iter().count(), 31);
        for (_, slots) in grid.iter() {
            assert_eq!(slots.day, vec![None, None, None]);
            assert_eq!(slots.night, vec![None]);
        }
        assert_eq!(grid.total_slots(), 31 * 4);
        assert_eq!(grid.filled_slots(), 0);
    }

    #[test]
    fn set_rejects_out_of_range() {
        let mut grid = ScheduleGrid::new(Capacity::new(Some(2), Some(2)));
        assert!(grid.set(31, ShiftType::Night, 1, Some("A".into())));
        assert!(!grid.set(0, ShiftType::Day, 0, Some("A".into())));
        assert!(!grid.set(32, ShiftType::Day, 0, Some("A".into())));
        assert!(!grid.set(1, ShiftType::Day, 2, Some("A".into())));
        assert_eq!(grid.filled_slots(), 1);
    }

    #[test]
    fn from_days_repairs_shape() {
        let capacity = Capacity::new(Some(2), Some(1));
        let mut stored = BTreeMap::new();
        stored.insert(
            1,
            DaySlots {
                day: vec![Some("A".into()), None, Some("B".into())],
                night: vec![],
            },
        );
        stored.insert(40, DaySlots::default());
        let (grid, adjusted) = ScheduleGrid::from_days(stored, capacity);

        let first = grid.day(1).unwrap();
        assert_eq!(first.day, vec![Some("A".to_string()), None]);
        assert_eq!(first.night, vec![None]);
        // day 1 resized, days 2..=31 missing, day 40 dropped
        assert_eq!(adjusted, 1 + 30 + 1);
    }

    #[test]
    fn loose_day_parsing() {
        use serde_json::json;

        assert_eq!(parse_day("5"), Some(5));
        assert_eq!(parse_day(" 12th"), Some(12));
        assert_eq!(parse_day("abc"), None);
        assert_eq!(parse_day("32"), None);
        assert_eq!(parse_day("-3"), None);
        assert_eq!(day_from_json(Some(&json!(7))), Some(7));
        assert_eq!(day_from_json(Some(&json!("7"))), Some(7));
        assert_eq!(day_from_json(Some(&json!(0))), None);
        assert_eq!(day_from_json(Some(&json!(-1))), None);
        assert_eq!(day_from_json(Some(&json!(true))), None);
        assert_eq!(day_from_json(None), None);
    }

    #[test]
    fn serializes_with_string_day_keys() {
        let grid = ScheduleGrid::new(Capacity::new(Some(1), Some(0)));
        let value = serde_json::to_value(&grid).unwrap();
        assert_eq!(value["5"]["day"], serde_json::json!([null]));
        assert_eq!(value["31"]["night"], serde_json::json!([]));
    }
}
