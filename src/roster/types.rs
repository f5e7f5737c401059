use serde::{Deserialize, Serialize};

/// The two kinds of slot list kept for every day of the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Day,
    Night,
}

impl ShiftType {
    /// Day before night, the order every pass over a day uses
    pub const ALL: [ShiftType; 2] = [ShiftType::Day, ShiftType::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "day",
            ShiftType::Night => "night",
        }
    }

    pub fn parse(value: &str) -> Option<ShiftType> {
        match value.trim() {
            "day" => Some(ShiftType::Day),
            "night" => Some(ShiftType::Night),
            _ => None,
        }
    }
}

/// Default shift affinity of an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredShift {
    Day,
    Night,
    #[default]
    Any,
}

impl PreferredShift {
    /// Whether an employee with this affinity may be backfilled into `shift`
    pub fn accepts(&self, shift: ShiftType) -> bool {
        match self {
            PreferredShift::Any => true,
            PreferredShift::Day => shift == ShiftType::Day,
            PreferredShift::Night => shift == ShiftType::Night,
        }
    }

    pub fn parse(value: &str) -> Option<PreferredShift> {
        match value.trim() {
            "day" => Some(PreferredShift::Day),
            "night" => Some(PreferredShift::Night),
            "any" => Some(PreferredShift::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferredShift::Day => "day",
            PreferredShift::Night => "night",
            PreferredShift::Any => "any",
        }
    }
}

/// What an employee asked for on one specific day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceShift {
    Day,
    Night,
    Off,
    Any,
}

impl PreferenceShift {
    /// The slot list a preference is placed into during preference placement.
    /// Only exact day/night requests are placeable; `off` and `any` are not.
    pub fn placeable(&self) -> Option<ShiftType> {
        match self {
            PreferenceShift::Day => Some(ShiftType::Day),
            PreferenceShift::Night => Some(ShiftType::Night),
            PreferenceShift::Off | PreferenceShift::Any => None,
        }
    }

    /// Whether this preference keeps its owner out of `shift` on the same day
    pub fn excludes(&self, shift: ShiftType) -> bool {
        match self {
            PreferenceShift::Any => false,
            other => other.placeable() != Some(shift),
        }
    }

    pub fn parse(value: &str) -> Option<PreferenceShift> {
        match value.trim() {
            "day" => Some(PreferenceShift::Day),
            "night" => Some(PreferenceShift::Night),
            "off" => Some(PreferenceShift::Off),
            "any" => Some(PreferenceShift::Any),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceShift::Day => "day",
            PreferenceShift::Night => "night",
            PreferenceShift::Off => "off",
            PreferenceShift::Any => "any",
        }
    }
}

/// A person who can be placed into slots, keyed by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub name: String,
    #[serde(default)]
    pub scout_data: String,
    #[serde(default)]
    pub preferred_shift: PreferredShift,
}

/// A soft request for one (employee, day) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub employee: String,
    pub day: u32,
    pub shift: PreferenceShift,
}

impl Preference {
    pub fn matches(&self, employee: &str, day: u32) -> bool {
        self.employee == employee && self.day == day
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_and_conflicting_shift_exclude() {
        assert!(PreferenceShift::Off.excludes(ShiftType::Day));
        assert!(PreferenceShift::Off.excludes(ShiftType::Night));
        assert!(PreferenceShift::Day.excludes(ShiftType::Night));
        assert!(!PreferenceShift::Day.excludes(ShiftType::Day));
        assert!(!PreferenceShift::Any.excludes(ShiftType::Night));
    }

    #[test]
    fn any_preference_is_not_placeable() {
        assert_eq!(PreferenceShift::Any.placeable(), None);
        assert_eq!(PreferenceShift::Off.placeable(), None);
        assert_eq!(PreferenceShift::Night.placeable(), Some(ShiftType::Night));
    }

    #[test]
    fn parse_shift_names() {
        assert_eq!(PreferenceShift::parse(" off "), Some(PreferenceShift::Off));
        assert_eq!(PreferenceShift::parse("evening"), None);
        assert_eq!(PreferredShift::parse("any"), Some(PreferredShift::Any));
        assert_eq!(PreferredShift::parse("off"), None);
    }

    #[test]
    fn employee_uses_camel_case_fields() {
        let employee: Employee =
            serde_json::from_str(r#"{"name":"A","scoutData":"x","preferredShift":"night"}"#)
                .unwrap();
        assert_eq!(employee.scout_data, "x");
        assert_eq!(employee.preferred_shift, PreferredShift::Night);
    }
}
