use serde::{Deserialize, Serialize};

use super::types::ShiftType;

/// Slot count used whenever a limit is missing or unreadable
pub const DEFAULT_MAX_SHIFTS: u32 = 22;

/// Slots per day for each shift type, shared by all 31 days.
/// The same number also caps how many shifts of that type one employee
/// receives during backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capacity {
    pub max_day_shifts: u32,
    pub max_night_shifts: u32,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_day_shifts: DEFAULT_MAX_SHIFTS,
            max_night_shifts: DEFAULT_MAX_SHIFTS,
        }
    }
}

impl Capacity {
    /// Builds a capacity, substituting the default for absent limits
    pub fn new(max_day: Option<u32>, max_night: Option<u32>) -> Self {
        Self {
            max_day_shifts: max_day.unwrap_or(DEFAULT_MAX_SHIFTS),
            max_night_shifts: max_night.unwrap_or(DEFAULT_MAX_SHIFTS),
        }
    }

    pub fn for_shift(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Day => self.max_day_shifts,
            ShiftType::Night => self.max_night_shifts,
        }
    }

    /// Reads a limit typed by a user: leading digits count, anything else
    /// falls back to the default
    pub fn parse_limit(text: &str) -> u32 {
        let digits: String = text
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(DEFAULT_MAX_SHIFTS)
    }

    /// Same as [`Capacity::parse_limit`] for a loosely typed JSON value
    pub fn limit_from_json(value: Option<&serde_json::Value>) -> u32 {
        match value {
            Some(serde_json::Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && *f <= u32::MAX as f64).map(|f| f as u32))
                .unwrap_or(DEFAULT_MAX_SHIFTS),
            Some(serde_json::Value::String(s)) => Self::parse_limit(s),
            _ => DEFAULT_MAX_SHIFTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_limit_reads_leading_digits() {
        assert_eq!(Capacity::parse_limit("12"), 12);
        assert_eq!(Capacity::parse_limit(" 7 slots"), 7);
        assert_eq!(Capacity::parse_limit("0"), 0);
    }

    #[test]
    fn parse_limit_falls_back_to_default() {
        assert_eq!(Capacity::parse_limit(""), DEFAULT_MAX_SHIFTS);
        assert_eq!(Capacity::parse_limit("abc"), DEFAULT_MAX_SHIFTS);
        assert_eq!(Capacity::parse_limit("-3"), DEFAULT_MAX_SHIFTS);
        assert_eq!(Capacity::parse_limit("99999999999"), DEFAULT_MAX_SHIFTS);
    }

    #[test]
    fn json_limits() {
        assert_eq!(Capacity::limit_from_json(Some(&json!(4))), 4);
        assert_eq!(Capacity::limit_from_json(Some(&json!(4.9))), 4);
        assert_eq!(Capacity::limit_from_json(Some(&json!("5"))), 5);
        assert_eq!(Capacity::limit_from_json(Some(&json!(null))), DEFAULT_MAX_SHIFTS);
        assert_eq!(Capacity::limit_from_json(Some(&json!(-1))), DEFAULT_MAX_SHIFTS);
        assert_eq!(Capacity::limit_from_json(None), DEFAULT_MAX_SHIFTS);
    }
}
