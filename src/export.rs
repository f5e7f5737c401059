use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;

use crate::error::Result;
use crate::roster::{ScheduleGrid, ShiftType};

/// Writes the grid as CSV, one row per slot: `day,shift,slot,employee`.
/// Slots are numbered from 1 and empty slots have an empty employee column.
pub fn write_roster_csv<W: Write>(grid: &ScheduleGrid, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_writer(writer);
    wtr.write_record(["day", "shift", "slot", "employee"])?;

    for (day, slots) in grid.iter() {
        for shift in ShiftType::ALL {
            for (idx, slot) in slots.slots(shift).iter().enumerate() {
                wtr.write_record([
                    day.to_string().as_str(),
                    shift.as_str(),
                    (idx + 1).to_string().as_str(),
                    slot.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Renders the grid as a CSV string
pub fn roster_to_csv(grid: &ScheduleGrid) -> Result<String> {
    let mut buf = Vec::new();
    write_roster_csv(grid, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Exports the grid to a CSV file, replacing any existing file
pub fn export_roster_to_csv(grid: &ScheduleGrid, csv_path: &Path) -> Result<()> {
    let file = File::create(csv_path)?;
    write_roster_csv(grid, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Capacity;

    #[test]
    fn one_row_per_slot() {
        let mut grid = ScheduleGrid::new(Capacity::new(Some(1), Some(1)));
        grid.set(2, ShiftType::Night, 0, Some("Vera".into()));
        let csv = roster_to_csv(&grid).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 1 + 31 * 2);
        assert_eq!(lines[0], "day,shift,slot,employee");
        assert_eq!(lines[1], "1,day,1,");
        assert_eq!(lines[4], "2,night,1,Vera");
    }
}
