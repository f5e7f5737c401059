use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::roster::{Employee, RosterStore, ScheduleGrid, ShiftType};

/// Formats an employee for listings: `name (scout: tag) - shift`
pub fn format_employee(employee: &Employee) -> String {
    let scout = if employee.scout_data.is_empty() {
        "none"
    } else {
        employee.scout_data.as_str()
    };
    format!(
        "{} (scout: {}) - {}",
        employee.name,
        scout,
        employee.preferred_shift.as_str()
    )
}

fn format_slot(slot: &Option<String>) -> &str {
    slot.as_deref().unwrap_or("[EMPTY]")
}

/// Writes the grid day by day, every slot on its own line
pub fn write_roster<W: Write>(grid: &ScheduleGrid, out: &mut W) -> std::io::Result<()> {
    for (day, slots) in grid.iter() {
        writeln!(out, "** Day {} **", day)?;
        for shift in ShiftType::ALL {
            let list = slots.slots(shift);
            let filled = list.iter().filter(|s| s.is_some()).count();
            writeln!(out, "  {} ({}/{})", shift.as_str(), filled, list.len())?;
            for (idx, slot) in list.iter().enumerate() {
                writeln!(out, "    {:>2}. {}", idx + 1, format_slot(slot))?;
            }
        }
    }
    Ok(())
}

/// Writes the roster to a text file
pub fn write_roster_to_file(grid: &ScheduleGrid, filename: &Path) -> Result<()> {
    let mut file = File::create(filename)?;
    write_roster(grid, &mut file)?;
    Ok(())
}

/// Prints employees, scouts and the full grid
pub fn print_roster(store: &RosterStore) {
    let capacity = store.capacity();
    println!("\n=== Employees ({}) ===", store.employees().len());
    for employee in store.employees() {
        println!("  - {}", format_employee(employee));
    }

    let scouts = store.scouts();
    if !scouts.is_empty() {
        println!("\n=== Scouts ===");
        for scout in scouts {
            println!("  - {}", scout);
        }
    }

    println!(
        "\n=== Roster ({} day / {} night slots per day, {} of {} filled) ===",
        capacity.max_day_shifts,
        capacity.max_night_shifts,
        store.grid().filled_slots(),
        store.grid().total_slots()
    );
    let mut out = std::io::stdout().lock();
    if let Err(e) = write_roster(store.grid(), &mut out) {
        tracing::error!(error = %e, "Failed to print roster");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Capacity, PreferredShift};

    #[test]
    fn employee_label() {
        let mut employee = Employee {
            name: "Ana".into(),
            scout_data: String::new(),
            preferred_shift: PreferredShift::Night,
        };
        assert_eq!(format_employee(&employee), "Ana (scout: none) - night");
        employee.scout_data = "S-12".into();
        assert_eq!(format_employee(&employee), "Ana (scout: S-12) - night");
    }

    #[test]
    fn roster_text() {
        let mut grid = ScheduleGrid::new(Capacity::new(Some(1), Some(0)));
        grid.set(1, ShiftType::Day, 0, Some("Ana".into()));
        let mut buf = Vec::new();
        write_roster(&grid, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("** Day 1 **\n  day (1/1)\n     1. Ana\n  night (0/0)\n** Day 2 **"));
        assert!(text.contains("** Day 31 **\n  day (0/1)\n     1. [EMPTY]\n"));
    }
}
