use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::roster::{
    grid::is_roster_day, Capacity, DaySlots, Employee, Preference, RosterStore, ScheduleGrid,
    DEFAULT_MAX_SHIFTS,
};

fn default_max_shifts() -> u32 {
    DEFAULT_MAX_SHIFTS
}

/// The persisted form of a roster, written as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRecord {
    #[serde(default)]
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
    #[serde(default)]
    pub schedule: BTreeMap<u32, DaySlots>,
    #[serde(default = "default_max_shifts")]
    pub max_day_shifts: u32,
    #[serde(default = "default_max_shifts")]
    pub max_night_shifts: u32,
}

impl RosterRecord {
    /// Snapshot of everything the store owns
    pub fn from_store(store: &RosterStore) -> Self {
        let capacity = store.capacity();
        Self {
            employees: store.employees().to_vec(),
            preferences: store.preferences().to_vec(),
            schedule: store.grid().to_days(),
            max_day_shifts: capacity.max_day_shifts,
            max_night_shifts: capacity.max_night_shifts,
        }
    }

    /// Rebuilds a store, dropping entries that break the roster invariants
    pub fn into_store(self) -> RosterStore {
        let capacity = Capacity::new(Some(self.max_day_shifts), Some(self.max_night_shifts));

        let mut employees: Vec<Employee> = Vec::with_capacity(self.employees.len());
        for mut employee in self.employees {
            employee.name = employee.name.trim().to_string();
            if employee.name.is_empty() || employees.iter().any(|e| e.name == employee.name) {
                tracing::warn!(name = %employee.name, "Dropping blank or duplicate employee from record");
                continue;
            }
            employees.push(employee);
        }

        let mut preferences: Vec<Preference> = Vec::with_capacity(self.preferences.len());
        for pref in self.preferences {
            if pref.employee.is_empty()
                || !is_roster_day(pref.day)
                || preferences.iter().any(|p| p.matches(&pref.employee, pref.day))
            {
                tracing::warn!(employee = %pref.employee, day = pref.day, "Dropping invalid preference from record");
                continue;
            }
            preferences.push(pref);
        }

        let (grid, adjusted) = ScheduleGrid::from_days(self.schedule, capacity);
        if adjusted > 0 {
            tracing::warn!(adjusted, "Schedule days reshaped to match capacity");
        }

        RosterStore::from_parts(employees, preferences, capacity, grid)
    }
}

/// A roster record stored as a JSON file
#[derive(Debug, Clone)]
pub struct RosterFile {
    path: PathBuf,
}

impl RosterFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the record. A missing file is not an error and yields `None`.
    pub fn load(&self) -> Result<Option<RosterRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }
        let record = serde_json::from_str(&text)?;
        Ok(Some(record))
    }

    /// Loads the store, falling back to an empty one when there is no record
    pub fn load_store(&self) -> Result<RosterStore> {
        Ok(self
            .load()?
            .map(RosterRecord::into_store)
            .unwrap_or_default())
    }

    /// Overwrites the file with the full state of `store`
    pub fn save(&self, store: &RosterStore) -> Result<()> {
        self.save_record(&RosterRecord::from_store(store))
    }

    /// Overwrites the file with an already taken snapshot
    pub fn save_record(&self, record: &RosterRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;

        // Write beside the target and rename so readers never see half a file
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "Roster saved");
        Ok(())
    }
}

/// Writes numbered snapshots to a [`RosterFile`] in revision order.
/// A snapshot older than the last one written is skipped.
#[derive(Debug)]
pub struct RosterWriter {
    file: RosterFile,
    written: Mutex<u64>,
}

impl RosterWriter {
    pub fn new(file: RosterFile) -> Self {
        Self {
            file,
            written: Mutex::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Saves `record` taken at `revision`. Returns false if it was skipped as stale.
    pub fn save(&self, revision: u64, record: &RosterRecord) -> Result<bool> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if revision <= *written {
            tracing::debug!(revision, written = *written, "Skipping stale roster snapshot");
            return Ok(false);
        }
        self.file.save_record(record)?;
        *written = revision;
        Ok(true)
    }
}
