use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{FieldMap, Sector, SectorFields, Section, Step};

pub const ACTIVITY_LOG_CAPACITY: usize = 20;
pub const WELCOME_ACTIVITY: &str = "Platform initialized - Welcome!";

/// Newest-first history of user actions, bounded to
/// [`ACTIVITY_LOG_CAPACITY`] entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ActivityLog {
    entries: Vec<String>,
}

impl ActivityLog {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Prepends a pre-formatted entry, evicting the oldest on overflow.
    pub fn push(&mut self, entry: impl Into<String>) {
        self.entries.insert(0, entry.into());
        self.entries.truncate(ACTIVITY_LOG_CAPACITY);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn recent(&self, limit: usize) -> &[String] {
        &self.entries[..self.entries.len().min(limit)]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self {
            entries: vec![WELCOME_ACTIVITY.to_string()],
        }
    }
}

impl From<Vec<String>> for ActivityLog {
    fn from(mut entries: Vec<String>) -> Self {
        entries.truncate(ACTIVITY_LOG_CAPACITY);
        Self { entries }
    }
}

impl From<ActivityLog> for Vec<String> {
    fn from(value: ActivityLog) -> Self {
        value.entries
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationState {
    pub current_section: Section,
    pub current_step: Step,
    pub step_data: BTreeMap<Step, FieldMap>,
    pub sector_data: BTreeMap<Sector, SectorFields>,
    pub activity_log: ActivityLog,
    pub completed_steps: BTreeSet<Step>,
}

impl ApplicationState {
    /// Saved data for `step`; a step never saved reads as empty.
    pub fn step_data(&self, step: Step) -> &FieldMap {
        static EMPTY: FieldMap = FieldMap::new();
        self.step_data.get(&step).unwrap_or(&EMPTY)
    }

    pub fn sector_data(&self, sector: Sector) -> &SectorFields {
        static EMPTY: SectorFields = SectorFields::new();
        self.sector_data.get(&sector).unwrap_or(&EMPTY)
    }

    pub fn step_text(&self, step: Step, field_id: &str) -> Option<&str> {
        self.step_data(step).get(field_id).and_then(|v| v.as_text())
    }

    pub fn has_sector_data(&self, sector: Sector) -> bool {
        !self.sector_data(sector).is_empty()
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn pending_steps(&self) -> impl Iterator<Item = Step> + '_ {
        Step::all().filter(|step| !self.completed_steps.contains(step))
    }
}
