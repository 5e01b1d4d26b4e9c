use anyhow::Result;
use chrono::NaiveDateTime;
use shared::{
    domain::{FieldMap, Sector, SectorFields, Section, Step},
    state::ApplicationState,
};
use storage::{SlotStore, StatePersistence};
use tracing::{info, warn};

use crate::clock::Clock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub current_step: Step,
    pub completed_steps: Vec<Step>,
}

impl Progress {
    pub fn from_state(state: &ApplicationState) -> Self {
        Self {
            current_step: state.current_step,
            completed_steps: state.completed_steps.iter().copied().collect(),
        }
    }

    pub fn completed(&self) -> usize {
        self.completed_steps.len()
    }

    pub fn total(&self) -> usize {
        usize::from(Step::COUNT)
    }

    /// Completion rounded to the nearest whole percent.
    pub fn percent(&self) -> u32 {
        ((self.completed() as f64 / self.total() as f64) * 100.0).round() as u32
    }

    pub fn is_completed(&self, step: Step) -> bool {
        self.completed_steps.contains(&step)
    }
}

pub struct StateStore<S: SlotStore> {
    state: ApplicationState,
    persistence: StatePersistence<S>,
    clock: Box<dyn Clock>,
}

impl<S: SlotStore> StateStore<S> {
    pub fn new(slots: S, clock: impl Clock + 'static) -> Self {
        Self {
            state: ApplicationState::default(),
            persistence: StatePersistence::new(slots),
            clock: Box::new(clock),
        }
    }

    /// Rehydrates from the saved snapshot, if any. Returns whether one was
    /// found and decoded.
    pub fn restore(&mut self) -> bool {
        self.persistence.load_into(&mut self.state)
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn snapshot(&self) -> ApplicationState {
        self.state.clone()
    }

    pub fn persistence(&self) -> &StatePersistence<S> {
        &self.persistence
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn progress(&self) -> Progress {
        Progress::from_state(&self.state)
    }

    /// Replaces the data of `step` and marks it completed. Callers validate
    /// beforehand.
    pub fn set_step_data(&mut self, step: Step, data: FieldMap) {
        info!(step = step.number(), fields = data.len(), "step data saved");
        self.state.step_data.insert(step, data);
        self.state.completed_steps.insert(step);
        self.persist();
    }

    pub fn set_sector_data(&mut self, sector: Sector, data: SectorFields) {
        info!(sector = %sector, fields = data.len(), "sector data saved");
        self.state.sector_data.insert(sector, data);
        self.persist();
    }

    pub fn record_activity(&mut self, message: impl AsRef<str>) {
        let timestamp = self.clock.now().format("%H:%M:%S");
        self.state
            .activity_log
            .push(format!("{timestamp}: {}", message.as_ref()));
        self.persist();
    }

    pub fn set_current_step(&mut self, step: Step) {
        self.state.current_step = step;
    }

    pub fn set_current_section(&mut self, section: Section) {
        self.state.current_section = section;
    }

    pub fn flush(&mut self) -> Result<()> {
        self.persistence.save(&self.state)
    }

    pub fn into_slots(self) -> S {
        self.persistence.into_inner()
    }

    fn persist(&mut self) {
        if let Err(err) = self.persistence.save(&self.state) {
            warn!("failed to persist state: {err:#}");
        }
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
