use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use shared::{
    domain::{FieldMap, Sector, SectorFields, Step},
    schema,
    state::{ActivityLog, ApplicationState},
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::SlotStore;

pub const STORAGE_KEY: &str = "gambiaBTRData";

const STEP_DATA: &str = "stepData";
const SECTOR_DATA: &str = "sectorData";
const ACTIVITY_LOG: &str = "activityLog";
const COMPLETED_STEPS: &str = "completedSteps";
const CURRENT_STEP: &str = "currentStep";

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("saved data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved data must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedStateRef<'a> {
    step_data: &'a BTreeMap<Step, FieldMap>,
    sector_data: &'a BTreeMap<Sector, SectorFields>,
    activity_log: &'a ActivityLog,
    completed_steps: &'a BTreeSet<Step>,
    current_step: Step,
}

pub fn encode_state(state: &ApplicationState) -> Result<String> {
    let persisted = PersistedStateRef {
        step_data: &state.step_data,
        sector_data: &state.sector_data,
        activity_log: &state.activity_log,
        completed_steps: &state.completed_steps,
        current_step: state.current_step,
    };
    serde_json::to_string(&persisted).context("failed to encode application state")
}

/// Merges a saved snapshot into `state`, field by field.
pub fn decode_state(raw: &str, state: &mut ApplicationState) -> Result<(), DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    let object = match value {
        Value::Object(object) => object,
        other => return Err(DecodeError::NotAnObject(json_kind(&other))),
    };

    if let Some(step_data) = decode_field::<BTreeMap<String, Value>>(&object, STEP_DATA) {
        state.step_data = decode_step_data(step_data);
    }
    if let Some(sector_data) = decode_field::<BTreeMap<String, Value>>(&object, SECTOR_DATA) {
        state.sector_data = decode_sector_data(sector_data);
    }
    if let Some(activity_log) = decode_field::<ActivityLog>(&object, ACTIVITY_LOG) {
        state.activity_log = activity_log;
    }
    if let Some(completed) = decode_field::<Vec<i64>>(&object, COMPLETED_STEPS) {
        state.completed_steps = completed
            .into_iter()
            .filter_map(|n| match u8::try_from(n).ok().and_then(|n| Step::new(n).ok()) {
                Some(step) => Some(step),
                None => {
                    warn!(step = n, "dropping out-of-range completed step");
                    None
                }
            })
            .collect();
    }
    if let Some(current_step) = decode_field::<Step>(&object, CURRENT_STEP) {
        state.current_step = current_step;
    }

    Ok(())
}

fn decode_field<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Option<T> {
    let value = object.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(field = key, "ignoring undecodable saved field: {err}");
            None
        }
    }
}

fn decode_step_data(raw: BTreeMap<String, Value>) -> BTreeMap<Step, FieldMap> {
    let mut decoded = BTreeMap::new();
    for (key, value) in raw {
        let Ok(step) = key.parse::<Step>() else {
            warn!(key = %key, "ignoring saved data for unknown step");
            continue;
        };
        let fields: FieldMap = match serde_json::from_value(value) {
            Ok(fields) => fields,
            Err(err) => {
                warn!(step = step.number(), "ignoring undecodable step data: {err}");
                continue;
            }
        };
        for id in fields.keys() {
            if !schema::is_known_step_field(step, id) {
                warn!(step = step.number(), field = %id, "saved step data has a field outside the step schema");
            }
        }
        decoded.insert(step, fields);
    }
    decoded
}

fn decode_sector_data(raw: BTreeMap<String, Value>) -> BTreeMap<Sector, SectorFields> {
    let mut decoded = BTreeMap::new();
    for (key, value) in raw {
        let Ok(sector) = key.parse::<Sector>() else {
            warn!(key = %key, "ignoring saved data for unknown sector");
            continue;
        };
        let fields: SectorFields = match serde_json::from_value(value) {
            Ok(fields) => fields,
            Err(err) => {
                warn!(sector = %sector, "ignoring undecodable sector data: {err}");
                continue;
            }
        };
        for id in fields.keys() {
            if !schema::is_known_sector_field(sector, id) {
                warn!(sector = %sector, field = %id, "saved sector data has a field outside the sector schema");
            }
        }
        decoded.insert(sector, fields);
    }
    decoded
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug)]
pub struct StatePersistence<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> StatePersistence<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut S {
        &mut self.slots
    }

    pub fn into_inner(self) -> S {
        self.slots
    }

    pub fn save(&mut self, state: &ApplicationState) -> Result<()> {
        let encoded = encode_state(state)?;
        self.slots
            .set(STORAGE_KEY, &encoded)
            .with_context(|| format!("failed to write slot '{STORAGE_KEY}'"))
    }

    pub fn load(&self) -> Option<ApplicationState> {
        let mut state = ApplicationState::default();
        self.load_into(&mut state).then_some(state)
    }

    /// Merges a saved snapshot into `state`. Returns `false` when nothing
    /// usable was found; `state` is then left untouched.
    pub fn load_into(&self, state: &mut ApplicationState) -> bool {
        let raw = match self.slots.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                warn!("failed to read saved data: {err:#}");
                return false;
            }
        };

        let mut merged = state.clone();
        match decode_state(&raw, &mut merged) {
            Ok(()) => {
                *state = merged;
                info!(
                    completed = state.completed_steps.len(),
                    current_step = state.current_step.number(),
                    "restored saved data"
                );
                true
            }
            Err(err) => {
                error!("error loading saved data: {err}");
                false
            }
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.slots.remove(STORAGE_KEY)
    }
}

#[cfg(test)]
#[path = "tests/persistence_tests.rs"]
mod tests;
