use shared::{
    domain::{FieldMap, FieldValue, Step},
    schema,
};
use storage::SlotStore;
use tracing::{debug, info};

use crate::{
    error::WorkflowError,
    store::StateStore,
    view::{log_activity, refresh_indicators, FormField, FormView},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(Step),
    Finished,
}

/// Checks the required fields of `step` in form order. Fields the view does
/// not render are skipped.
pub fn validate<V: FormView + ?Sized>(view: &V, step: Step) -> Result<(), WorkflowError> {
    let Some(fields) = view.step_fields(step) else {
        return Ok(());
    };
    for required in schema::required_fields(step) {
        let Some(field) = fields.iter().find(|field| field.id == *required) else {
            continue;
        };
        if field.value.trim().is_empty() {
            return Err(WorkflowError::MissingRequiredField {
                step,
                field: field.id.clone(),
            });
        }
    }
    Ok(())
}

/// Reads the step form. Checkbox groups become the ordered list of checked
/// values under the group name; every other field is kept by identifier.
pub fn capture_step<V: FormView + ?Sized>(view: &V, step: Step) -> FieldMap {
    view.step_fields(step)
        .map(|fields| capture_fields(&fields))
        .unwrap_or_default()
}

fn capture_fields(fields: &[FormField]) -> FieldMap {
    let mut data = FieldMap::new();
    for field in fields {
        if field.is_checkbox() {
            let entry = data
                .entry(field.name.clone())
                .or_insert_with(|| FieldValue::Multi(Vec::new()));
            // A text field sharing the group name is replaced by the group.
            if entry.as_multi().is_none() {
                *entry = FieldValue::Multi(Vec::new());
            }
            if let FieldValue::Multi(values) = entry {
                if field.checked {
                    values.push(field.value.clone());
                }
            }
        } else {
            data.insert(field.id.clone(), FieldValue::Text(field.value.clone()));
        }
    }
    data
}

pub fn project_step<V: FormView + ?Sized>(view: &mut V, step: Step, data: &FieldMap) {
    if data.is_empty() {
        return;
    }
    let Some(fields) = view.step_fields(step) else {
        return;
    };
    for field in fields {
        if field.is_checkbox() {
            if let Some(FieldValue::Multi(values)) = data.get(&field.name) {
                view.set_field_checked(&field.id, values.contains(&field.value));
            }
        } else if let Some(FieldValue::Text(value)) = data.get(&field.id) {
            view.set_field_value(&field.id, value);
        }
    }
    debug!(step = step.number(), fields = data.len(), "projected saved step data");
}

pub fn show_step<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    step: Step,
) {
    view.show_step(step);
    store.set_current_step(step);
    let data = store.state().step_data(step).clone();
    project_step(view, step, &data);
    refresh_indicators(store, view);
}

/// Validates and saves `current`, then moves to the following step. Nothing
/// changes when validation fails; the offending field is focused.
pub fn advance<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    current: Step,
) -> Result<Advance, WorkflowError> {
    if let Err(err) = validate(view, current) {
        info!(step = current.number(), field = err.field(), "step validation failed");
        view.focus_field(err.field());
        view.notify(&err.notice());
        return Err(err);
    }

    let data = capture_step(view, current);
    store.set_step_data(current, data);
    refresh_indicators(store, view);

    match current.next() {
        Some(next) => {
            show_step(store, view, next);
            log_activity(store, view, format!("Advanced to BTR Step {next}"));
            Ok(Advance::Moved(next))
        }
        None => Ok(Advance::Finished),
    }
}

pub fn retreat<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    current: Step,
) -> Option<Step> {
    let previous = current.prev()?;
    show_step(store, view, previous);
    log_activity(store, view, format!("Returned to BTR Step {previous}"));
    Some(previous)
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
