use std::collections::BTreeMap;

use shared::{
    domain::{Sector, Section, Step},
    error::Notice,
    schema::{self, FieldKind, FieldSpec},
};
use storage::SlotStore;

use crate::store::{Progress, StateStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    /// Group name; checkbox groups share it, other fields repeat the id.
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    pub checked: bool,
}

impl FormField {
    pub fn text(id: impl Into<String>, value: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind: FieldKind::Text,
            value: value.into(),
            checked: false,
        }
    }

    pub fn checkbox(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        checked: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: FieldKind::Checkbox,
            value: value.into(),
            checked,
        }
    }

    pub fn from_spec(spec: &FieldSpec) -> Self {
        Self {
            id: spec.id.to_string(),
            name: spec.id.to_string(),
            kind: spec.kind,
            value: String::new(),
            checked: false,
        }
    }

    pub fn is_checkbox(&self) -> bool {
        self.kind == FieldKind::Checkbox
    }
}

pub trait FormView {
    fn show_section(&mut self, section: Section);
    fn show_step(&mut self, step: Step);
    /// Fields of the step panel, in form order; `None` when the panel is not
    /// rendered.
    fn step_fields(&self, step: Step) -> Option<Vec<FormField>>;
    fn sector_fields(&self, sector: Sector) -> Option<Vec<FormField>>;
    fn set_field_value(&mut self, field_id: &str, value: &str);
    fn set_field_checked(&mut self, field_id: &str, checked: bool);
    fn focus_field(&mut self, field_id: &str);
    fn update_indicators(&mut self, progress: &Progress);
    fn update_activity(&mut self, entries: &[String]);
    fn render_report(&mut self, markup: &str);
    fn notify(&mut self, notice: &Notice);
}

pub(crate) fn log_activity<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    message: impl AsRef<str>,
) {
    store.record_activity(message);
    view.update_activity(store.state().activity_log.entries());
}

pub(crate) fn refresh_indicators<S: SlotStore, V: FormView + ?Sized>(
    store: &StateStore<S>,
    view: &mut V,
) {
    view.update_indicators(&store.progress());
}

/// In-memory forms built from the static schemas. Records everything the
/// core asks it to display.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    step_forms: BTreeMap<Step, Vec<FormField>>,
    sector_forms: BTreeMap<Sector, Vec<FormField>>,
    section: Option<Section>,
    step: Option<Step>,
    focused: Option<String>,
    progress: Option<Progress>,
    activity: Vec<String>,
    reports: Vec<String>,
    notices: Vec<Notice>,
}

impl MemoryView {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_schema() -> Self {
        let step_forms = Step::all()
            .map(|step| {
                let fields = schema::step_spec(step)
                    .fields
                    .iter()
                    .map(FormField::from_spec)
                    .collect();
                (step, fields)
            })
            .collect();
        let sector_forms = Sector::ALL
            .into_iter()
            .map(|sector| {
                let fields = schema::sector_fields(sector)
                    .iter()
                    .map(FormField::from_spec)
                    .collect();
                (sector, fields)
            })
            .collect();
        Self {
            step_forms,
            sector_forms,
            ..Self::default()
        }
    }

    pub fn with_step_field(mut self, step: Step, field: FormField) -> Self {
        self.step_forms.entry(step).or_default().push(field);
        self
    }

    pub fn with_sector_field(mut self, sector: Sector, field: FormField) -> Self {
        self.sector_forms.entry(sector).or_default().push(field);
        self
    }

    pub fn fill(&mut self, field_id: &str, value: &str) -> bool {
        match self.field_mut(field_id) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn check(&mut self, name: &str, value: &str, checked: bool) -> bool {
        let target = self
            .forms_mut()
            .find(|field| field.is_checkbox() && field.name == name && field.value == value);
        match target {
            Some(field) => {
                field.checked = checked;
                true
            }
            None => false,
        }
    }

    pub fn field(&self, field_id: &str) -> Option<&FormField> {
        self.step_forms
            .values()
            .chain(self.sector_forms.values())
            .flatten()
            .find(|field| field.id == field_id)
    }

    pub fn visible_section(&self) -> Option<Section> {
        self.section
    }

    pub fn visible_step(&self) -> Option<Step> {
        self.step
    }

    pub fn focused_field(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn progress(&self) -> Option<&Progress> {
        self.progress.as_ref()
    }

    pub fn activity(&self) -> &[String] {
        &self.activity
    }

    pub fn last_report(&self) -> Option<&str> {
        self.reports.last().map(String::as_str)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn forms_mut(&mut self) -> impl Iterator<Item = &mut FormField> {
        self.step_forms
            .values_mut()
            .chain(self.sector_forms.values_mut())
            .flatten()
    }

    fn field_mut(&mut self, field_id: &str) -> Option<&mut FormField> {
        self.forms_mut().find(|field| field.id == field_id)
    }
}

impl FormView for MemoryView {
    fn show_section(&mut self, section: Section) {
        self.section = Some(section);
    }

    fn show_step(&mut self, step: Step) {
        if self.step_forms.contains_key(&step) {
            self.step = Some(step);
        }
    }

    fn step_fields(&self, step: Step) -> Option<Vec<FormField>> {
        self.step_forms.get(&step).cloned()
    }

    fn sector_fields(&self, sector: Sector) -> Option<Vec<FormField>> {
        self.sector_forms.get(&sector).cloned()
    }

    fn set_field_value(&mut self, field_id: &str, value: &str) {
        self.fill(field_id, value);
    }

    fn set_field_checked(&mut self, field_id: &str, checked: bool) {
        if let Some(field) = self.field_mut(field_id) {
            field.checked = checked;
        }
    }

    fn focus_field(&mut self, field_id: &str) {
        if self.field(field_id).is_some() {
            self.focused = Some(field_id.to_string());
        }
    }

    fn update_indicators(&mut self, progress: &Progress) {
        self.progress = Some(progress.clone());
    }

    fn update_activity(&mut self, entries: &[String]) {
        self.activity = entries.to_vec();
    }

    fn render_report(&mut self, markup: &str) {
        self.reports.push(markup.to_string());
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }
}
