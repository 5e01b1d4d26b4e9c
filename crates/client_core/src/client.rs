use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use shared::{
    domain::{Sector, Section, Step},
    state::ApplicationState,
};
use storage::SlotStore;
use tracing::{info, warn};

use crate::{
    clock::Clock,
    error::{ExportError, WorkflowError},
    export::{self, PendingExporter, SpreadsheetExporter},
    reports::{self, format_date, Report, ReportKind},
    sector::{self, SectorSaved},
    store::StateStore,
    view::{log_activity, refresh_indicators, FormView},
    workflow::{self, Advance},
};

pub use crate::reports::DEFAULT_DATE_FORMAT;

pub struct BtrClient<S: SlotStore, V: FormView> {
    store: StateStore<S>,
    view: V,
    exporter: Box<dyn SpreadsheetExporter>,
    date_format: String,
}

impl<S: SlotStore, V: FormView> BtrClient<S, V> {
    /// Restores the previous session from `slots` and brings the view up on
    /// the dashboard.
    pub fn start(slots: S, view: V, clock: impl Clock + 'static) -> Self {
        let mut client = Self {
            store: StateStore::new(slots, clock),
            view,
            exporter: Box::new(PendingExporter),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        };

        if client.store.restore() {
            info!(
                step = client.store.state().current_step.number(),
                completed = client.store.state().completed_steps.len(),
                "restored previous session"
            );
            log_activity(
                &mut client.store,
                &mut client.view,
                "Loaded saved data from previous session",
            );
        }

        let entries = client.store.state().activity_log.entries().to_vec();
        client.view.update_activity(&entries);
        refresh_indicators(&client.store, &mut client.view);
        client.store.set_current_section(Section::Dashboard);
        client.view.show_section(Section::Dashboard);
        client
    }

    /// Sets the strftime pattern used for report dates. Patterns chrono
    /// cannot render for a local time are rejected and the current one is
    /// kept.
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if format_date(NaiveDateTime::default(), &pattern).is_none() {
            warn!(pattern = %pattern, "invalid report date format, keeping {}", self.date_format);
        } else {
            self.date_format = pattern;
        }
        self
    }

    pub fn with_exporter(mut self, exporter: impl SpreadsheetExporter + 'static) -> Self {
        self.exporter = Box::new(exporter);
        self
    }

    pub fn state(&self) -> &ApplicationState {
        self.store.state()
    }

    pub fn store(&self) -> &StateStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StateStore<S> {
        &mut self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    pub fn show_section(&mut self, section: Section) {
        self.store.set_current_section(section);
        self.view.show_section(section);
        log_activity(
            &mut self.store,
            &mut self.view,
            format!("Navigated to {}", section.display_name()),
        );
        if section == Section::BtrProcess {
            let step = self.store.state().current_step;
            workflow::show_step(&mut self.store, &mut self.view, step);
        }
    }

    pub fn show_step(&mut self, step: Step) {
        workflow::show_step(&mut self.store, &mut self.view, step);
    }

    pub fn next_step(&mut self) -> Result<Advance, WorkflowError> {
        let current = self.store.state().current_step;
        workflow::advance(&mut self.store, &mut self.view, current)
    }

    pub fn prev_step(&mut self) -> Option<Step> {
        let current = self.store.state().current_step;
        workflow::retreat(&mut self.store, &mut self.view, current)
    }

    pub fn save_sector(&mut self, sector: Sector) -> SectorSaved {
        sector::save_sector(&mut self.store, &mut self.view, sector)
    }

    pub fn generate_report(&mut self, kind: ReportKind) -> Report {
        reports::generate(&mut self.store, &mut self.view, kind, &self.date_format)
    }

    pub fn request_export(&mut self) -> Result<Vec<u8>, ExportError> {
        export::request_export(&mut self.store, &mut self.view, self.exporter.as_ref())
    }

    pub fn shutdown(&mut self) -> Result<()> {
        self.store
            .flush()
            .context("failed to save state on shutdown")?;
        info!("state saved on shutdown");
        Ok(())
    }

    pub fn into_parts(self) -> (StateStore<S>, V) {
        (self.store, self.view)
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
