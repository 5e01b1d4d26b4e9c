use shared::{error::Notice, state::ApplicationState};
use storage::SlotStore;
use tracing::warn;

use crate::{
    error::ExportError,
    store::StateStore,
    view::{log_activity, FormView},
};

pub trait SpreadsheetExporter {
    fn export(&self, state: &ApplicationState) -> Result<Vec<u8>, ExportError>;
}

/// Placeholder until a spreadsheet writer is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PendingExporter;

impl SpreadsheetExporter for PendingExporter {
    fn export(&self, _state: &ApplicationState) -> Result<Vec<u8>, ExportError> {
        Err(ExportError::NotImplemented)
    }
}

pub fn request_export<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    exporter: &dyn SpreadsheetExporter,
) -> Result<Vec<u8>, ExportError> {
    let result = exporter.export(store.state());
    match &result {
        Ok(document) => {
            view.notify(&Notice::info(format!(
                "Spreadsheet export ready ({} bytes).",
                document.len()
            )));
            log_activity(store, view, "Exported data to spreadsheet");
        }
        Err(err) => {
            warn!("spreadsheet export unavailable: {err}");
            view.notify(&err.notice());
            log_activity(store, view, "Attempted Excel export");
        }
    }
    result
}
