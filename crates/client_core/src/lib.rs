pub mod client;
pub mod clock;
pub mod error;
pub mod export;
pub mod reports;
pub mod sector;
pub mod store;
pub mod view;
pub mod workflow;

pub use client::BtrClient;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ExportError, WorkflowError};
pub use export::{PendingExporter, SpreadsheetExporter};
pub use reports::{Report, ReportKind};
pub use sector::SectorSaved;
pub use store::{Progress, StateStore};
pub use view::{FormField, FormView, MemoryView};
pub use workflow::Advance;
