use std::{borrow::Cow, fmt::Write as _, str::FromStr};

use chrono::NaiveDateTime;

use shared::{
    domain::{Sector, Step},
    error::ParseDomainError,
    schema,
    state::ApplicationState,
};
use storage::SlotStore;
use tracing::{info, warn};

use crate::{
    store::{Progress, StateStore},
    view::{log_activity, FormView},
};

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

const SCENE_SETTING: Step = Step::from_const(1);
const TAKING_STOCK: Step = Step::from_const(2);
const ACTIVITY_LIMIT: usize = 10;
const TOTAL_TIMELINE: &str = "6-8 months";
const SUBMISSION_DEADLINE: &str = "December 31, 2024";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Draft,
    Progress,
    Roadmap,
}

impl ReportKind {
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Draft => "BTR Draft Report",
            ReportKind::Progress => "UNEP Progress Report",
            ReportKind::Roadmap => "Implementation Roadmap",
        }
    }
}

impl FromStr for ReportKind {
    type Err = ParseDomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(ReportKind::Draft),
            "progress" => Ok(ReportKind::Progress),
            "roadmap" => Ok(ReportKind::Roadmap),
            _ => Err(ParseDomainError::UnknownReport(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub markup: String,
}

pub fn build(kind: ReportKind, state: &ApplicationState, generated_on: &str) -> String {
    match kind {
        ReportKind::Draft => draft_report(state, generated_on),
        ReportKind::Progress => progress_report(state, generated_on),
        ReportKind::Roadmap => roadmap(state, generated_on),
    }
}

/// Builds `kind` from the current state, hands it to the view's report sink
/// and logs the generation.
pub fn generate<S: SlotStore, V: FormView + ?Sized>(
    store: &mut StateStore<S>,
    view: &mut V,
    kind: ReportKind,
    date_format: &str,
) -> Report {
    let now = store.now();
    let generated_on = format_date(now, date_format).unwrap_or_else(|| {
        warn!(pattern = date_format, "report date format not applicable, using default");
        format_date(now, DEFAULT_DATE_FORMAT).unwrap_or_default()
    });
    let markup = build(kind, store.state(), &generated_on);
    view.render_report(&markup);
    log_activity(store, view, format!("Generated {}", kind.title()));
    info!(report = kind.title(), bytes = markup.len(), "report generated");
    Report { kind, markup }
}

pub fn draft_report(state: &ApplicationState, generated_on: &str) -> String {
    let mut report = String::new();
    report.push_str("<h3>BTR Draft Report for The Gambia</h3>");
    let _ = write!(report, "<p><strong>Generated:</strong> {}</p>", escape_html(generated_on));
    report.push_str("<hr>");

    if let Some(team_lead) = non_empty(state.step_text(SCENE_SETTING, "team-lead")) {
        let framework = non_empty(state.step_text(SCENE_SETTING, "institutional-arrangements"))
            .unwrap_or("Not specified");
        report.push_str("<h4>1. Institutional Arrangements</h4>");
        let _ = write!(report, "<p><strong>Team Lead:</strong> {}</p>", escape_html(team_lead));
        let _ = write!(
            report,
            "<p><strong>Institutional Framework:</strong> {}</p>",
            escape_html(framework)
        );
    }

    if let Some(experience) = non_empty(state.step_text(TAKING_STOCK, "ghg-experience")) {
        let afolu = non_empty(state.step_text(TAKING_STOCK, "data-afolu")).unwrap_or("Not assessed");
        report.push_str("<h4>2. Capacity Assessment</h4>");
        let _ = write!(
            report,
            "<p><strong>GHG Inventory Experience:</strong> {}</p>",
            escape_html(experience)
        );
        let _ = write!(
            report,
            "<p><strong>Data Availability (AFOLU):</strong> {}</p>",
            escape_html(afolu)
        );
    }

    report.push_str("<h4>3. Sectoral Data Summary</h4>");
    for sector in Sector::ALL {
        if state.has_sector_data(sector) {
            let _ = write!(
                report,
                "<p><strong>{}:</strong> Data available</p>",
                sector.label()
            );
        }
    }

    report.push_str("<hr>");
    report.push_str(
        "<p class=\"text-center\"><em>This is a draft report. \
         Complete all BTR steps for a comprehensive report.</em></p>",
    );
    report
}

pub fn progress_report(state: &ApplicationState, generated_on: &str) -> String {
    let progress = Progress::from_state(state);

    let mut report = String::new();
    report.push_str("<h3>UNEP Progress Report</h3>");
    let _ = write!(
        report,
        "<p><strong>Reporting Period:</strong> {}</p>",
        escape_html(generated_on)
    );
    report.push_str("<p><strong>Project:</strong> BTR1/NC4 Implementation</p>");
    report.push_str("<hr>");

    report.push_str("<h4>Activities Completed</h4><ul>");
    for activity in state.activity_log.recent(ACTIVITY_LIMIT) {
        let _ = write!(report, "<li>{}</li>", escape_html(activity));
    }
    report.push_str("</ul>");

    report.push_str("<h4>BTR Process Completion</h4>");
    let _ = write!(
        report,
        "<p>Steps completed: {}/{} ({}%)</p>",
        progress.completed(),
        progress.total(),
        progress.percent()
    );

    report.push_str("<h4>Next Steps</h4><ul>");
    for step in state.pending_steps() {
        let _ = write!(report, "<li>Complete Step {step} of BTR Process</li>");
    }
    report.push_str("</ul>");
    report
}

pub fn roadmap(state: &ApplicationState, generated_on: &str) -> String {
    let mut report = String::new();
    report.push_str("<h3>BTR Implementation Roadmap</h3>");
    let _ = write!(report, "<p><strong>Generated:</strong> {}</p>", escape_html(generated_on));
    report.push_str("<hr>");

    report.push_str("<div class=\"roadmap-timeline\">");
    for step in Step::all() {
        let spec = schema::step_spec(step);
        let status = if state.is_completed(step) {
            "Completed"
        } else {
            "Pending"
        };
        let _ = write!(
            report,
            "<div class=\"roadmap-item\">\
             <div class=\"roadmap-step\">Step {step}</div>\
             <div class=\"roadmap-content\">\
             <h4>{}</h4>\
             <p><strong>Duration:</strong> {}</p>\
             <p><strong>Status:</strong> {status}</p>\
             </div></div>",
            spec.title, spec.duration
        );
    }
    report.push_str("</div>");

    report.push_str("<hr>");
    let _ = write!(
        report,
        "<p><strong>Total Estimated Timeline:</strong> {TOTAL_TIMELINE}</p>"
    );
    let _ = write!(
        report,
        "<p><strong>BTR Submission Deadline:</strong> {SUBMISSION_DEADLINE}</p>"
    );
    report
}

/// `None` when chrono cannot render `pattern` for a naive local time, such
/// as a pattern asking for a UTC offset.
pub fn format_date(at: NaiveDateTime, pattern: &str) -> Option<String> {
    let mut rendered = String::new();
    write!(rendered, "{}", at.format(pattern)).ok()?;
    Some(rendered)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

pub fn escape_html(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut escaped = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
#[path = "tests/reports_tests.rs"]
mod tests;
