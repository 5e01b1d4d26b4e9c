use super::*;
use crate::{clock::FixedClock, view::MemoryView};
use chrono::{NaiveDate, NaiveTime};
use shared::{domain::SectorFields, error::ErrorCode, state::WELCOME_ACTIVITY};
use storage::MemorySlots;

fn clock() -> FixedClock {
    FixedClock::at(
        NaiveDate::from_ymd_opt(2024, 11, 20).expect("date"),
        NaiveTime::from_hms_opt(16, 45, 10).expect("time"),
    )
}

fn step(n: u8) -> Step {
    Step::new(n).expect("step")
}

fn fresh() -> BtrClient<MemorySlots, MemoryView> {
    BtrClient::start(MemorySlots::new(), MemoryView::from_schema(), clock())
}

struct BytesExporter;

impl SpreadsheetExporter for BytesExporter {
    fn export(&self, state: &ApplicationState) -> Result<Vec<u8>, ExportError> {
        Ok(format!("steps,{}", state.completed_steps.len()).into_bytes())
    }
}

#[test]
fn fresh_start_shows_dashboard_with_welcome_entry() {
    let client = fresh();

    assert_eq!(client.view().visible_section(), Some(Section::Dashboard));
    assert_eq!(client.view().activity(), [WELCOME_ACTIVITY.to_string()]);
    let progress = client.view().progress().expect("indicators");
    assert_eq!(progress.completed(), 0);
    assert_eq!(client.date_format(), DEFAULT_DATE_FORMAT);
}

#[test]
fn restart_restores_previous_session() {
    let mut client = fresh();
    client.view_mut().fill("team-lead", "Alice");
    client.view_mut().fill("institutional-arrangements", "Ministry X");
    client.next_step().expect("advance");
    let (store, _) = client.into_parts();

    let restarted = BtrClient::start(store.into_slots(), MemoryView::from_schema(), clock());

    let state = restarted.state();
    assert_eq!(state.current_step, step(2));
    assert!(state.is_completed(step(1)));
    assert_eq!(state.step_text(step(1), "team-lead"), Some("Alice"));
    assert_eq!(
        state.activity_log.entries()[0],
        "16:45:10: Loaded saved data from previous session"
    );
    assert_eq!(restarted.view().visible_section(), Some(Section::Dashboard));
}

#[test]
fn entering_btr_process_shows_current_step() {
    let mut client = fresh();
    client.store_mut().set_current_step(step(3));

    client.show_section(Section::BtrProcess);

    assert_eq!(client.view().visible_section(), Some(Section::BtrProcess));
    assert_eq!(client.view().visible_step(), Some(step(3)));
    assert_eq!(client.state().current_section, Section::BtrProcess);
    assert_eq!(
        client.state().activity_log.entries()[0],
        "16:45:10: Navigated to BTR Process Navigator"
    );
}

#[test]
fn step_navigation_round_trip() {
    let mut client = fresh();
    client.view_mut().fill("team-lead", "Alice");
    client.view_mut().fill("institutional-arrangements", "Ministry X");

    assert_eq!(client.next_step(), Ok(Advance::Moved(step(2))));
    assert_eq!(client.prev_step(), Some(step(1)));
    assert_eq!(client.prev_step(), None);

    client.show_step(Step::LAST);
    assert_eq!(client.next_step(), Ok(Advance::Finished));
    assert_eq!(client.state().current_step, Step::LAST);
}

#[test]
fn empty_sector_form_is_saved_and_omitted_from_draft() {
    let mut client = BtrClient::start(MemorySlots::new(), MemoryView::empty(), clock());

    let saved = client.save_sector(Sector::Energy);

    assert_eq!(saved.fields, 0);
    assert_eq!(
        client.state().sector_data.get(&Sector::Energy),
        Some(&SectorFields::new())
    );
    assert_eq!(
        client.state().activity_log.entries()[0],
        "16:45:10: Updated ENERGY sector data"
    );
    let notice = client.view().notices().last().expect("notice");
    assert_eq!(notice.message, "ENERGY data saved successfully!");
    assert!(!notice.is_error());

    let report = client.generate_report(ReportKind::Draft);
    assert!(!report.markup.contains("ENERGY"));
}

#[test]
fn filled_sector_form_is_saved_by_field_id() {
    let mut client = fresh();
    client.view_mut().fill("afolu-year", "2022");

    let saved = client.save_sector(Sector::Afolu);

    assert_eq!(saved.fields, 3);
    let data = client.state().sector_data(Sector::Afolu);
    assert_eq!(data.get("afolu-year").map(String::as_str), Some("2022"));
    assert_eq!(data.get("afolu-livestock").map(String::as_str), Some(""));
}

#[test]
fn progress_report_after_first_step() {
    let mut client = fresh();
    client.view_mut().fill("team-lead", "Alice");
    client.view_mut().fill("institutional-arrangements", "Ministry X");
    client.next_step().expect("advance");

    let report = client.generate_report(ReportKind::Progress);

    assert!(report.markup.contains("Steps completed: 1/6 (17%)"));
    assert!(report.markup.contains("<strong>Reporting Period:</strong> 20/11/2024"));
    assert_eq!(client.view().last_report(), Some(report.markup.as_str()));
}

#[test]
fn pending_export_is_logged_and_reported() {
    let mut client = fresh();

    let err = client.request_export().expect_err("export is pending");

    assert!(matches!(err, ExportError::NotImplemented));
    let notice = client.view().notices().last().expect("notice");
    assert_eq!(notice.code, Some(ErrorCode::NotImplemented));
    assert_eq!(
        client.state().activity_log.entries()[0],
        "16:45:10: Attempted Excel export"
    );
}

#[test]
fn custom_exporter_receives_state() {
    let mut client = fresh().with_exporter(BytesExporter);

    let document = client.request_export().expect("export");

    assert_eq!(document, b"steps,0");
    assert_eq!(
        client.state().activity_log.entries()[0],
        "16:45:10: Exported data to spreadsheet"
    );
}

#[test]
fn invalid_date_format_is_ignored() {
    let client = fresh().with_date_format("%d/%m/%");
    assert_eq!(client.date_format(), DEFAULT_DATE_FORMAT);

    let client = fresh().with_date_format("%Y-%m-%d");
    assert_eq!(client.date_format(), "%Y-%m-%d");
}

#[test]
fn offset_date_format_is_rejected_and_reports_still_render() {
    let mut client = fresh().with_date_format("%d/%m/%Y %z");
    assert_eq!(client.date_format(), DEFAULT_DATE_FORMAT);

    let report = client.generate_report(ReportKind::Roadmap);
    assert!(report.markup.contains("<p><strong>Generated:</strong> 20/11/2024</p>"));
}

#[test]
fn shutdown_persists_navigation() {
    let mut client = fresh();
    client.show_step(step(4));

    client.shutdown().expect("shutdown");

    let saved = client.store().persistence().load().expect("saved state");
    assert_eq!(saved.current_step, step(4));
}
