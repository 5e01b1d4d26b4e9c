use super::*;
use crate::{clock::FixedClock, view::MemoryView};
use chrono::{NaiveDate, NaiveTime};
use shared::domain::{FieldMap, FieldValue, SectorFields};
use storage::MemorySlots;

const DATE: &str = "01/06/2024";

fn step(n: u8) -> Step {
    Step::new(n).expect("step")
}

fn scene_setting(team_lead: &str) -> FieldMap {
    FieldMap::from([
        ("team-lead".to_string(), FieldValue::text(team_lead)),
        (
            "institutional-arrangements".to_string(),
            FieldValue::text("Ministry X"),
        ),
    ])
}

#[test]
fn progress_report_counts_completed_steps() {
    let mut state = ApplicationState::default();
    state.step_data.insert(step(1), scene_setting("Alice"));
    state.completed_steps.insert(step(1));

    let report = progress_report(&state, DATE);

    assert!(report.contains("<p>Steps completed: 1/6 (17%)</p>"));
    let next_steps: Vec<usize> = (2..=6)
        .map(|n| {
            report
                .find(&format!("<li>Complete Step {n} of BTR Process</li>"))
                .expect("next step listed")
        })
        .collect();
    assert!(next_steps.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(!report.contains("Complete Step 1 of"));
}

#[test]
fn progress_report_lists_ten_most_recent_activities() {
    let mut state = ApplicationState::default();
    for i in 0..15 {
        state.activity_log.push(format!("12:00:00: event {i}"));
    }

    let report = progress_report(&state, DATE);

    assert!(report.contains("<li>12:00:00: event 14</li>"));
    assert!(report.contains("<li>12:00:00: event 5</li>"));
    assert!(!report.contains("<li>12:00:00: event 4</li>"));
    assert!(report.contains("<p><strong>Reporting Period:</strong> 01/06/2024</p>"));
}

#[test]
fn draft_report_sections_follow_saved_data() {
    let empty = draft_report(&ApplicationState::default(), DATE);
    assert!(!empty.contains("1. Institutional Arrangements"));
    assert!(!empty.contains("2. Capacity Assessment"));
    assert!(empty.contains("<h4>3. Sectoral Data Summary</h4>"));
    assert!(empty.contains("This is a draft report."));

    let mut state = ApplicationState::default();
    state.step_data.insert(step(1), scene_setting("Alice"));
    state.step_data.insert(
        step(2),
        FieldMap::from([("ghg-experience".to_string(), FieldValue::text("moderate"))]),
    );

    let report = draft_report(&state, DATE);

    assert!(report.contains("<p><strong>Team Lead:</strong> Alice</p>"));
    assert!(report.contains("<p><strong>Institutional Framework:</strong> Ministry X</p>"));
    assert!(report.contains("<p><strong>GHG Inventory Experience:</strong> moderate</p>"));
    assert!(report.contains("<p><strong>Data Availability (AFOLU):</strong> Not assessed</p>"));
}

#[test]
fn draft_report_omits_sectors_without_data() {
    let mut state = ApplicationState::default();
    state.sector_data.insert(Sector::Energy, SectorFields::new());
    state.sector_data.insert(
        Sector::Waste,
        SectorFields::from([("waste-year".to_string(), "2022".to_string())]),
    );

    let report = draft_report(&state, DATE);

    assert!(!report.contains("ENERGY"));
    assert!(report.contains("<p><strong>WASTE:</strong> Data available</p>"));
}

#[test]
fn blank_team_lead_hides_institutional_section() {
    let mut state = ApplicationState::default();
    state.step_data.insert(step(1), scene_setting("  "));

    assert!(!draft_report(&state, DATE).contains("Institutional Arrangements"));
}

#[test]
fn roadmap_marks_each_step() {
    let mut state = ApplicationState::default();
    state.completed_steps.extend([step(1), step(2)]);

    let report = roadmap(&state, DATE);

    assert_eq!(report.matches("<p><strong>Status:</strong> Completed</p>").count(), 2);
    assert_eq!(report.matches("<p><strong>Status:</strong> Pending</p>").count(), 4);
    assert!(report.contains("<h4>Scene Setting</h4>"));
    assert!(report.contains("<p><strong>Duration:</strong> 4 months</p>"));
    assert!(report.contains("<p><strong>Total Estimated Timeline:</strong> 6-8 months</p>"));
    assert!(report.contains("December 31, 2024"));
}

#[test]
fn user_values_are_escaped() {
    let mut state = ApplicationState::default();
    state
        .step_data
        .insert(step(1), scene_setting("<script>alert('x')</script> & co"));

    let report = draft_report(&state, DATE);

    assert!(!report.contains("<script>"));
    assert!(report.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; co"));
    assert_eq!(escape_html("plain"), "plain");
}

#[test]
fn report_kind_parses_names() {
    assert_eq!("Draft".parse::<ReportKind>(), Ok(ReportKind::Draft));
    assert_eq!(" roadmap ".parse::<ReportKind>(), Ok(ReportKind::Roadmap));
    assert_eq!(
        "summary".parse::<ReportKind>(),
        Err(ParseDomainError::UnknownReport("summary".to_string()))
    );
}

fn store() -> StateStore<MemorySlots> {
    let clock = FixedClock::at(
        NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
        NaiveTime::from_hms_opt(8, 30, 0).expect("time"),
    );
    StateStore::new(MemorySlots::new(), clock)
}

#[test]
fn generate_renders_and_logs() {
    let mut store = store();
    let mut view = MemoryView::empty();

    let report = generate(&mut store, &mut view, ReportKind::Roadmap, "%Y-%m-%d");

    assert_eq!(report.kind, ReportKind::Roadmap);
    assert!(report.markup.contains("<p><strong>Generated:</strong> 2024-06-01</p>"));
    assert_eq!(view.last_report(), Some(report.markup.as_str()));
    assert_eq!(
        store.state().activity_log.entries()[0],
        "08:30:00: Generated Implementation Roadmap"
    );
}

#[test]
fn unrenderable_date_format_falls_back_to_default() {
    let mut store = store();
    let mut view = MemoryView::empty();

    for pattern in ["%d/%m/%Y %z", "%:z", "%Z", "%+"] {
        let report = generate(&mut store, &mut view, ReportKind::Draft, pattern);
        assert!(
            report.markup.contains("<p><strong>Generated:</strong> 01/06/2024</p>"),
            "pattern {pattern}"
        );
    }
}

#[test]
fn format_date_reports_unrenderable_patterns() {
    let at = NaiveDate::from_ymd_opt(2024, 6, 1)
        .expect("date")
        .and_hms_opt(8, 30, 0)
        .expect("time");
    assert_eq!(format_date(at, "%Y-%m-%d").as_deref(), Some("2024-06-01"));
    assert_eq!(format_date(at, "%Y %z"), None);
}
