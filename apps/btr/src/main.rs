use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{Advance, BtrClient, FormView, MemoryView, ReportKind, SystemClock};
use shared::{
    domain::{Sector, Section, Step},
    schema,
};
use storage::FileSlots;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

type Client = BtrClient<FileSlots, MemoryView>;

#[derive(Parser, Debug)]
#[command(name = "btr", about = "Biennial Transparency Report preparation workflow")]
struct Args {
    /// Directory holding the saved session.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Settings file; defaults to ./btr.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dashboard: current step, progress and recent activity.
    Status,
    /// Navigate to a section.
    Section { section: Section },
    #[command(subcommand)]
    Step(StepCommand),
    #[command(subcommand)]
    Sector(SectorCommand),
    /// Generate a report.
    Report {
        kind: ReportKind,
        /// Write the markup to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Request a spreadsheet export.
    Export,
}

#[derive(Subcommand, Debug)]
enum StepCommand {
    /// Show the current step with its saved values.
    Show,
    /// Fill in the current step and move to the next one.
    Next {
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// Tick a checkbox: group=value.
        #[arg(long = "check", value_parser = parse_assignment)]
        check: Vec<(String, String)>,
    },
    /// Return to the previous step.
    Back,
}

#[derive(Subcommand, Debug)]
enum SectorCommand {
    /// Save a sector form.
    Save {
        sector: Sector,
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let slots = FileSlots::open(&settings.data_dir)?;
    info!(data_dir = %settings.data_dir.display(), "starting session");
    let mut client = BtrClient::start(slots, MemoryView::from_schema(), SystemClock)
        .with_date_format(settings.date_format.clone());

    let outcome = run(&mut client, args.command);
    print_notices(client.view());
    finish(outcome, client.shutdown())
}

/// The command's own error wins; a failed final save is still reported.
fn finish(outcome: Result<()>, shutdown: Result<()>) -> Result<()> {
    match (outcome, shutdown) {
        (Err(err), Err(flush_err)) => {
            error!("{flush_err:#}");
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(()), shutdown) => shutdown,
    }
}

fn run(client: &mut Client, command: Command) -> Result<()> {
    match command {
        Command::Status => print_status(client),
        Command::Section { section } => {
            client.show_section(section);
            println!("{}", section.display_name());
            if section == Section::BtrProcess {
                print_step(client);
            }
        }
        Command::Step(StepCommand::Show) => {
            let current = client.state().current_step;
            client.show_step(current);
            print_step(client);
        }
        Command::Step(StepCommand::Next { set, check }) => {
            let current = client.state().current_step;
            client.show_step(current);
            for (id, value) in &set {
                if !client.view_mut().fill(id, value) {
                    bail!("step {current} has no field '{id}'");
                }
            }
            for (name, value) in &check {
                if !client.view_mut().check(name, value, true) {
                    bail!("step {current} has no checkbox '{name}={value}'");
                }
            }
            match client.next_step()? {
                Advance::Moved(next) => {
                    println!("Step {current} saved.");
                    print_step(client);
                    info!(step = next.number(), "moved to next step");
                }
                Advance::Finished => println!("Step {current} saved. All steps are complete."),
            }
        }
        Command::Step(StepCommand::Back) => match client.prev_step() {
            Some(_) => print_step(client),
            None => println!("Already at the first step."),
        },
        Command::Sector(SectorCommand::Save { sector, set }) => {
            for (id, value) in &set {
                if !schema::is_known_sector_field(sector, id) || !client.view_mut().fill(id, value) {
                    bail!("{} form has no field '{id}'", sector.label());
                }
            }
            let saved = client.save_sector(sector);
            info!(sector = %saved.sector, fields = saved.fields, "sector saved from command line");
        }
        Command::Report { kind, out } => {
            let report = client.generate_report(kind);
            match out {
                Some(path) => {
                    fs::write(&path, &report.markup)
                        .with_context(|| format!("failed to write report to '{}'", path.display()))?;
                    println!("{} written to {}", kind.title(), path.display());
                }
                None => println!("{}", report.markup),
            }
        }
        Command::Export => {
            // The pending exporter always declines; the notice says so.
            let _ = client.request_export();
        }
    }
    Ok(())
}

fn print_status(client: &Client) {
    let state = client.state();
    let progress = client.store().progress();
    let current = schema::step_spec(state.current_step);

    println!("Section: {}", state.current_section.display_name());
    println!(
        "Current step: {} of {} ({})",
        state.current_step,
        progress.total(),
        current.title
    );
    println!(
        "Progress: {}/{} steps completed ({}%)",
        progress.completed(),
        progress.total(),
        progress.percent()
    );
    for step in Step::all() {
        let mark = if progress.is_completed(step) { 'x' } else { ' ' };
        println!("  [{mark}] {step}. {}", schema::step_spec(step).title);
    }
    println!("Recent activity:");
    for entry in state.activity_log.recent(5) {
        println!("  {entry}");
    }
}

fn print_step(client: &Client) {
    let step = client.state().current_step;
    let spec = schema::step_spec(step);
    println!("Step {step}: {} ({})", spec.title, spec.duration);
    let Some(fields) = client.view().step_fields(step) else {
        return;
    };
    for field in fields {
        let label = spec
            .fields
            .iter()
            .find(|candidate| candidate.id == field.id)
            .map(|candidate| candidate.label)
            .unwrap_or(field.id.as_str());
        let required = if spec.required.iter().any(|id| *id == field.id) {
            " *"
        } else {
            ""
        };
        println!("  {label}{required} [{}]: {}", field.id, field.value);
    }
}

fn print_notices(view: &MemoryView) {
    for notice in view.notices() {
        if notice.is_error() {
            eprintln!("{}", notice.message);
        } else {
            println!("{}", notice.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn parses_key_value_assignments() {
        assert_eq!(
            parse_assignment("team-lead=Jane Doe").expect("assignment"),
            ("team-lead".to_string(), "Jane Doe".to_string())
        );
        assert_eq!(
            parse_assignment("notes=a=b").expect("assignment"),
            ("notes".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("no-separator").is_err());
        assert!(parse_assignment("=value").is_err());
    }

    #[test]
    fn command_error_wins_over_shutdown_error() {
        let err = finish(Err(anyhow!("step 1 has no field 'x'")), Err(anyhow!("disk full")))
            .expect_err("both failed");
        assert_eq!(err.to_string(), "step 1 has no field 'x'");

        let err = finish(Ok(()), Err(anyhow!("disk full"))).expect_err("flush failed");
        assert_eq!(err.to_string(), "disk full");

        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn parses_report_and_section_arguments() {
        let args = Args::try_parse_from(["btr", "report", "progress", "--out", "r.html"])
            .expect("args");
        assert!(matches!(
            args.command,
            Command::Report { kind: ReportKind::Progress, out: Some(_) }
        ));

        let args = Args::try_parse_from(["btr", "section", "btr-process"]).expect("args");
        assert!(matches!(
            args.command,
            Command::Section { section: Section::BtrProcess }
        ));
        assert!(Args::try_parse_from(["btr", "section", "settings"]).is_err());
    }

    #[test]
    fn step_next_collects_repeated_flags() {
        let args = Args::try_parse_from([
            "btr",
            "step",
            "next",
            "--set",
            "team-lead=A",
            "--set",
            "institutional-arrangements=B",
            "--check",
            "sources=census",
        ])
        .expect("args");
        let Command::Step(StepCommand::Next { set, check }) = args.command else {
            panic!("expected step next");
        };
        assert_eq!(set.len(), 2);
        assert_eq!(check, vec![("sources".to_string(), "census".to_string())]);
    }
}
