use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from, Settings},
    view::render_page,
    FormController, HttpSchedulingBackend, JsonFileStore, ScheduleTable, SchedulingFormInput,
    SequencePolicy, SubmitError,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod console;

use console::ConsoleNotifier;

type Controller = FormController<HttpSchedulingBackend, JsonFileStore, ConsoleNotifier>;

#[derive(Parser, Debug)]
#[command(name = "shiftdesk", about = "Submit staffing forms to a shift scheduling service")]
struct Cli {
    /// Base URL of the scheduling service.
    #[arg(long, global = true)]
    server_url: Option<String>,
    /// JSON file holding locally stored values such as employee names.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    /// Config file to read instead of ./shiftdesk.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Require names, then a schedule, then events, in that order.
    #[arg(long, global = true)]
    strict: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct SchedulingArgs {
    #[arg(long, allow_hyphen_values = true)]
    full_time: String,
    #[arg(long, allow_hyphen_values = true)]
    part_time: String,
    #[arg(long, allow_hyphen_values = true)]
    min_wage: String,
    /// Expected wage increase in percent.
    #[arg(long, allow_hyphen_values = true)]
    increase_rate: String,
}

impl From<SchedulingArgs> for SchedulingFormInput {
    fn from(args: SchedulingArgs) -> Self {
        Self {
            num_full_time: args.full_time,
            num_part_time: args.part_time,
            min_wage: args.min_wage,
            increase_rate: args.increase_rate,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store employee display names, in field order.
    Names {
        #[arg(num_args = 2.., required = true)]
        names: Vec<String>,
    },
    /// Request a schedule for the given staffing and wage parameters.
    Schedule {
        #[command(flatten)]
        fields: SchedulingArgs,
        /// Also write the schedule table as HTML.
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Describe a store event and show the adjusted schedule.
    Event {
        description: String,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Names, schedule and an optional event in one session.
    Run {
        /// Employee display names, in field order.
        #[arg(long, num_args = 2.., required = true)]
        names: Vec<String>,
        #[command(flatten)]
        fields: SchedulingArgs,
        #[arg(long)]
        event: Option<String>,
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Print the page markup for the initial form state.
    Page,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = resolve_settings(&cli)?;
    let server_url = settings.parsed_server_url()?;
    let store_path = settings.resolved_store_path()?;
    let backend = HttpSchedulingBackend::new(&server_url)
        .with_context(|| format!("cannot derive endpoints from {server_url}"))?;
    info!(server = %server_url, store = %store_path.display(), "shiftdesk ready");

    let mut controller = FormController::new(
        backend,
        JsonFileStore::new(&store_path),
        ConsoleNotifier,
    )
    .with_sequence_policy(settings.sequence);

    let succeeded = match cli.command {
        Command::Names { names } => submit_names(&mut controller, &names),
        Command::Schedule { fields, html } => {
            let outcome = controller.submit_scheduling_form(&fields.into()).await;
            show_schedule(outcome, html.as_deref())?
        }
        Command::Event { description, html } => {
            let outcome = controller.submit_event_form(&description).await;
            show_schedule(outcome, html.as_deref())?
        }
        Command::Run {
            names,
            fields,
            event,
            html,
        } => {
            if !submit_names(&mut controller, &names) {
                return Ok(ExitCode::FAILURE);
            }
            let outcome = controller.submit_scheduling_form(&fields.into()).await;
            let scheduled = show_schedule(outcome, html.as_deref())?;
            match event {
                Some(description) if scheduled => {
                    let outcome = controller.submit_event_form(&description).await;
                    show_schedule(outcome, html.as_deref())?
                }
                _ => scheduled,
            }
        }
        Command::Page => {
            println!("{}", render_page(&controller.page_view()));
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => load_settings_from(path, |name| std::env::var(name).ok()),
        None => load_settings(),
    }
    .context("failed to load settings")?;

    if let Some(url) = &cli.server_url {
        settings.set_server_url(url)?;
    }
    if let Some(store) = &cli.store {
        settings.store_path = Some(store.clone());
    }
    if cli.strict {
        settings.sequence = SequencePolicy::Strict;
    }
    Ok(settings)
}

/// Failures have already been reported through the notifier.
fn submit_names(controller: &mut Controller, names: &[String]) -> bool {
    while controller.employee_count() < names.len() {
        controller.add_employee_field();
    }
    for (index, name) in names.iter().enumerate() {
        if controller.set_employee_name(index, name.as_str()).is_err() {
            return false;
        }
    }
    match controller.submit_employee_form() {
        Ok(stored) => {
            println!("Stored {} employee names.", stored.len());
            true
        }
        Err(_) => false,
    }
}

fn show_schedule(
    outcome: Result<&ScheduleTable, SubmitError>,
    html: Option<&Path>,
) -> Result<bool> {
    let Ok(table) = outcome else {
        return Ok(false);
    };
    print!("{}", table.render_text());
    if let Some(path) = html {
        fs::write(path, table.render_html())
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULING_FLAGS: [&str; 8] = [
        "--full-time",
        "2",
        "--part-time",
        "1",
        "--min-wage",
        "15",
        "--increase-rate",
        "3",
    ];

    fn parse_run(names: &[&str]) -> Result<Cli, clap::Error> {
        let args = ["shiftdesk", "run", "--names"]
            .into_iter()
            .chain(names.iter().copied())
            .chain(SCHEDULING_FLAGS);
        Cli::try_parse_from(args)
    }

    #[test]
    fn names_and_run_both_need_two_employees() {
        assert!(Cli::try_parse_from(["shiftdesk", "names", "Alice"]).is_err());
        assert!(parse_run(&["Alice"]).is_err());

        let cli = parse_run(&["Alice", "Bob"]).expect("two names");
        match cli.command {
            Command::Run { names, fields, .. } => {
                assert_eq!(names, ["Alice", "Bob"]);
                assert_eq!(fields.full_time, "2");
            }
            other => panic!("expected run, got {other:?}"),
        }
    }
}
