//! Presentation of controller state: the schedule table and the page markup.
//!
//! Everything here is pure: data goes in, strings come out.

use std::fmt::Write as _;

use shared::{
    domain::{EmployeeNameMap, ScheduleResult},
    error::SchedulingField,
};

use crate::controller::{EmployeeField, Panel};

pub const EMPLOYEE_HEADER: &str = "Employee";
pub const SCHEDULE_HEADER: &str = "Schedule";
pub const SHIFT_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub employee: String,
    pub schedule: String,
}

/// One row per scheduled employee, in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleTable {
    rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    /// Employees are labelled with their stored display name, or with the raw
    /// key when no name (or an empty one) is stored for them.
    pub fn build(result: &ScheduleResult, names: Option<&EmployeeNameMap>) -> Self {
        let rows = result
            .employee_schedule
            .iter()
            .map(|(key, shifts)| {
                let employee = names
                    .and_then(|names| names.display_name(key.as_str()))
                    .filter(|name| !name.is_empty())
                    .unwrap_or(key.as_str())
                    .to_string();
                let schedule = shifts
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(SHIFT_SEPARATOR);
                ScheduleRow { employee, schedule }
            })
            .collect();
        Self { rows }
    }

    pub fn headers() -> [&'static str; 2] {
        [EMPLOYEE_HEADER, SCHEDULE_HEADER]
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn render_html(&self) -> String {
        let mut html = String::from("<table class=\"schedule-table\">");
        html.push_str("<thead><tr>");
        for header in Self::headers() {
            let _ = write!(html, "<th>{header}</th>");
        }
        html.push_str("</tr></thead><tbody>");
        for row in &self.rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{}</td></tr>",
                escape_html(&row.employee),
                escape_html(&row.schedule)
            );
        }
        html.push_str("</tbody></table>");
        html
    }

    /// Column-aligned rendering for terminals.
    pub fn render_text(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|row| row.employee.chars().count())
            .chain(std::iter::once(EMPLOYEE_HEADER.len()))
            .max()
            .unwrap_or_default();

        let mut text = String::new();
        let _ = writeln!(text, "{EMPLOYEE_HEADER:<width$} | {SCHEDULE_HEADER}");
        let _ = writeln!(text, "{}-+-{}", "-".repeat(width), "-".repeat(SCHEDULE_HEADER.len()));
        for row in &self.rows {
            let _ = writeln!(text, "{:<width$} | {}", row.employee, row.schedule);
        }
        text
    }
}

/// Snapshot of what the page shows, borrowed from a controller.
#[derive(Debug, Clone, Copy)]
pub struct PageView<'a> {
    pub employee_fields: &'a [EmployeeField],
    pub visible_panel: Panel,
    pub event_feedback: Option<&'a str>,
    pub schedule_output: Option<&'a ScheduleTable>,
}

/// Full page markup. Element ids are the binding points scripts and styles
/// rely on, so they must not change.
pub fn render_page(view: &PageView<'_>) -> String {
    let hidden = |panel: Panel| {
        if view.visible_panel == panel {
            ""
        } else {
            " style=\"display: none\""
        }
    };

    let mut html = String::new();
    let _ = write!(
        html,
        "<form id=\"employee-form\"{}><div id=\"employee-names\">",
        hidden(Panel::EmployeeEntry)
    );
    for field in view.employee_fields {
        let id = escape_html(field.id().as_str());
        let _ = write!(
            html,
            "<div><label for=\"{id}\">{}</label><input type=\"text\" id=\"{id}\" name=\"{id}\" value=\"{}\" required></div>",
            escape_html(field.label()),
            escape_html(field.value())
        );
    }
    html.push_str("</div><button type=\"submit\">Save employees</button></form>");

    let _ = write!(
        html,
        "<form id=\"scheduling-form\"{}>",
        hidden(Panel::Scheduling)
    );
    for (field, label, step) in [
        (SchedulingField::NumFullTime, "Full-time employees:", "1"),
        (SchedulingField::NumPartTime, "Part-time employees:", "1"),
        (SchedulingField::MinWage, "Minimum wage:", "any"),
        (SchedulingField::IncreaseRate, "Wage increase rate (%):", "any"),
    ] {
        let id = field.element_id();
        let _ = write!(
            html,
            "<label for=\"{id}\">{label}</label><input type=\"number\" id=\"{id}\" step=\"{step}\" required>"
        );
    }
    html.push_str("<button type=\"submit\">Generate schedule</button></form>");

    html.push_str(
        "<form id=\"event-form\"><textarea id=\"store-event\" required></textarea>\
         <button type=\"submit\">Analyze event</button></form>",
    );
    let _ = write!(
        html,
        "<p id=\"event-feedback\">{}</p>",
        escape_html(view.event_feedback.unwrap_or_default())
    );

    html.push_str("<div id=\"schedule-output\">");
    if let Some(table) = view.schedule_output {
        html.push_str(&table.render_html());
    }
    html.push_str("</div>");
    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
