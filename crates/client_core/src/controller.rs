//! The form controller: employee entry, scheduling and event submission.
//!
//! All state lives on the [`FormController`] instance. Every failed submission
//! is both returned to the caller and emitted once through the [`Notifier`].

use std::str::FromStr;

use serde::Deserialize;
use shared::{
    domain::{EmployeeKey, EmployeeNameMap, ScheduleResult},
    error::ValidationError,
    protocol::{EventRequest, SchedulingRequest},
};
use tracing::{debug, error, info, warn};

use crate::{
    backend::{SchedulingBackend, ServerReply},
    error::{SequenceViolation, SubmitError},
    notify::{Alert, FormContext, Notification, Notifier},
    store::{load_employee_names, save_employee_names, KeyValueStore},
    view::{PageView, ScheduleTable},
};

pub const INITIAL_EMPLOYEE_FIELDS: usize = 2;
pub const ANALYZING_STATUS: &str = "Analyzing event...";
pub const ANALYSIS_COMPLETE_STATUS: &str = "Event analysis complete. Schedule updated.";

/// Whether the employee → scheduling → event order is enforced.
///
/// Config files and the environment accept the same case-insensitive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SequencePolicy {
    /// Any form may be submitted at any time; unknown employees show raw keys.
    #[default]
    Relaxed,
    /// Scheduling needs stored names, event analysis needs a schedule from
    /// this session.
    Strict,
}

impl FromStr for SequencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" => Ok(SequencePolicy::Relaxed),
            "strict" => Ok(SequencePolicy::Strict),
            other => Err(format!(
                "unknown sequence policy '{other}' (expected 'relaxed' or 'strict')"
            )),
        }
    }
}

impl TryFrom<String> for SequencePolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    EmployeeEntry,
    Scheduling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeField {
    id: EmployeeKey,
    label: String,
    value: String,
}

impl EmployeeField {
    pub fn new(index: usize, value: impl Into<String>) -> Self {
        Self {
            id: EmployeeKey::from_index(index),
            label: format!("Employee {}:", index + 1),
            value: value.into(),
        }
    }

    pub fn id(&self) -> &EmployeeKey {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Raw text of the four scheduling inputs, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulingFormInput {
    pub num_full_time: String,
    pub num_part_time: String,
    pub min_wage: String,
    pub increase_rate: String,
}

pub struct FormController<B, S, N> {
    backend: B,
    store: S,
    notifier: N,
    policy: SequencePolicy,
    fields: Vec<EmployeeField>,
    panel: Panel,
    event_feedback: Option<String>,
    schedule_output: Option<ScheduleTable>,
    names_submitted: bool,
    schedule_produced: bool,
}

impl<B, S, N> FormController<B, S, N>
where
    B: SchedulingBackend,
    S: KeyValueStore,
    N: Notifier,
{
    pub fn new(backend: B, store: S, notifier: N) -> Self {
        Self {
            backend,
            store,
            notifier,
            policy: SequencePolicy::default(),
            fields: (0..INITIAL_EMPLOYEE_FIELDS)
                .map(|index| EmployeeField::new(index, ""))
                .collect(),
            panel: Panel::EmployeeEntry,
            event_feedback: None,
            schedule_output: None,
            names_submitted: false,
            schedule_produced: false,
        }
    }

    pub fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn employee_fields(&self) -> &[EmployeeField] {
        &self.fields
    }

    pub fn employee_count(&self) -> usize {
        self.fields.len()
    }

    pub fn visible_panel(&self) -> Panel {
        self.panel
    }

    pub fn event_feedback(&self) -> Option<&str> {
        self.event_feedback.as_deref()
    }

    pub fn schedule_output(&self) -> Option<&ScheduleTable> {
        self.schedule_output.as_ref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn page_view(&self) -> PageView<'_> {
        PageView {
            employee_fields: &self.fields,
            visible_panel: self.panel,
            event_feedback: self.event_feedback.as_deref(),
            schedule_output: self.schedule_output.as_ref(),
        }
    }

    /// Appends one more (empty) employee input and returns its id.
    pub fn add_employee_field(&mut self) -> &EmployeeKey {
        let index = self.fields.len();
        self.fields.push(EmployeeField::new(index, ""));
        debug!(count = self.fields.len(), "employee field added");
        self.fields[index].id()
    }

    pub fn set_employee_name(
        &mut self,
        index: usize,
        name: impl Into<String>,
    ) -> Result<(), SubmitError> {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.value = name.into();
                Ok(())
            }
            None => self.fail(
                FormContext::EmployeeForm,
                SubmitError::Validation(ValidationError::UnknownEmployeeField { index }),
            ),
        }
    }

    /// Stores every field's name under its key, replacing any earlier map, and
    /// switches to the scheduling panel.
    pub fn submit_employee_form(&mut self) -> Result<EmployeeNameMap, SubmitError> {
        if let Some(index) = self.fields.iter().position(|f| f.value.trim().is_empty()) {
            return self.fail(
                FormContext::EmployeeForm,
                SubmitError::Validation(ValidationError::BlankEmployeeName { index }),
            );
        }

        let names: EmployeeNameMap = self
            .fields
            .iter()
            .map(|field| (field.id.clone(), field.value.clone()))
            .collect();
        if let Err(err) = save_employee_names(&mut self.store, &names) {
            return self.fail(FormContext::EmployeeForm, err.into());
        }

        info!(employees = names.len(), "employee names stored");
        self.names_submitted = true;
        self.panel = Panel::Scheduling;
        Ok(names)
    }

    pub async fn submit_scheduling_form(
        &mut self,
        input: &SchedulingFormInput,
    ) -> Result<&ScheduleTable, SubmitError> {
        let context = FormContext::SchedulingForm;
        if self.policy == SequencePolicy::Strict && !self.names_known() {
            return self.fail(context, SequenceViolation::NamesNotSubmitted.into());
        }

        let request = match SchedulingRequest::parse(
            &input.num_full_time,
            &input.num_part_time,
            &input.min_wage,
            &input.increase_rate,
        ) {
            Ok(request) => request,
            Err(err) => return self.fail(context, SubmitError::InvalidSchedulingInput(err)),
        };

        debug!(
            num_full_time = request.num_full_time(),
            num_part_time = request.num_part_time(),
            "requesting schedule"
        );
        let reply = self.backend.request_schedule(&request).await;
        match reply {
            Ok(ServerReply::Schedule(schedule)) => Ok(self.display_schedule(&schedule)),
            Ok(ServerReply::Error(message)) => self.fail(context, SubmitError::Server(message)),
            Err(source) => self.fail(context, SubmitError::ScheduleTransport(source)),
        }
    }

    /// Sends the description for analysis. The status line is only moved to
    /// the completed state on success; failures leave it as it was.
    pub async fn submit_event_form(
        &mut self,
        description: &str,
    ) -> Result<&ScheduleTable, SubmitError> {
        let context = FormContext::EventForm;
        if self.policy == SequencePolicy::Strict && !self.schedule_produced {
            return self.fail(context, SequenceViolation::NoScheduleYet.into());
        }

        let request = match EventRequest::new(description) {
            Ok(request) => request,
            Err(err) => return self.fail(context, SubmitError::Validation(err)),
        };

        self.set_event_feedback(ANALYZING_STATUS);
        let reply = self.backend.analyze_event(&request).await;
        match reply {
            Ok(ServerReply::Schedule(schedule)) => {
                self.set_event_feedback(ANALYSIS_COMPLETE_STATUS);
                Ok(self.display_schedule(&schedule))
            }
            Ok(ServerReply::Error(message)) => self.fail(context, SubmitError::Server(message)),
            Err(source) => self.fail(context, SubmitError::EventTransport(source)),
        }
    }

    /// Rebuilds the schedule output from scratch.
    pub fn display_schedule(&mut self, schedule: &ScheduleResult) -> &ScheduleTable {
        let names = match load_employee_names(&self.store) {
            Ok(names) => names,
            Err(err) => {
                warn!("employee names unavailable, showing raw keys: {err}");
                None
            }
        };
        let table = ScheduleTable::build(schedule, names.as_ref());
        info!(rows = table.rows().len(), "schedule rendered");
        self.schedule_produced = true;
        self.schedule_output.insert(table)
    }

    fn names_known(&self) -> bool {
        self.names_submitted || matches!(load_employee_names(&self.store), Ok(Some(_)))
    }

    fn set_event_feedback(&mut self, text: &str) {
        self.event_feedback = Some(text.to_string());
        self.notifier.notify(Notification::Status(text.to_string()));
    }

    fn fail<T>(&mut self, context: FormContext, err: SubmitError) -> Result<T, SubmitError> {
        match err.backend_error() {
            Some(source) => {
                error!(form = context.element_id(), "submission failed: {source}");
            }
            None => {
                debug!(form = context.element_id(), "submission rejected: {err}");
            }
        }
        self.notifier
            .notify(Notification::Alert(Alert::from_error(context, &err)));
        Err(err)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
