//! Notification channel from the form controller to whatever front end hosts it.

use crate::error::SubmitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertCategory {
    Validation,
    Server,
    Transport,
    Storage,
    Sequence,
}

impl AlertCategory {
    pub fn label(self) -> &'static str {
        match self {
            AlertCategory::Validation => "Validation",
            AlertCategory::Server => "Server",
            AlertCategory::Transport => "Transport",
            AlertCategory::Storage => "Storage",
            AlertCategory::Sequence => "Sequence",
        }
    }
}

/// The form a notification originated from, named after its element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormContext {
    EmployeeForm,
    SchedulingForm,
    EventForm,
}

impl FormContext {
    pub fn element_id(self) -> &'static str {
        match self {
            FormContext::EmployeeForm => "employee-form",
            FormContext::SchedulingForm => "scheduling-form",
            FormContext::EventForm => "event-form",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    category: AlertCategory,
    context: FormContext,
    message: String,
}

impl Alert {
    pub fn new(category: AlertCategory, context: FormContext, message: impl Into<String>) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_error(context: FormContext, err: &SubmitError) -> Self {
        let category = match err {
            SubmitError::InvalidSchedulingInput(_) | SubmitError::Validation(_) => {
                AlertCategory::Validation
            }
            SubmitError::Server(_) => AlertCategory::Server,
            SubmitError::ScheduleTransport(_) | SubmitError::EventTransport(_) => {
                AlertCategory::Transport
            }
            SubmitError::Storage(_) => AlertCategory::Storage,
            SubmitError::Sequence(_) => AlertCategory::Sequence,
        };
        Self::new(category, context, err.to_string())
    }

    pub fn category(&self) -> AlertCategory {
        self.category
    }

    pub fn context(&self) -> FormContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Needs the user's attention; replaces a blocking dialog.
    Alert(Alert),
    /// New text for the inline `event-feedback` status line.
    Status(String),
}

pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Keeps every notification in order so callers can inspect them afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    notifications: Vec<Notification>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.notifications.iter().filter_map(|n| match n {
            Notification::Alert(alert) => Some(alert),
            Notification::Status(_) => None,
        })
    }

    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.notifications.iter().filter_map(|n| match n {
            Notification::Status(text) => Some(text.as_str()),
            Notification::Alert(_) => None,
        })
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
