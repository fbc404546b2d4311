use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric inputs of the scheduling form, named by their element ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingField {
    NumFullTime,
    NumPartTime,
    MinWage,
    IncreaseRate,
}

impl SchedulingField {
    pub fn element_id(self) -> &'static str {
        match self {
            SchedulingField::NumFullTime => "num-full-time",
            SchedulingField::NumPartTime => "num-part-time",
            SchedulingField::MinWage => "min-wage",
            SchedulingField::IncreaseRate => "increase-rate",
        }
    }
}

impl fmt::Display for SchedulingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is not a number: {raw:?}")]
    NotANumber { field: SchedulingField, raw: String },
    #[error("{field} must be {requirement}, got {value}")]
    OutOfRange {
        field: SchedulingField,
        value: f64,
        requirement: &'static str,
    },
    #[error("employee field {} has no name", .index + 1)]
    BlankEmployeeName { index: usize },
    #[error("no employee field at index {index}")]
    UnknownEmployeeField { index: usize },
    #[error("event description is empty")]
    EmptyEventDescription,
}

/// An `error` field only counts when it carries text; an empty string or
/// `null` is treated as no error at all.
pub fn reported_error(raw: Option<String>) -> Option<String> {
    raw.filter(|message| !message.is_empty())
}
