use std::{borrow::Borrow, fmt};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const EMPLOYEE_KEY_PREFIX: &str = "emp_";

/// Synthetic employee identifier of the form `emp_<index>`.
///
/// The server invents the same keys for the employees it schedules, so keys
/// received in a schedule are not required to carry a parseable index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeKey(pub String);

impl EmployeeKey {
    pub fn from_index(index: usize) -> Self {
        Self(format!("{EMPLOYEE_KEY_PREFIX}{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EmployeeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display names entered on the employee form, keyed by synthetic key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeNameMap(IndexMap<EmployeeKey, String>);

impl EmployeeNameMap {
    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EmployeeKey, &str)> {
        self.0.iter().map(|(key, name)| (key, name.as_str()))
    }
}

impl FromIterator<(EmployeeKey, String)> for EmployeeNameMap {
    fn from_iter<T: IntoIterator<Item = (EmployeeKey, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Opaque slot label supplied by the server.
///
/// Some servers send a slot as a `[day, shift]` pair instead of a string; the
/// pair is displayed with its parts joined by a comma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShiftLabel {
    Text(String),
    Parts(Vec<String>),
}

impl fmt::Display for ShiftLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftLabel::Text(text) => f.write_str(text),
            ShiftLabel::Parts(parts) => f.write_str(&parts.join(",")),
        }
    }
}

impl From<&str> for ShiftLabel {
    fn from(value: &str) -> Self {
        ShiftLabel::Text(value.to_string())
    }
}

/// Shift assignments per employee, in the order the server listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeSchedule(IndexMap<EmployeeKey, Vec<ShiftLabel>>);

impl EmployeeSchedule {
    pub fn shifts(&self, key: &str) -> Option<&[ShiftLabel]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EmployeeKey, &[ShiftLabel])> {
        self.0.iter().map(|(key, shifts)| (key, shifts.as_slice()))
    }
}

impl FromIterator<(EmployeeKey, Vec<ShiftLabel>)> for EmployeeSchedule {
    fn from_iter<T: IntoIterator<Item = (EmployeeKey, Vec<ShiftLabel>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub employee_schedule: EmployeeSchedule,
}
