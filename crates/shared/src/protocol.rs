use serde::{Deserialize, Serialize};

use crate::{
    domain::{EmployeeSchedule, ScheduleResult},
    error::{SchedulingField, ValidationError},
};

pub fn schedule_route() -> &'static str {
    "/schedule"
}

pub fn event_route() -> &'static str {
    "/event"
}

/// Staffing and wage parameters posted to the schedule endpoint.
///
/// Only [`SchedulingRequest::parse`] builds one on the client side, so every
/// value that reaches the wire has passed the sign checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    num_full_time: u32,
    num_part_time: u32,
    min_wage: f64,
    increase_rate: f64,
}

impl SchedulingRequest {
    pub fn parse(
        num_full_time: &str,
        num_part_time: &str,
        min_wage: &str,
        increase_rate: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            num_full_time: parse_positive_count(SchedulingField::NumFullTime, num_full_time)?,
            num_part_time: parse_positive_count(SchedulingField::NumPartTime, num_part_time)?,
            min_wage: parse_real(SchedulingField::MinWage, min_wage, |v| v > 0.0, "positive")?,
            increase_rate: parse_real(
                SchedulingField::IncreaseRate,
                increase_rate,
                |v| v >= 0.0,
                "zero or positive",
            )?,
        })
    }

    pub fn num_full_time(&self) -> u32 {
        self.num_full_time
    }

    pub fn num_part_time(&self) -> u32 {
        self.num_part_time
    }

    pub fn min_wage(&self) -> f64 {
        self.min_wage
    }

    pub fn increase_rate(&self) -> f64 {
        self.increase_rate
    }
}

fn parse_positive_count(field: SchedulingField, raw: &str) -> Result<u32, ValidationError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber {
            field,
            raw: raw.to_string(),
        })?;
    if value <= 0 {
        return Err(ValidationError::OutOfRange {
            field,
            value: value as f64,
            requirement: "a positive integer",
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value: value as f64,
        requirement: "a positive integer",
    })
}

fn parse_real(
    field: SchedulingField,
    raw: &str,
    accept: impl Fn(f64) -> bool,
    requirement: &'static str,
) -> Result<f64, ValidationError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            raw: raw.to_string(),
        })?;
    if !accept(value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            requirement,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRequest {
    pub event_description: String,
}

impl EventRequest {
    pub fn new(event_description: impl Into<String>) -> Result<Self, ValidationError> {
        let event_description = event_description.into();
        if event_description.trim().is_empty() {
            return Err(ValidationError::EmptyEventDescription);
        }
        Ok(Self { event_description })
    }
}

/// Raw `/schedule` response: either a schedule or an `error` field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponseBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub employee_schedule: Option<EmployeeSchedule>,
}

/// Raw `/event` response. The schedule normally sits under `schedule`, but a
/// bare top-level `employee_schedule` is accepted as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventResponseBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub schedule: Option<ScheduleResult>,
    #[serde(default)]
    pub employee_schedule: Option<EmployeeSchedule>,
}

impl EventResponseBody {
    pub fn into_schedule(self) -> Option<ScheduleResult> {
        self.schedule.or_else(|| {
            self.employee_schedule
                .map(|employee_schedule| ScheduleResult { employee_schedule })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_scheduling_input() {
        let request = SchedulingRequest::parse(" 3", "2 ", "15.5", "0").expect("valid");
        assert_eq!(request.num_full_time(), 3);
        assert_eq!(request.num_part_time(), 2);
        assert_eq!(request.min_wage(), 15.5);
        assert_eq!(request.increase_rate(), 0.0);
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            serde_json::json!({
                "num_full_time": 3,
                "num_part_time": 2,
                "min_wage": 15.5,
                "increase_rate": 0.0
            })
        );
    }

    #[test]
    fn rejects_non_numeric_and_non_positive_values() {
        let cases = [
            ("abc", "2", "15", "3", SchedulingField::NumFullTime),
            ("3", "0", "15", "3", SchedulingField::NumPartTime),
            ("3", "-4", "15", "3", SchedulingField::NumPartTime),
            ("3", "2", "0", "3", SchedulingField::MinWage),
            ("3", "2", "NaN", "3", SchedulingField::MinWage),
            ("3", "2", "15", "-0.5", SchedulingField::IncreaseRate),
            ("3", "2", "15", "", SchedulingField::IncreaseRate),
            ("2.5", "2", "15", "3", SchedulingField::NumFullTime),
        ];
        for (full, part, wage, rate, expected_field) in cases {
            let err = SchedulingRequest::parse(full, part, wage, rate).expect_err("must reject");
            let field = match err {
                ValidationError::NotANumber { field, .. }
                | ValidationError::OutOfRange { field, .. } => field,
                other => panic!("unexpected error: {other}"),
            };
            assert_eq!(field, expected_field, "input {full}/{part}/{wage}/{rate}");
        }
    }

    #[test]
    fn blank_event_description_is_rejected() {
        assert_eq!(
            EventRequest::new("   "),
            Err(ValidationError::EmptyEventDescription)
        );
        assert!(EventRequest::new("Bob is out sick").is_ok());
    }

    #[test]
    fn event_body_falls_back_to_top_level_schedule() {
        let nested: EventResponseBody =
            serde_json::from_str(r#"{"schedule":{"employee_schedule":{"emp_0":["Mon AM"]}}}"#)
                .expect("nested");
        let flat: EventResponseBody =
            serde_json::from_str(r#"{"employee_schedule":{"emp_0":["Mon AM"]}}"#).expect("flat");
        assert_eq!(nested.into_schedule(), flat.into_schedule());

        let empty: EventResponseBody = serde_json::from_str("{}").expect("empty");
        assert!(empty.into_schedule().is_none());
    }
}
