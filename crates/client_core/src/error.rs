use shared::error::ValidationError;
use thiserror::Error;

use crate::{backend::BackendError, store::StoreError};

/// Preconditions enforced under [`crate::controller::SequencePolicy::Strict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SequenceViolation {
    #[error("Please submit the employee names first.")]
    NamesNotSubmitted,
    #[error("Please generate a schedule before reporting an event.")]
    NoScheduleYet,
}

/// Why a form submission stopped. The display text is what the user is shown.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please enter valid input values.")]
    InvalidSchedulingInput(#[source] ValidationError),
    #[error("{0}")]
    Validation(#[source] ValidationError),
    #[error("{0}")]
    Server(String),
    #[error("An error occurred while generating the schedule.")]
    ScheduleTransport(#[source] BackendError),
    #[error("An error occurred while analyzing the event.")]
    EventTransport(#[source] BackendError),
    #[error("Could not save employee names: {0}")]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Sequence(#[from] SequenceViolation),
}

impl SubmitError {
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            SubmitError::InvalidSchedulingInput(err) | SubmitError::Validation(err) => Some(err),
            _ => None,
        }
    }

    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            SubmitError::ScheduleTransport(err) | SubmitError::EventTransport(err) => Some(err),
            _ => None,
        }
    }
}
