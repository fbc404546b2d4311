//! Client side of the shift scheduling service: the form controller and the
//! pieces it is wired from.

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod notify;
pub mod store;
pub mod view;

pub use backend::{BackendError, HttpSchedulingBackend, SchedulingBackend, ServerReply};
pub use controller::{FormController, Panel, SchedulingFormInput, SequencePolicy};
pub use error::{SequenceViolation, SubmitError};
pub use notify::{Alert, AlertCategory, FormContext, MemoryNotifier, Notification, Notifier};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
pub use view::ScheduleTable;
