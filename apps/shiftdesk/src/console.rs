//! Terminal rendering of controller notifications.

use client_core::{Alert, Notification, Notifier};

/// Alerts go to stderr, status lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification {
            Notification::Alert(alert) => eprintln!("{}", format_alert(&alert)),
            Notification::Status(text) => println!("{text}"),
        }
    }
}

pub fn format_alert(alert: &Alert) -> String {
    format!(
        "[{} error in {}] {}",
        alert.category().label(),
        alert.context().element_id(),
        alert.message()
    )
}
