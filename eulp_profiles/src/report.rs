use crate::error::ProfileError;
use crate::models::Selection;

/// Receives per-combination failure messages while a batch keeps going.
pub trait Reporter {
    fn report(&mut self, message: &str);
}

/// Sends every message to the `warn` log level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Collects messages, mostly for tests and for printing a summary later.
impl Reporter for Vec<String> {
    fn report(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// The line shown to the user when a combination yields no data.
pub fn failure_message(selection: &Selection, error: &ProfileError) -> String {
    match error {
        ProfileError::FetchMiss { status } => format!(
            "Failed to retrieve data for {selection}. Status code: {status}. \
             This county-building-upgrade combination may not exist in the data lake."
        ),
        other => format!(
            "Failed to retrieve data for {selection}. {other}. \
             This county-building-upgrade combination may not exist in the data lake."
        ),
    }
}
