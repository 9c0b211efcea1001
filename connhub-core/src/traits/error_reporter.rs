//! Error reporting sink for failures that have no caller

use crate::error::CoreError;

/// Receives failures of background work that cannot be returned to a caller,
/// such as a connection cache that fails to load during restoration.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &CoreError);
}

/// Default reporter: writes to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorReporter;

impl ErrorReporter for LogErrorReporter {
    fn report(&self, context: &str, error: &CoreError) {
        if error.is_expected() {
            log::warn!("{context}: {error}");
        } else {
            log::error!("{context}: {error}");
        }
    }
}
