use tracing::error;

use crate::error::Error;

/// The host's error channel.
///
/// Receives errors worth a human's attention: anything other than the
/// transient failures that happen while the game loads or exits.
pub trait ErrorReporter {
    fn report(&self, error: &Error);
}

/// Reports through `tracing` at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &Error) {
        error!("{}", error);
    }
}

impl<F: Fn(&Error)> ErrorReporter for F {
    fn report(&self, error: &Error) {
        self(error)
    }
}
