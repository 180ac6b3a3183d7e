use tracing::{error, warn};

/// Transient user-facing messages.
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn warn(&self, message: &str) {
        warn!(target: "kbase::notice", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "kbase::notice", "{message}");
    }
}
