use tracing::{info, warn};

use crate::domain::entities::Notice;
use crate::domain::ports::Notifier;

// Stands in for on-screen toasts when there is no display.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => info!(notice = %message, "success"),
            Notice::Failure(message) => warn!(notice = %message, "failure"),
        }
    }
}
