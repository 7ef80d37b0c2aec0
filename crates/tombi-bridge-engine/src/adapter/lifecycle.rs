//! Process termination helpers for the engine adapter.

use std::process::Child;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::ADAPTER_TARGET;

/// Grace period between asking the engine to exit and killing it.
const EXIT_GRACE_PERIOD: Duration = Duration::from_millis(200);

/// Waits for the child to exit, killing it after the grace period.
///
/// Handles the already-exited case, the still-running case, and the
/// case where the status check itself fails; the child handle is reaped
/// on every path.
pub(super) fn terminate_child(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(target: ADAPTER_TARGET, ?status, "engine process exited");
        }
        Ok(None) => {
            warn!(
                target: ADAPTER_TARGET,
                "engine did not exit gracefully, waiting before killing"
            );
            wait_then_kill(child);
        }
        Err(error) => {
            warn!(
                target: ADAPTER_TARGET,
                error = %error,
                "failed to check engine status, waiting before killing"
            );
            wait_then_kill(child);
        }
    }
}

fn wait_then_kill(child: &mut Child) {
    thread::sleep(EXIT_GRACE_PERIOD);
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(
                target: ADAPTER_TARGET,
                ?status,
                "engine exited during grace period"
            );
        }
        Ok(None) | Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
