//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::{backend_bridge::commands::BackendCommand, controller::notices::Notices};

/// Queues `cmd` without blocking the UI thread. Returns whether it was queued;
/// failures surface as a notice.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    notices: &mut Notices,
) -> bool {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            true
        }
        Err(TrySendError::Full(_)) => {
            notices.error("UI command queue is full; please retry");
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            notices.error("Backend command processor disconnected; restart the app");
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            false
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
