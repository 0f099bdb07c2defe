//! Per-session timer: waits out each collection window and resolves it.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::sleep_until;
use tracing::{debug, warn};

use crate::services::game_service::GameService;
use crate::services::registry::LiveSession;

pub fn spawn(service: GameService, live: Arc<LiveSession>) -> JoinHandle<()> {
    tokio::spawn(run(service, live))
}

/// Resolve each window exactly once when its deadline passes, until the
/// game ends or is cancelled.
pub async fn run(service: GameService, live: Arc<LiveSession>) {
    let chat_id = live.chat_id();
    let cancel = live.cancel_token();

    while let Some((deadline, round_no)) = live.window() {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(chat_id, round_no, "Round driver cancelled");
                return;
            }
            _ = sleep_until(deadline) => {}
        }

        match service.close_window(&live, Some(round_no)).await {
            Ok(Some(report)) if report.is_terminal() => break,
            Ok(_) => {}
            Err(err) => {
                warn!(chat_id, round_no, error = %err, "Round driver stopped");
                return;
            }
        }
    }
    debug!(chat_id, "Round driver finished");
}
