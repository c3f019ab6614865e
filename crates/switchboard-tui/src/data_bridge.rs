//! Data bridge: loads the switch inventory into the TUI action loop.
//!
//! Runs as a background task: fetches the switch list once, then again on
//! every refresh request, until cancelled.

use std::sync::Arc;

use tokio::sync::{Notify, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use switchboard_core::SwitchService;

use crate::action::Action;

pub async fn spawn_data_bridge(
    service: SwitchService,
    action_tx: mpsc::UnboundedSender<Action>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
) {
    loop {
        let _ = action_tx.send(Action::Loading);

        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            result = service.switches() => result,
        };

        match fetched {
            Ok(rows) => {
                info!(count = rows.len(), "switch inventory loaded");
                let _ = action_tx.send(Action::SwitchesUpdated(Arc::new(rows)));
            }
            Err(e) => {
                warn!(error = %e, "failed to load switches");
                let _ = action_tx.send(Action::LoadFailed(e.to_string()));
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            () = refresh.notified() => debug!("refresh requested"),
        }
    }

    debug!("data bridge shut down");
}
