//! Host shell side of the screen locker

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Background task that keeps the shell windows in step with the locker.
///
/// Registers itself as the unlock observer, so it replaces any earlier one,
/// and follows lock window updates from the locker's watch channel.
pub async fn unlock_listener_task(state: Arc<AppState>) {
    info!("Starting unlock listener task");

    let (mut unlock_rx, mut view_rx) = match (state.subscribe_unlocked(), state.watch_lock_view()) {
        (Ok(unlock_rx), Ok(view_rx)) => (unlock_rx, view_rx),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to subscribe to screen locker: {}", e);
            return;
        }
    };

    loop {
        tokio::select! {
            event = unlock_rx.recv() => {
                match event {
                    Some(event) => {
                        debug!("Unlock event received (was_locked={})", event.was_locked);
                        if let Err(e) = state.apply_unlock(&event) {
                            error!("Failed to restore main window: {}", e);
                        }
                    }
                    None => {
                        warn!("Unlock observer replaced, stopping listener");
                        break;
                    }
                }
            }

            changed = view_rx.changed() => {
                if changed.is_err() {
                    warn!("Screen locker dropped, stopping listener");
                    break;
                }
                let shown = view_rx.borrow_and_update().lock_window.is_shown();
                if let Err(e) = state.set_lock_window(shown) {
                    error!("Failed to update lock window: {}", e);
                }
            }
        }
    }
}
