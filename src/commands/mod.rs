pub mod describe;
pub mod events;
pub mod list;
pub mod outputs;
pub mod search;
pub mod template;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Token cancelled on Ctrl-C or once `timeout` elapses.
pub fn interrupt_token(timeout: Option<Duration>) -> CancellationToken {
    let token = CancellationToken::new();

    let on_signal = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = on_signal.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    warn!("Interrupted, reporting what was found so far");
                    on_signal.cancel();
                }
            }
        }
    });

    if let Some(timeout) = timeout {
        let on_timeout = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = on_timeout.cancelled() => {}
                _ = tokio::time::sleep(timeout) => {
                    warn!("Search timed out after {}s", timeout.as_secs());
                    on_timeout.cancel();
                }
            }
        });
    }

    token
}
