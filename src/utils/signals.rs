//! Signal handling for graceful shutdown

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{info, warn};

/// Wait for SIGTERM or SIGINT and return which one arrived
pub async fn shutdown_signal() -> Option<i32> {
    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to install signal handler: {}", e);
            return std::future::pending().await;
        }
    };

    let signal = signals.next().await;
    if let Some(signal) = signal {
        info!("Received signal: {}", signal);
    }
    signals.handle().close();
    signal
}
