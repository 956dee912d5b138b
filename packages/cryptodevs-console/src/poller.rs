//! Background refresh of chain state.
//!
//! [`Pollers::start`] bootstraps the console, then runs two independent
//! fixed-interval loops: minted count, and presale flags. Both stop when
//! the shared cancellation token fires.

use crate::console::MintConsole;
use crate::metrics::METRICS;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Owned polling tasks. Dropping the value cancels them.
pub struct Pollers {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Pollers {
    /// Bootstrap `console`, then poll every `interval` until cancelled.
    pub fn start(console: Arc<MintConsole>, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "Starting console pollers");
            tokio::select! {
                _ = console.bootstrap() => {},
                _ = token.cancelled() => {
                    info!("Bootstrap cancelled");
                    return;
                }
            }

            let minted = {
                let console = Arc::clone(&console);
                poll_loop("minted_count", interval, token.clone(), move || {
                    let console = Arc::clone(&console);
                    async move {
                        let _ = console.refresh_minted().await;
                    }
                })
            };
            let sale = {
                let console = Arc::clone(&console);
                poll_loop("sale_state", interval, token.clone(), move || {
                    let console = Arc::clone(&console);
                    async move { console.refresh_sale_state().await }
                })
            };
            tokio::join!(minted, sale);
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Token that stops the pollers when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel both loops and wait for them to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Poller task ended abnormally");
            }
        }
        info!("Pollers stopped");
    }
}

impl Drop for Pollers {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop<F, Fut>(name: &'static str, interval: Duration, cancel: CancellationToken, mut tick: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {},
            _ = cancel.cancelled() => {
                debug!(poller = name, "Poller shutting down");
                return;
            }
        }

        METRICS.poll_ticks.fetch_add(1, Ordering::Relaxed);
        // A hung provider call must not block shutdown.
        tokio::select! {
            _ = tick() => {},
            _ = cancel.cancelled() => {
                debug!(poller = name, "Poller cancelled mid-tick");
                return;
            }
        }
    }
}
