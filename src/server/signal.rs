// Signal handling module
//
// SIGTERM and SIGINT both request a graceful shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Shutdown signal state shared with the server loop
pub struct SignalHandler {
    /// Woken once when shutdown is requested
    pub shutdown: Notify,
    shutdown_requested: AtomicBool,
}

impl SignalHandler {
    pub const fn new() -> Self {
        Self {
            shutdown: Notify::const_new(),
            shutdown_requested: AtomicBool::new(false),
        }
    }

    /// Mark shutdown as requested and wake the server loop
    pub fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown_requested.load(Ordering::SeqCst)
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {e}"));
                    wait_ctrl_c(&handler).await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => logger::log_info("SIGTERM received, initiating graceful shutdown"),
            _ = sigint.recv() => logger::log_info("SIGINT received, initiating graceful shutdown"),
        }
        handler.request_shutdown();
    });
}

/// Fallback for platforms without Unix signals: Ctrl+C only
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        wait_ctrl_c(&handler).await;
    });
}

async fn wait_ctrl_c(handler: &SignalHandler) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            logger::log_info("Ctrl+C received, initiating graceful shutdown");
            handler.request_shutdown();
        }
        Err(e) => logger::log_error(&format!("Failed to listen for Ctrl+C: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_shutdown_wakes_waiter() {
        let handler = Arc::new(SignalHandler::new());
        let waiter = {
            let handler = Arc::clone(&handler);
            tokio::spawn(async move {
                let notified = handler.shutdown.notified();
                tokio::pin!(notified);
                notified.as_mut().enable();
                if !handler.is_shutdown_requested() {
                    notified.await;
                }
            })
        };

        tokio::task::yield_now().await;
        assert!(!handler.is_shutdown_requested());
        handler.request_shutdown();
        assert!(handler.is_shutdown_requested());
        waiter.await.unwrap();
    }
}
