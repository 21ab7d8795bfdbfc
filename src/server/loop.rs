// Server loop module
// Accepts connections until shutdown is requested, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the active connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until `signals` requests shutdown.
///
/// After shutdown the listener is closed and in-flight connections get up to
/// `performance.shutdown_grace_period` seconds to finish.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    let shutdown = signals.shutdown.notified();
    tokio::pin!(shutdown);
    // register before checking the flag so a request in between is not lost
    shutdown.as_mut().enable();

    if !signals.is_shutdown_requested() {
        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            accept_connection(stream, peer_addr, &state, &active_connections);
                        }
                        Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                    }
                }

                () = &mut shutdown => break,
            }
        }
    }

    drop(listener);
    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);
    let remaining = drain_connections(&active_connections, grace).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait for the active connection count to reach zero, at most `grace`.
/// Returns the number of connections still open.
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) -> usize {
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BookStore;
    use crate::config::Config;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        let remaining = drain_connections(&counter, Duration::from_secs(5)).await;
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_grace() {
        let counter = AtomicUsize::new(2);
        let remaining = drain_connections(&counter, Duration::from_millis(60)).await;
        assert_eq!(remaining, 2);
    }

    #[tokio::test]
    async fn test_serves_then_shuts_down() {
        let mut config = Config::load_from("/nonexistent/book-catalog").unwrap();
        config.logging.access_log = false;
        config.performance.shutdown_grace_period = 1;
        let state = Arc::new(AppState::new(config, BookStore::new()));

        let listener = create_listener("127.0.0.1:0".parse().unwrap(), 16).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let server = tokio::spawn(start_server_loop(listener, state, Arc::clone(&signals)));

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /books HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert!(response.ends_with("[]"));

        signals.request_shutdown();
        server.await.unwrap();
    }
}
