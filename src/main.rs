use std::sync::Arc;

mod api;
mod catalog;
mod config;
mod handler;
mod http;
mod logger;
mod server;
mod view;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument overrides the config file path (extension optional)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;

    // Create Tokio runtime, thread count from `server.workers` (CPU cores if unset)
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    let addr = cfg.get_socket_addr()?;
    let store = catalog::build_store(&cfg.catalog)?;
    let book_count = store.len().await;
    if store.is_empty().await {
        logger::log_warning("Catalog starts empty");
    }

    let listener = server::create_listener(addr, cfg.server.backlog)?;
    logger::log_server_start(&addr, &cfg, book_count);

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    let state = Arc::new(config::AppState::new(cfg, store));
    server::start_server_loop(listener, state, signals).await;
    Ok(())
}
