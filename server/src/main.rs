mod config;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match config::SinkConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid sink configuration");
            std::process::exit(2);
        }
    };

    let state = state::AppState::new();
    let app = routes::app(state);

    let listener = match tokio::net::TcpListener::bind(config.addr()).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, addr = %config.addr(), "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(host = %config.host, port = config.port, "relation sink listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
