use designcheck::config::{SimulatorConfig, port_from_env};
use designcheck::{routes, state};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match SimulatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    let port = port_from_env();

    tracing::info!(
        timing = ?config.timing,
        queue_capacity = config.event_queue_capacity,
        duplicate_policy = ?config.duplicate_policy,
        seeded = config.seed.is_some(),
        "simulator configured"
    );

    let app = routes::app(state::AppState::new(config));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "designcheck listening");
    axum::serve(listener, app).await.expect("server failed");
}
