use bone_strength::config::get_configuration;
use bone_strength::startup::build_router;
use bone_strength::AppState;
use dotenvy::dotenv;
use service_core::observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        "bone-strength",
        &configuration.server.log_level,
        configuration.server.otlp_endpoint.as_deref(),
    )?;

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );

    let state = AppState::new(configuration)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting bone-strength on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
