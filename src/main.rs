use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO; override with RUST_LOG for debugging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "sheetsmith=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sheetsmith::config::AppConfig::from_env().await?;

    tracing::info!(
        "✅ Document store ready ({} backend)",
        config.store.backend_kind()
    );
    if config.mail.is_some() {
        tracing::info!("✅ Lead-notification mail enabled");
    } else {
        tracing::info!("Lead-notification mail disabled (RESEND_API_KEY not set)");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = sheetsmith::create_app(config);

    tracing::info!("Starting Sheetsmith server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
