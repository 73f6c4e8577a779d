// Rexline API server
// Decision: TimeRex booking → LINE follow → push confirmation, all in one process
// Decision: Correlation store is in memory; a restart drops pending bookings

use anyhow::{Context, Result};
use rexline_api::{build_router, AppState, RelayConfig};
use rexline_core::{memory::InMemoryBookingStore, BookingRelay, Notifier};
use rexline_line::LinePushClient;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading any configuration
    let dotenv_path = dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rexline_api=debug,rexline_core=info,rexline_line=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("rexline-api starting...");
    if let Some(path) = dotenv_path {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let config = RelayConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        line_api = %config.line_api_base_url,
        friend_add_url = %config.friend_add_url,
        booking_ttl_secs = config.booking_ttl.as_secs(),
        consume_on_delivery = config.consume_on_delivery,
        "Relay configured"
    );

    if config.cors_allowed_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_allowed_origins, "CORS origins configured");
    }

    let store = Arc::new(InMemoryBookingStore::with_ttl(config.booking_ttl));
    let push_client = Arc::new(LinePushClient::with_base_url(
        config.line_channel_access_token.clone(),
        config.line_api_base_url.clone(),
    ));
    let notifier = Notifier::new(push_client).with_template(config.message_template.clone());
    let relay =
        BookingRelay::new(store, notifier).consume_on_delivery(config.consume_on_delivery);

    let state = AppState::new(relay, &config);
    let app = build_router(state, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
