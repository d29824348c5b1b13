//! Standalone stub backend binary.
//!
//! Serves the prescription API from memory so the `rx` front end can be exercised
//! without the real backend.
//!
//! # Environment Variables
//! - `RX_STUB_ADDR`: listen address (default: "127.0.0.1:8000")
//! - `RX_STUB_EMAIL`, `RX_STUB_PASSWORD`: the account that can sign in

use rx_stub::{router, StubConfig, StubState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rx_stub=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RX_STUB_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into());
    let config = StubConfig {
        seed_records: true,
        ..StubConfig::from_env_values(
            std::env::var("RX_STUB_EMAIL").ok(),
            std::env::var("RX_STUB_PASSWORD").ok(),
        )
    };

    tracing::info!("-- Starting prescription stub backend on {}", addr);
    tracing::info!("-- Sign in as {}", config.email);

    let app = router(StubState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
