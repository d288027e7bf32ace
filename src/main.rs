use tracing_subscriber::EnvFilter;

use baseline_relay::api::{server, ApiContext};
use baseline_relay::config::{self, RelayConfig};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = RelayConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; serving cached results only");
    }

    let bind_addr = config.bind_addr.clone();
    let ctx = ApiContext::from_config(config);

    if let Err(e) = server::serve(ctx, &bind_addr).await {
        tracing::error!("Relay server failed: {e}");
        std::process::exit(1);
    }
}
