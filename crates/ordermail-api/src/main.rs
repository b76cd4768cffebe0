//! Binary entrypoint for the Ordermail API server.
use ordermail_api::{run, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ordermail_api=info,ordermail_out=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    // Listen address and file locations can be overridden with ORDERMAIL_* variables
    run(ServerConfig::from_env()).await
}
