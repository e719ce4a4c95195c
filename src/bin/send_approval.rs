//! One-shot approval call against the bot API.
//!
//! Usage:  cargo run --bin send_approval [approval_id]
//!
//! Without an argument a random id is sent, which the bot will reject as
//! unknown; useful as a connectivity and auth check.

use kalshiguard::config::Config;
use kalshiguard::feeds::dashboard_client::DashboardClient;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::load_or_default();
    config.validate()?;

    let approval_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let client = DashboardClient::new(config.server)?;
    info!("Sending approval {approval_id} to {}", client.base_url());

    client
        .send_approval(&approval_id)
        .await
        .map_err(|e| anyhow::anyhow!("Approval call failed: {e}"))?;

    info!("Approval {approval_id} sent");
    Ok(())
}
