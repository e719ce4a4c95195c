use kalshiguard::config::Config;
use kalshiguard::feeds::dashboard_client::DashboardClient;
use kalshiguard::state::publisher::DashboardState;
use kalshiguard::state::store::DashboardStore;
use kalshiguard::timeline::TimelineProvider;

use std::sync::Arc;
use tracing::{error, info, warn};

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

    info!("================================================");
    info!("  KALSHIGUARD — read-only dashboard v0.1.0");
    info!("================================================");

    config.validate()?;

    info!("Bot API:       {}", config.server.base_url);
    info!("Auth:          {}", if config.server.api_token.is_some() { "bearer" } else { "none" });
    info!("Poll interval: {}s", config.sync.poll_interval_secs);
    info!("Log level:     {}", config.telemetry.log_level);

    let client = DashboardClient::new(config.server.clone())?;
    let mut store = DashboardStore::new(Arc::new(client), config.sync.poll_interval());
    let timeline = TimelineProvider::new()
        .with_live(store.subscribe())
        .with_refresh_after(config.sync.timeline_refresh());

    let mut updates = store.subscribe();
    store.start();
    info!("Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                log_state(&state);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    store.stop();

    let widget = timeline.schedule_next_refresh(chrono::Utc::now());
    if let Some(entry) = widget.entries.first() {
        info!(
            "Widget: value=${} exposure=${} next refresh {}",
            entry.snapshot.portfolio.portfolio_value,
            entry.snapshot.portfolio.total_exposure,
            widget.next_refresh().format("%H:%M:%S")
        );
    }

    info!("KALSHIGUARD stopped.");
    Ok(())
}

/// Live view: one summary block per published state change.
fn log_state(state: &DashboardState) {
    if state.is_refreshing {
        return;
    }
    if let Some(err) = &state.last_error {
        error!("{err} — showing data from {}", state.snapshot.last_updated.format("%H:%M:%S"));
        return;
    }

    let snap = &state.snapshot;
    let p = &snap.portfolio;
    info!(
        "[{}] {} phase={} updated={}",
        p.risk_label(),
        snap.status,
        snap.phase,
        snap.last_updated.format("%H:%M:%S")
    );
    info!(
        "  value=${} day {} ${} ({}%) exposure=${} buying_power=${}",
        p.portfolio_value,
        if p.is_up_today() { "up" } else { "down" },
        p.daily_pnl,
        p.daily_pnl_percent,
        p.total_exposure,
        p.buying_power
    );
    if p.live_trading {
        warn!("  LIVE TRADING — real capital at risk");
    }
    for pos in snap.top_positions(5) {
        info!(
            "  {} {} {} x{} avg={} mark={} value=${} upnl={} conf={}",
            if pos.is_winning() { "+" } else { "-" },
            pos.ticker,
            pos.side,
            pos.contracts,
            pos.avg_price,
            pos.mark_price,
            pos.market_value(),
            pos.unrealized_pnl,
            pos.confidence
        );
    }
    if let Some(point) = snap.latest_equity() {
        info!("  equity={} ({} points)", point.value, snap.history.len());
    }
}
