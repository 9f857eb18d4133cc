mod config;
mod page;

use std::sync::Arc;

use config::Config;
use orderdesk_view_sync::{BannerFlag, HttpPartialFetcher, SseChannel, ViewSyncClient};
use page::AgentPage;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let log_format = std::env::var("OD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();

    let sync_config = config.view_sync();
    let page = Arc::new(AgentPage::new(
        &config.page_url,
        &sync_config.region_id,
        config.output.clone(),
    )?);
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let fetcher = Arc::new(HttpPartialFetcher::with_client(http, &sync_config));
    let banner = BannerFlag::new(config.banner_active);
    let client = ViewSyncClient::new(sync_config.clone(), page, fetcher, banner);

    tracing::info!(
        "Mirroring '{}' of {} into {}",
        sync_config.region_id,
        config.page_url,
        config.output.display()
    );
    let outcome = client.refresh_cycle().await;
    tracing::info!("Initial refresh: {:?}", outcome);

    let channel = SseChannel::new(&config.server_url);
    tracing::info!("Subscribing to '{}' at {}", sync_config.event_name, channel.stream_url());
    let mut listener = client.listen(Some(&channel)).await;
    if !listener.is_active() {
        tracing::warn!("Event stream unavailable, waiting for Ctrl-C");
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    listener.stop();
    Ok(())
}
