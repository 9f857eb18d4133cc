mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use orderdesk_view_sync::{
    BannerFlag, CycleOutcome, HttpPartialFetcher, MemoryPage, MemoryRegion, RealtimeChannel,
    SkipReason, SseChannel, ViewSyncClient, ViewSyncConfig, ViewSyncError,
};

use common::{dead_origin, spawn_server, ServerState};

fn client_for(origin: &str, page: Arc<MemoryPage>) -> ViewSyncClient {
    let config = ViewSyncConfig::new(origin);
    let fetcher = Arc::new(HttpPartialFetcher::new(&config));
    ViewSyncClient::new(config, page, fetcher, BannerFlag::default())
}

async fn wait_for_swaps(region: &MemoryRegion, count: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while region.swap_count() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("region was not refreshed in time");
}

#[tokio::test]
async fn test_push_event_refreshes_region() {
    let state = ServerState::new();
    let origin = spawn_server(state.clone()).await;
    let page = Arc::new(MemoryPage::new(&format!("{}/?status=open", origin)).unwrap());
    let region = page.mount_region_with("orders-body", "<tr><td>stale</td></tr>");
    let client = client_for(&origin, page.clone());

    let channel = SseChannel::new(&origin);
    let handle = client.listen(Some(&channel)).await;
    assert!(handle.is_active());

    state.emit("order_update");
    wait_for_swaps(&region, 1).await;

    assert_eq!(
        region.content(),
        "<tr data-filter=\"status=open\"><td>#1</td></tr>"
    );
    assert_eq!(state.seen()[0].query.as_deref(), Some("status=open"));
}

#[tokio::test]
async fn test_other_events_are_ignored() {
    let state = ServerState::new();
    let origin = spawn_server(state.clone()).await;
    let page = Arc::new(MemoryPage::new(&format!("{}/", origin)).unwrap());
    let region = page.mount_region("orders-body");
    let client = client_for(&origin, page.clone());

    let channel = SseChannel::new(&origin);
    let _handle = client.listen(Some(&channel)).await;

    state.emit("product_update");
    state.emit("order_update");
    wait_for_swaps(&region, 1).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(state.seen().len(), 1);
}

#[tokio::test]
async fn test_page_without_region_never_fetches() {
    let state = ServerState::new();
    let origin = spawn_server(state.clone()).await;
    let page = Arc::new(MemoryPage::new(&format!("{}/stats", origin)).unwrap());
    let client = client_for(&origin, page.clone());

    let channel = SseChannel::new(&origin);
    let _handle = client.listen(Some(&channel)).await;

    for _ in 0..3 {
        state.emit("order_update");
    }
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(state.seen().is_empty());
}

#[tokio::test]
async fn test_server_error_keeps_region() {
    let state = ServerState::new();
    state.set_status(StatusCode::INTERNAL_SERVER_ERROR);
    let origin = spawn_server(state.clone()).await;
    let page = Arc::new(MemoryPage::new(&format!("{}/", origin)).unwrap());
    let region = page.mount_region_with("orders-body", "<tr>keep</tr>");
    let client = client_for(&origin, page.clone());

    let outcome = client.refresh_cycle().await;

    assert_eq!(outcome, CycleOutcome::Skipped(SkipReason::NonSuccessStatus(500)));
    assert_eq!(region.content(), "<tr>keep</tr>");
}

#[tokio::test]
async fn test_unreachable_server_keeps_region() {
    let origin = dead_origin().await;
    let page = Arc::new(MemoryPage::new(&format!("{}/", origin)).unwrap());
    let region = page.mount_region_with("orders-body", "<tr>keep</tr>");
    let client = client_for(&origin, page.clone());

    let outcome = client.refresh_cycle().await;

    assert_eq!(outcome, CycleOutcome::Skipped(SkipReason::FetchFailed));
    assert_eq!(region.content(), "<tr>keep</tr>");
}

#[tokio::test]
async fn test_unreachable_event_stream_leaves_client_inert() {
    let origin = dead_origin().await;
    let channel = SseChannel::new(&origin);

    let result = channel.subscribe("order_update").await;
    assert!(matches!(result, Err(ViewSyncError::TransportUnavailable(_))));

    let page = Arc::new(MemoryPage::new(&format!("{}/", origin)).unwrap());
    let client = client_for(&origin, page);
    let handle = client.listen(Some(&channel)).await;
    assert!(!handle.is_active());
}

#[tokio::test]
async fn test_missing_event_stream_endpoint_is_unavailable() {
    let state = ServerState::new();
    let origin = spawn_server(state).await;
    let channel = SseChannel::new(&format!("{}/nope", origin));

    let result = channel.subscribe("order_update").await;

    assert!(matches!(result, Err(ViewSyncError::TransportUnavailable(_))));
}

#[test]
fn test_sse_decoder_reexported_at_crate_root() {
    let mut decoder = orderdesk_view_sync::SseDecoder::new();
    let frames = decoder.push(b"event: order_update\ndata: null\n\n");
    assert_eq!(
        frames,
        vec![orderdesk_view_sync::SseFrame {
            event: "order_update".to_string(),
            data: "null".to_string(),
        }]
    );
}
