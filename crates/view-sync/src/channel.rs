//! Realtime channels delivering "data changed" notifications.

use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, warn};
use reqwest::header::{HeaderValue, ACCEPT, CACHE_CONTROL};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::error::{Result, ViewSyncError};
use crate::sse::{SseDecoder, SseFrame};

/// Path of the server's event stream, relative to its origin.
pub const EVENTS_STREAM_PATH: &str = "/events/stream";

/// A zero-payload "something changed" signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Notification;

/// Named event as published by the server. Only the name matters here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerEvent {
    pub name: String,
}

impl ServerEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn from_frame(frame: SseFrame) -> Self {
        Self { name: frame.event }
    }
}

/// Stream of notifications for one event name.
///
/// Ends when the underlying channel closes. Dropping it stops forwarding.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<Notification>,
    forwarder: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn new(receiver: mpsc::UnboundedReceiver<Notification>) -> Self {
        Self {
            receiver,
            forwarder: None,
        }
    }

    fn with_forwarder(
        receiver: mpsc::UnboundedReceiver<Notification>,
        forwarder: JoinHandle<()>,
    ) -> Self {
        Self {
            receiver,
            forwarder: Some(forwarder),
        }
    }

    pub async fn next(&mut self) -> Option<Notification> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

/// Shared realtime channel that can deliver named events.
///
/// Reconnection and backoff, if any, belong to the implementation.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    async fn subscribe(&self, event_name: &str) -> Result<Subscription>;
}

/// Forward one event if it matches. Returns false once the subscriber is gone.
fn forward(event: &ServerEvent, event_name: &str, tx: &mpsc::UnboundedSender<Notification>) -> bool {
    if event.name != event_name {
        return true;
    }
    tx.send(Notification).is_ok()
}

/// Lightweight in-process broadcast bus of server events.
#[derive(Clone, Debug)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: ServerEvent) {
        // No subscribers is fine.
        let _ = self.sender.send(event);
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl RealtimeChannel for EventBus {
    async fn subscribe(&self, event_name: &str) -> Result<Subscription> {
        let mut receiver = self.sender.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let event_name = event_name.to_string();

        let forwarder = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if !forward(&event, &event_name, &tx) {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Notifications carry nothing, one stands in for the missed batch.
                        warn!("Event bus lagged, {} event(s) missed", missed);
                        if tx.send(Notification).is_err() {
                            return;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => return,
                }
            }
        });

        Ok(Subscription::with_forwarder(rx, forwarder))
    }
}

/// Realtime channel reading the server's Server-Sent-Events stream.
#[derive(Debug, Clone)]
pub struct SseChannel {
    client: reqwest::Client,
    stream_url: String,
}

impl SseChannel {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// The client must not carry a total request timeout, the stream is long-lived.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            stream_url: format!("{}{}", base_url.trim_end_matches('/'), EVENTS_STREAM_PATH),
        }
    }

    pub fn stream_url(&self) -> &str {
        &self.stream_url
    }
}

#[async_trait]
impl RealtimeChannel for SseChannel {
    async fn subscribe(&self, event_name: &str) -> Result<Subscription> {
        let response = self
            .client
            .get(&self.stream_url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .header(CACHE_CONTROL, HeaderValue::from_static("no-cache"))
            .send()
            .await
            .map_err(|e| ViewSyncError::transport_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ViewSyncError::transport_unavailable(format!(
                "{} answered {}",
                self.stream_url, status
            )));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let event_name = event_name.to_string();
        let stream_url = self.stream_url.clone();
        let mut stream = response.bytes_stream();

        let forwarder = tokio::spawn(async move {
            let mut decoder = SseDecoder::new();
            while let Some(chunk) = stream.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!("Event stream {} failed: {}", stream_url, e);
                        return;
                    }
                };
                for frame in decoder.push(&bytes) {
                    if !forward(&ServerEvent::from_frame(frame), &event_name, &tx) {
                        return;
                    }
                }
            }
            debug!("Event stream {} ended", stream_url);
        });

        Ok(Subscription::with_forwarder(rx, forwarder))
    }
}
