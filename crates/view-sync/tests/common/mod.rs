//! Test server standing in for the orders application.

#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::{header::CACHE_CONTROL, HeaderMap, StatusCode},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;

/// What the partial endpoint saw for one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub query: Option<String>,
    pub cache_control: Option<String>,
    pub pragma: Option<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
    pub status: Arc<Mutex<StatusCode>>,
    pub events: broadcast::Sender<&'static str>,
}

impl ServerState {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            seen: Arc::new(Mutex::new(Vec::new())),
            status: Arc::new(Mutex::new(StatusCode::OK)),
            events,
        }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn set_status(&self, status: StatusCode) {
        *self.status.lock().unwrap() = status;
    }

    pub fn emit(&self, name: &'static str) {
        let _ = self.events.send(name);
    }
}

async fn orders_table(
    State(state): State<ServerState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let header = |name: axum::http::header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.seen.lock().unwrap().push(SeenRequest {
        query: query.clone(),
        cache_control: header(CACHE_CONTROL),
        pragma: header(axum::http::header::PRAGMA),
    });

    let status = *state.status.lock().unwrap();
    if status != StatusCode::OK {
        return (status, "<p>error</p>".to_string());
    }
    let filter = query.unwrap_or_default();
    (
        StatusCode::OK,
        format!("<tr data-filter=\"{}\"><td>#1</td></tr>", filter),
    )
}

async fn stream_events(
    State(state): State<ServerState>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.events.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(name) => Some(Ok(SseEvent::default().event(name).data("null"))),
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_millis(50))
            .text("keep-alive"),
    )
}

/// Start the server on an ephemeral port and return its origin.
pub async fn spawn_server(state: ServerState) -> String {
    let router = Router::new()
        .route("/_partial/orders_table", get(orders_table))
        .route("/events/stream", get(stream_events))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Origin on which nothing listens.
pub async fn dead_origin() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
