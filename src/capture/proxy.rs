use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{Exchange, ResponseHook};

/// Exchanges a slow listener may fall behind by before older ones are dropped
const EVENT_CAPACITY: usize = 1024;
const MAX_REQUEST_BODY: usize = 16 * 1024 * 1024;

/// Connection-scoped headers that must not be forwarded
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Failed to read request body: {0}")]
    RequestBody(#[from] axum::Error),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Proxy request failed");
        let status = match self {
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

/// Reverse proxy that forwards requests to an upstream and announces every
/// completed exchange as a load event.
///
/// Listeners attached with [`spawn_listener`](Self::spawn_listener) run on
/// their own tasks, so inspection never delays the proxied response.
#[derive(Debug, Clone)]
pub struct ExchangeProxy {
    client: reqwest::Client,
    upstream: Arc<str>,
    events: broadcast::Sender<Arc<Exchange>>,
}

impl ExchangeProxy {
    pub fn new(client: reqwest::Client, upstream: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client,
            upstream: Arc::from(upstream.trim_end_matches('/')),
            events,
        }
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Subscribe to load events. Only exchanges completed after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Exchange>> {
        self.events.subscribe()
    }

    /// Run `hook` for every load event until `cancel` fires.
    pub fn spawn_listener(
        &self,
        hook: Arc<dyn ResponseHook>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let mut events = self.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => match event {
                        Ok(exchange) => hook.on_response(&exchange),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Exchange listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }

    /// Upstream URL for a request path such as `/workout/abc?x=1`
    pub fn upstream_url(&self, uri: &Uri) -> String {
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        format!("{}{}", self.upstream, path_and_query)
    }

    /// Forward one request and return the upstream response unchanged.
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();
        let url = self.upstream_url(&parts.uri);
        let body = axum::body::to_bytes(body, MAX_REQUEST_BODY).await?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        // Ask for an identity-encoded body so it can be inspected
        headers.remove(header::ACCEPT_ENCODING);

        let upstream = self
            .client
            .request(parts.method.clone(), &url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = upstream.status();
        let mut response_headers = upstream.headers().clone();
        strip_hop_by_hop(&mut response_headers);
        response_headers.remove(header::CONTENT_LENGTH);
        let body: Bytes = upstream.bytes().await?;

        tracing::debug!(method = %parts.method, url = %url, status = %status, "Proxied request");
        // No subscribers is fine
        let _ = self.events.send(Arc::new(Exchange {
            method: parts.method,
            url,
            status,
            body: body.clone(),
        }));

        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;
        *response.headers_mut() = response_headers;
        Ok(response)
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}
