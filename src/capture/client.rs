use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use reqwest::{Client, Request, RequestBuilder};
use serde::de::DeserializeOwned;

use super::{Exchange, ResponseHook};

/// A buffered response handed back to the caller of [`CapturingClient::fetch`]
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    /// Final URL after redirects
    pub url: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl FetchedResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

/// Awaitable HTTP client whose responses are shown to registered hooks.
///
/// The body is buffered once; hooks see a copy and the caller receives the
/// response exactly as the server sent it.
#[derive(Clone)]
pub struct CapturingClient {
    inner: Client,
    hooks: Vec<Arc<dyn ResponseHook>>,
}

impl CapturingClient {
    pub fn new(inner: Client) -> Self {
        Self {
            inner,
            hooks: Vec::new(),
        }
    }

    pub fn with_hook(mut self, hook: Arc<dyn ResponseHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.inner.get(url)
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Build and fetch a request prepared with [`get`](Self::get) or
    /// [`request`](Self::request).
    pub async fn send(&self, builder: RequestBuilder) -> reqwest::Result<FetchedResponse> {
        self.fetch(builder.build()?).await
    }

    /// Execute `request`, then run every hook on the completed exchange.
    ///
    /// Transport errors are returned untouched and no hook runs.
    pub async fn fetch(&self, request: Request) -> reqwest::Result<FetchedResponse> {
        let method = request.method().clone();
        let requested_url = request.url().to_string();

        let response = self.inner.execute(request).await?;
        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if !self.hooks.is_empty() {
            let exchange = Exchange {
                method,
                url: requested_url,
                status,
                body: body.clone(),
            };
            for hook in &self.hooks {
                hook.on_response(&exchange);
            }
        }

        Ok(FetchedResponse {
            status,
            url,
            headers,
            body,
        })
    }
}
