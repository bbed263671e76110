//! Network interception
//!
//! Completed HTTP exchanges are handed to [`ResponseHook`]s from two request
//! mechanisms: the awaitable [`CapturingClient`] and the event-driven
//! [`ExchangeProxy`]. Hooks only observe; what the requester receives is
//! never altered.

mod client;
mod interceptor;
mod proxy;

use axum::body::Bytes;
use axum::http::{Method, StatusCode};

pub use client::{CapturingClient, FetchedResponse};
pub use interceptor::{InspectOutcome, WorkoutInterceptor, DEFAULT_TARGET_PREFIX};
pub use proxy::{ExchangeProxy, ProxyError};

/// A completed request/response pair
#[derive(Debug, Clone)]
pub struct Exchange {
    pub method: Method,
    /// URL as requested
    pub url: String,
    pub status: StatusCode,
    pub body: Bytes,
}

/// Observer of completed exchanges.
///
/// `on_response` runs once per exchange. It must return quickly and must
/// not panic; failures are swallowed inside the hook.
pub trait ResponseHook: Send + Sync {
    fn on_response(&self, exchange: &Exchange);
}
