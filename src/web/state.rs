//! Shared state for the capture server.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::capture::{ExchangeProxy, WorkoutInterceptor};
use crate::config::Config;
use crate::export::ExportTrigger;
use crate::relay::{CapturedPayload, RelayChannel, RelaySender};
use crate::tcx::TcxSerializer;
use crate::visibility::{ExportControl, LocationWatcher, SharedLocation, VisibilityPolicy};

/// State handed to every handler.
///
/// The capture side (proxy listener + interceptor) only holds a relay sender;
/// the captured payload slot is written exclusively by the relay receiver.
#[derive(Clone)]
pub struct WebAppState {
    inner: Arc<WebAppInner>,
}

struct WebAppInner {
    config: Config,
    slot: Arc<CapturedPayload>,
    relay: RelayChannel,
    proxy: ExchangeProxy,
    interceptor: Arc<WorkoutInterceptor>,
    exporter: ExportTrigger,
    location: Arc<SharedLocation>,
    control: Arc<Mutex<ExportControl>>,
}

impl WebAppState {
    pub fn new(config: Config) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: Config, client: reqwest::Client) -> Self {
        let relay = RelayChannel::new();
        let proxy = ExchangeProxy::new(client, &config.capture.upstream);
        let interceptor = Arc::new(WorkoutInterceptor::new(
            config.capture.target_prefix.clone(),
            relay.sender(),
        ));
        let exporter = ExportTrigger::new(TcxSerializer::new(config.tcx.clone()));

        Self {
            inner: Arc::new(WebAppInner {
                config,
                slot: Arc::new(CapturedPayload::new()),
                relay,
                proxy,
                interceptor,
                exporter,
                location: Arc::new(SharedLocation::new()),
                control: Arc::new(Mutex::new(ExportControl::new())),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn slot(&self) -> &CapturedPayload {
        &self.inner.slot
    }

    /// Sender half of the relay, as held by the capture side.
    pub fn relay_sender(&self) -> RelaySender {
        self.inner.relay.sender()
    }

    pub fn proxy(&self) -> &ExchangeProxy {
        &self.inner.proxy
    }

    pub fn exporter(&self) -> &ExportTrigger {
        &self.inner.exporter
    }

    pub fn location(&self) -> &SharedLocation {
        &self.inner.location
    }

    pub fn control(&self) -> &Mutex<ExportControl> {
        &self.inner.control
    }

    /// Spawn the relay receiver, the proxy listener and the location watcher.
    ///
    /// All of them stop once `cancel` fires.
    pub fn start_background(&self, cancel: &CancellationToken) -> Vec<JoinHandle<()>> {
        let inner = &self.inner;

        let receiver = inner.relay.receiver(inner.slot.clone());
        let relay_task = tokio::spawn(receiver.run(cancel.clone()));

        let listener_task = inner
            .proxy
            .spawn_listener(inner.interceptor.clone(), cancel.clone());

        let watcher = LocationWatcher::new(
            inner.location.clone(),
            VisibilityPolicy::new(inner.config.visibility.workout_path_marker.clone()),
            inner.slot.clone(),
            inner.control.clone(),
        )
        .with_interval(inner.config.visibility.poll_interval);
        let watcher_task = tokio::spawn(watcher.run(cancel.clone()));

        tracing::debug!(
            upstream = %inner.proxy.upstream(),
            target_prefix = %inner.interceptor.target_prefix(),
            "Capture tasks started"
        );
        vec![relay_task, listener_task, watcher_task]
    }
}
