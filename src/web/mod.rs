//! Local capture server: proxies the Hevy API and serves the export routes.

mod error;
mod handlers;
mod routes;
mod server;
mod state;

pub use error::WebError;
pub use handlers::export::SAMPLE_COUNT_HEADER;
pub use server::{build_router, run_server, ServerConfig, CONTROL_PREFIX};
pub use state::WebAppState;
