//! HTTP handlers for the capture server control routes.

pub mod export;
pub mod status;
