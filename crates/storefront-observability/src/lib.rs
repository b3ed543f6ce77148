//! Observability infrastructure for the storefront services.
//!
//! This crate provides:
//! - `RequestId` - Unique request identifier, propagated as `x-request-id`
//! - `LoggingConfig` - Level and output format for the `tracing` subscriber
//! - `init_logging` - One-time subscriber installation for binaries

mod logging;
mod request_id;

pub use logging::*;
pub use request_id::*;
