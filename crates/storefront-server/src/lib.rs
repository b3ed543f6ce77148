//! HTTP API for the storefront.
//!
//! Binds the catalog, review and contact operations of
//! `storefront-commerce` to JSON endpoints. Operator actions (catalog edits,
//! rating repair, reading messages) are not routed here; the `storefront`
//! CLI provides them.

pub mod app;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use app::{create_app, serve, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
