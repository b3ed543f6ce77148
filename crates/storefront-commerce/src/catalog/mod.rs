//! Product catalog module.
//!
//! Products carry a cached aggregate rating that only the review workflow
//! writes, plus an availability flag toggled by operators.

mod product;
mod service;
pub(crate) mod store;

pub use product::{NewProduct, Product};
pub use service::CatalogService;
