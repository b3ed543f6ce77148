//! HTTP route handlers.
//!
//! - `health` - Liveness and database readiness
//! - `products` - Catalog listing
//! - `reviews` - Review submission and listing
//! - `contact` - Contact form

pub mod contact;
pub mod health;
pub mod products;
pub mod reviews;
