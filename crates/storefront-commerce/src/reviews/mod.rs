//! Product reviews and rating aggregation.
//!
//! A submission is validated field by field (first failure wins), stored,
//! and then the product's cached rating is recomputed from every stored
//! review inside one write transaction. Recomputation never uses a running
//! average, so repeating it always converges on the same value.

mod review;
mod service;
pub(crate) mod store;
mod summary;

pub use review::{parse_product_id, Rating, Review, SubmitReview, ValidReview, MIN_COMMENT_LEN};
pub use service::{ReviewReceipt, ReviewService};
pub use summary::{ProductReviews, RatingSummary};
