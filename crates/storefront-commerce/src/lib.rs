//! Storefront domain: catalog, product reviews and contact messages.
//!
//! This crate owns the business rules of the storefront:
//!
//! - **Catalog**: Products with a cached aggregate rating and availability flag
//! - **Reviews**: Validated submission and ordered listing, keeping each
//!   product's cached rating equal to the rounded mean of its reviews
//! - **Contact**: Customer messages left through the contact form
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_commerce::prelude::*;
//! use storefront_db::Db;
//!
//! let db = Db::open("storefront.db")?;
//! schema::migrate(&db)?;
//!
//! let reviews = ReviewService::new(db.clone(), StoragePolicy::default());
//! let receipt = reviews.submit(SubmitReview {
//!     product_id: 1.into(),
//!     user_name: "Ada".into(),
//!     rating: 5.into(),
//!     comment: "Sounds great in a small room.".into(),
//! }).await?;
//!
//! let listing = reviews.list(receipt.product_id).await?;
//! println!("{} reviews, average {:?}", listing.summary.total, listing.summary.average);
//! ```

pub mod error;
pub mod ids;
pub mod schema;
pub mod storage;

pub mod catalog;
pub mod contact;
pub mod reviews;

pub use error::{CommerceError, CommerceResult, ErrorKind};
pub use ids::*;
pub use storage::StoragePolicy;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, CommerceResult, ErrorKind};
    pub use crate::ids::*;
    pub use crate::schema;
    pub use crate::storage::StoragePolicy;

    // Catalog
    pub use crate::catalog::{CatalogService, NewProduct, Product};

    // Reviews
    pub use crate::reviews::{
        ProductReviews, Rating, RatingSummary, Review, ReviewReceipt, ReviewService,
        SubmitReview, MIN_COMMENT_LEN,
    };

    // Contact
    pub use crate::contact::{ContactMessage, ContactService, NewContactMessage};
}
