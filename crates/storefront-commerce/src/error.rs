//! Commerce error types.

use serde::Serialize;
use thiserror::Error;

use crate::ids::{MessageId, ProductId, ReviewId};

/// Broad classification of a [`CommerceError`].
///
/// Callers decide how to respond from the kind alone; the variant carries the
/// detail for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing input. Detected before any storage call.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// Connection, query or timeout failure.
    Storage,
    /// A review was stored but the cached aggregate was not updated.
    Consistency,
}

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Submitted product id is missing or not a positive integer.
    #[error("Invalid product ID")]
    InvalidProduct,

    /// Submitted rating is missing, non-integral or outside 1..=5.
    #[error("Invalid rating")]
    InvalidRating,

    /// Trimmed comment is shorter than the minimum.
    #[error("Comment must be at least {min} characters")]
    CommentTooShort { min: usize },

    /// Trimmed reviewer name is empty.
    #[error("Name is required")]
    MissingName,

    /// Listing was asked for without a positive product id.
    #[error("Invalid product ID")]
    InvalidProductId,

    /// A required contact field is empty.
    #[error("Contact field '{0}' is required")]
    InvalidContact(&'static str),

    /// Contact email is not a plausible address.
    #[error("Invalid email format")]
    InvalidEmail,

    /// Catalog entry failed validation.
    #[error("Invalid catalog entry: {0}")]
    InvalidCatalogEntry(String),

    /// Request body could not be decoded.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Contact message not found.
    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    /// Storage failed or did not answer in time.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The review persisted but the product's cached rating is stale.
    #[error("Review {review_id} stored but rating of product {product_id} not updated: {reason}")]
    AggregateUpdateFailed {
        review_id: ReviewId,
        product_id: ProductId,
        reason: String,
    },
}

impl CommerceError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CommerceError::InvalidProduct
            | CommerceError::InvalidRating
            | CommerceError::CommentTooShort { .. }
            | CommerceError::MissingName
            | CommerceError::InvalidProductId
            | CommerceError::InvalidContact(_)
            | CommerceError::InvalidEmail
            | CommerceError::InvalidCatalogEntry(_)
            | CommerceError::MalformedRequest(_) => ErrorKind::Validation,
            CommerceError::ProductNotFound(_) | CommerceError::MessageNotFound(_) => {
                ErrorKind::NotFound
            }
            CommerceError::StorageUnavailable(_) => ErrorKind::Storage,
            CommerceError::AggregateUpdateFailed { .. } => ErrorKind::Consistency,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            CommerceError::InvalidProduct => "invalid_product",
            CommerceError::InvalidRating => "invalid_rating",
            CommerceError::CommentTooShort { .. } => "comment_too_short",
            CommerceError::MissingName => "missing_name",
            CommerceError::InvalidProductId => "invalid_product_id",
            CommerceError::InvalidContact(_) => "invalid_contact",
            CommerceError::InvalidEmail => "invalid_email",
            CommerceError::InvalidCatalogEntry(_) => "invalid_catalog_entry",
            CommerceError::MalformedRequest(_) => "malformed_request",
            CommerceError::ProductNotFound(_) => "product_not_found",
            CommerceError::MessageNotFound(_) => "message_not_found",
            CommerceError::StorageUnavailable(_) => "storage_unavailable",
            CommerceError::AggregateUpdateFailed { .. } => "aggregate_update_failed",
        }
    }

    /// Message safe to show to callers.
    ///
    /// Validation messages are already free of internals and are returned
    /// as-is; storage and consistency failures get a generic description.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Validation => match self {
                CommerceError::InvalidCatalogEntry(_) => "Invalid catalog entry".to_string(),
                CommerceError::MalformedRequest(_) => "Malformed request body".to_string(),
                other => other.to_string(),
            },
            ErrorKind::NotFound => match self {
                CommerceError::MessageNotFound(_) => "Message not found".to_string(),
                _ => "Product not found".to_string(),
            },
            ErrorKind::Storage => "Storage is temporarily unavailable".to_string(),
            ErrorKind::Consistency => {
                "Review submitted; the product rating will be refreshed shortly".to_string()
            }
        }
    }
}

impl From<storefront_db::DbError> for CommerceError {
    fn from(e: storefront_db::DbError) -> Self {
        CommerceError::StorageUnavailable(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::MalformedRequest(e.to_string())
    }
}

/// Result alias for commerce operations.
pub type CommerceResult<T> = Result<T, CommerceError>;
