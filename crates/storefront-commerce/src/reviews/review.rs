//! Review types and submission validation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{CommerceError, CommerceResult};
use crate::ids::{ProductId, ReviewId};

/// Minimum length of a trimmed comment, in characters.
pub const MIN_COMMENT_LEN: usize = 10;

/// A star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Accept only whole stars in range.
    pub fn new(stars: i64) -> Option<Self> {
        (i64::from(Self::MIN)..=i64::from(Self::MAX))
            .contains(&stars)
            .then(|| Self(stars as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A stored review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub user_name: String,
    pub rating: u8,
    pub comment: String,
    /// RFC 3339 UTC timestamp assigned by the server.
    pub created_at: String,
}

/// A review as submitted by a client, before validation.
///
/// `product_id` and `rating` are kept as raw JSON so that both numbers and
/// numeric strings are accepted, as browser forms send either. Text fields
/// read `null` as empty and scalars as their text, so every payload reaches
/// the ordered field checks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubmitReview {
    #[serde(default)]
    pub product_id: JsonValue,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_name: String,
    #[serde(default)]
    pub rating: JsonValue,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => s,
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => String::new(),
    })
}

/// A submission that passed every field check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidReview {
    pub product_id: ProductId,
    pub rating: Rating,
    pub user_name: String,
    pub comment: String,
}

impl SubmitReview {
    /// Check the fields in order; the first failure is returned.
    ///
    /// Product existence is checked later, against storage.
    pub fn validate(&self) -> CommerceResult<ValidReview> {
        let product_id = json_integer(&self.product_id)
            .and_then(ProductId::parse_positive)
            .ok_or(CommerceError::InvalidProduct)?;

        let rating = json_integer(&self.rating)
            .and_then(Rating::new)
            .ok_or(CommerceError::InvalidRating)?;

        let comment = self.comment.trim();
        if comment.chars().count() < MIN_COMMENT_LEN {
            return Err(CommerceError::CommentTooShort {
                min: MIN_COMMENT_LEN,
            });
        }

        let user_name = self.user_name.trim();
        if user_name.is_empty() {
            return Err(CommerceError::MissingName);
        }

        Ok(ValidReview {
            product_id,
            rating,
            user_name: user_name.to_string(),
            comment: comment.to_string(),
        })
    }
}

/// Parse a product id given as text (query string or path segment).
///
/// Missing, non-numeric and non-positive ids are all `InvalidProductId`.
pub fn parse_product_id(raw: Option<&str>) -> CommerceResult<ProductId> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(ProductId::parse_positive)
        .ok_or(CommerceError::InvalidProductId)
}

/// Read a whole number from a JSON number or numeric string.
fn json_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
