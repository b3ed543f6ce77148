//! Aggregate rating computation.

use serde::{Deserialize, Serialize};

use crate::reviews::Review;

/// Mean rating and review count for one product.
///
/// `average` is `None` when there are no reviews; it is never stored or
/// serialized as `0.0` in that case.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    #[serde(rename = "average_rating")]
    pub average: Option<f64>,
    #[serde(rename = "total_reviews")]
    pub total: u64,
}

impl RatingSummary {
    /// Summary of a product without reviews.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from the sum and count of star ratings.
    ///
    /// The mean is rounded half-up to one decimal using integer arithmetic,
    /// so 4.25 becomes 4.3 regardless of float representation.
    pub fn from_totals(sum: u64, count: u64) -> Self {
        if count == 0 {
            return Self::empty();
        }
        let tenths = (20 * sum + count) / (2 * count);
        Self {
            average: Some(tenths as f64 / 10.0),
            total: count,
        }
    }

    /// Build from a slice of reviews.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let sum = reviews.iter().map(|r| u64::from(r.rating)).sum();
        Self::from_totals(sum, reviews.len() as u64)
    }

    pub fn has_reviews(&self) -> bool {
        self.total > 0
    }

    /// Average for display, with `0.0` standing in for "no reviews".
    pub fn display_average(&self) -> f64 {
        self.average.unwrap_or(0.0)
    }
}

/// Reviews of one product, newest first, with their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductReviews {
    pub reviews: Vec<Review>,
    #[serde(flatten)]
    pub summary: RatingSummary,
}

impl ProductReviews {
    /// Wrap an ordered list; the summary is derived from the same rows.
    pub fn new(reviews: Vec<Review>) -> Self {
        let summary = RatingSummary::from_reviews(&reviews);
        Self { reviews, summary }
    }
}
