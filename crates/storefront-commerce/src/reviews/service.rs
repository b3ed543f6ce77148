//! Review submission and listing.

use serde::Serialize;
use storefront_db::Db;
use tracing::{debug, error, info, warn};

use crate::catalog::store as catalog;
use crate::error::{CommerceError, CommerceResult, ErrorKind};
use crate::ids::{ProductId, ReviewId};
use crate::reviews::{store, ProductReviews, RatingSummary, SubmitReview};
use crate::storage::{bounded, run_to_completion, StoragePolicy};

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReceipt {
    pub review_id: ReviewId,
    pub product_id: ProductId,
    /// The product's aggregate after this review was counted.
    #[serde(flatten)]
    pub summary: RatingSummary,
}

/// The review workflow.
#[derive(Debug, Clone)]
pub struct ReviewService {
    db: Db,
    policy: StoragePolicy,
}

impl ReviewService {
    pub fn new(db: Db, policy: StoragePolicy) -> Self {
        Self { db, policy }
    }

    /// Validate, store and aggregate a review.
    ///
    /// Validation failures return before storage is touched. Once the
    /// review is committed, a failed recompute is reported as
    /// `AggregateUpdateFailed` carrying the new review id, never as a
    /// failed submission; [`ReviewService::recompute`] repairs it.
    pub async fn submit(&self, input: SubmitReview) -> CommerceResult<ReviewReceipt> {
        let review = input.validate().inspect_err(|e| {
            debug!(code = e.code(), "review rejected: {e}");
        })?;
        let product_id = review.product_id;

        // The insert is not abandoned on timeout: its outcome decides
        // between a failed submission and a stale aggregate.
        let stored = run_to_completion(&self.db, "insert_review", move |db| {
            store::insert_review(db, &review)
        })
        .await
        .inspect_err(|e| log_failure("insert_review", product_id, e))?;

        let review_id = stored.id;
        info!(%product_id, %review_id, rating = stored.rating, "review stored");

        let summary = bounded(&self.db, self.policy, "recompute_rating", move |db| {
            store::recompute(db, product_id)
        })
        .await
        .map_err(|e| {
            let stale = CommerceError::AggregateUpdateFailed {
                review_id,
                product_id,
                reason: e.to_string(),
            };
            log_failure("recompute_rating", product_id, &stale);
            stale
        })?;

        debug!(
            %product_id,
            average = ?summary.average,
            total = summary.total,
            "product rating refreshed"
        );

        Ok(ReviewReceipt {
            review_id,
            product_id,
            summary,
        })
    }

    /// Reviews of a product, newest first, with the mean and count.
    ///
    /// A product with no reviews (or no such product) yields an empty list
    /// and an absent average.
    pub async fn list(&self, product_id: ProductId) -> CommerceResult<ProductReviews> {
        let reviews = bounded(&self.db, self.policy, "list_reviews", move |db| {
            store::list_reviews(db, product_id)
        })
        .await
        .inspect_err(|e| log_failure("list_reviews", product_id, e))?;

        Ok(ProductReviews::new(reviews))
    }

    /// Recompute one product's cached rating from its stored reviews.
    ///
    /// Idempotent: without new reviews, repeated calls store the same value.
    pub async fn recompute(&self, product_id: ProductId) -> CommerceResult<RatingSummary> {
        let summary = bounded(&self.db, self.policy, "recompute_rating", move |db| {
            store::recompute(db, product_id)
        })
        .await
        .inspect_err(|e| log_failure("recompute_rating", product_id, e))?;

        info!(%product_id, average = ?summary.average, total = summary.total, "rating recomputed");
        Ok(summary)
    }

    /// Recompute every product's cached rating.
    ///
    /// Each product is refreshed in its own transaction, in id order.
    /// `on_progress(done, total)` is called after each product.
    pub async fn recompute_all<F>(&self, mut on_progress: F) -> CommerceResult<Vec<(ProductId, RatingSummary)>>
    where
        F: FnMut(usize, usize),
    {
        let ids = bounded(&self.db, self.policy, "product_ids", |db| catalog::product_ids(db)).await?;

        let total = ids.len();
        let mut results = Vec::with_capacity(total);
        for id in ids {
            let summary = self.recompute(id).await?;
            results.push((id, summary));
            on_progress(results.len(), total);
        }
        Ok(results)
    }
}

fn log_failure(op: &'static str, product_id: ProductId, err: &CommerceError) {
    match err.kind() {
        ErrorKind::Validation => debug!(op, %product_id, code = err.code(), "{err}"),
        ErrorKind::NotFound => info!(op, %product_id, code = err.code(), "{err}"),
        ErrorKind::Consistency => warn!(op, %product_id, code = err.code(), "{err}"),
        ErrorKind::Storage => error!(op, %product_id, code = err.code(), "{err}"),
    }
}
