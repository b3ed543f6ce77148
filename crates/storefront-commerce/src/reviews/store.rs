//! Review queries and the aggregate recompute.

use storefront_db::{params, Db, Queryable, Value};

use crate::catalog::store as catalog;
use crate::error::{CommerceError, CommerceResult};
use crate::ids::{ProductId, ReviewId};
use crate::reviews::{RatingSummary, Review, ValidReview};
use crate::storage::timestamp_now;

/// Insert a validated review for an existing product.
///
/// Runs in its own write transaction: the existence check and the insert
/// see the same catalog state. The timestamp never goes below the newest
/// stored one, so listing order follows insertion even across clock steps.
pub(crate) fn insert_review(db: &Db, review: &ValidReview) -> CommerceResult<Review> {
    db.transaction(|tx| {
        if !catalog::product_exists(tx, review.product_id)? {
            return Err(CommerceError::ProductNotFound(review.product_id));
        }

        let created_at = next_timestamp(tx)?;
        let id = tx.insert(
            "INSERT INTO product_reviews (product_id, user_name, rating, comment, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                review.product_id,
                &review.user_name,
                review.rating.get(),
                &review.comment,
                &created_at
            ],
        )?;

        Ok(Review {
            id: ReviewId::new(id),
            product_id: review.product_id,
            user_name: review.user_name.clone(),
            rating: review.rating.get(),
            comment: review.comment.clone(),
            created_at,
        })
    })
}

fn next_timestamp(q: &impl Queryable) -> CommerceResult<String> {
    let now = timestamp_now();
    let latest = q.query_scalar("SELECT MAX(created_at) FROM product_reviews", &[])?;
    Ok(match latest {
        Some(Value::Text(latest)) if latest > now => latest,
        _ => now,
    })
}

/// Reviews of a product, newest first; ties go to the later insert.
pub(crate) fn list_reviews(q: &impl Queryable, product_id: ProductId) -> CommerceResult<Vec<Review>> {
    Ok(q.query_as(
        "SELECT id, product_id, user_name, rating, comment, created_at
         FROM product_reviews
         WHERE product_id = ?
         ORDER BY created_at DESC, id DESC",
        params![product_id],
    )?)
}

/// Sum and count of the stored ratings for a product.
pub(crate) fn aggregate_rating(q: &impl Queryable, product_id: ProductId) -> CommerceResult<RatingSummary> {
    let result = q.query(
        "SELECT COALESCE(SUM(rating), 0), COUNT(*) FROM product_reviews WHERE product_id = ?",
        params![product_id],
    )?;
    let row = result.first();
    let column = |i| {
        row.and_then(|r| r.get_index(i))
            .and_then(Value::as_integer)
            .unwrap_or(0)
            .max(0) as u64
    };
    Ok(RatingSummary::from_totals(column(0), column(1)))
}

/// Recompute a product's cached rating from its reviews and store it.
///
/// Must run inside a write transaction so no review can land between the
/// read and the update.
pub(crate) fn refresh_aggregate(q: &impl Queryable, product_id: ProductId) -> CommerceResult<RatingSummary> {
    let summary = aggregate_rating(q, product_id)?;
    catalog::update_product_rating(q, product_id, &summary)?;
    Ok(summary)
}

/// [`refresh_aggregate`] in its own write transaction.
pub(crate) fn recompute(db: &Db, product_id: ProductId) -> CommerceResult<RatingSummary> {
    db.transaction(|tx| refresh_aggregate(tx, product_id))
}
