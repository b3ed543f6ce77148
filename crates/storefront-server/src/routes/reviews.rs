//! Review endpoints.
//!
//! - `POST /api/reviews` - Submit a review
//! - `GET /api/reviews?product_id=N` - Reviews of a product
//! - `GET /api/products/{id}/reviews` - Same, path form

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use storefront_commerce::reviews::{parse_product_id, ProductReviews, SubmitReview};
use storefront_commerce::ReviewId;

use crate::error::ApiResult;
use crate::state::AppState;

/// Successful submission response.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub review_id: ReviewId,
    pub average_rating: Option<f64>,
    pub total_reviews: u64,
}

/// Review listing response.
#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub success: bool,
    pub data: ProductReviews,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsQuery {
    pub product_id: Option<String>,
}

/// Submit a review: `POST /api/reviews`
///
/// 201 on success. When the review was stored but the product rating could
/// not be refreshed the error mapping answers 202 with a warning.
pub async fn submit_review(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReview>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<SubmitResponse>)> {
    let Json(input) = payload?;
    let receipt = state.reviews.submit(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            message: "Review submitted successfully",
            review_id: receipt.review_id,
            average_rating: receipt.summary.average,
            total_reviews: receipt.summary.total,
        }),
    ))
}

/// List reviews: `GET /api/reviews?product_id=N`
pub async fn list_reviews(
    State(state): State<AppState>,
    query: Result<Query<ReviewsQuery>, QueryRejection>,
) -> ApiResult<Json<ReviewsResponse>> {
    let Query(query) = query?;
    let product_id = parse_product_id(query.product_id.as_deref())?;
    respond(&state, product_id).await
}

/// List reviews: `GET /api/products/{id}/reviews`
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<ReviewsResponse>> {
    let product_id = parse_product_id(Some(&raw_id))?;
    respond(&state, product_id).await
}

async fn respond(
    state: &AppState,
    product_id: storefront_commerce::ProductId,
) -> ApiResult<Json<ReviewsResponse>> {
    let data = state.reviews.list(product_id).await?;
    Ok(Json(ReviewsResponse {
        success: true,
        data,
    }))
}
