//! Catalog endpoints.

use axum::extract::State;
use axum::Json;
use storefront_commerce::catalog::Product;

use crate::error::ApiResult;
use crate::state::AppState;

/// List all products: `GET /api/products`
///
/// A bare array ordered by id, each product with its cached rating
/// (`null` while unreviewed) and availability flag.
pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog.list_products().await?))
}
