//! Catalog queries.
//!
//! Functions take any [`Queryable`] so the review workflow can run them
//! inside its own transactions.

use storefront_db::{params, Queryable};

use crate::catalog::{NewProduct, Product};
use crate::error::{CommerceError, CommerceResult};
use crate::ids::ProductId;
use crate::reviews::RatingSummary;

const PRODUCT_COLUMNS: &str = "id, name, category, price, rating, review_count, tag, image, \
                               description, stock, is_available";

/// All products ordered by id ascending.
pub(crate) fn list_products(q: &impl Queryable) -> CommerceResult<Vec<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC");
    Ok(q.query_as(&sql, &[])?)
}

pub(crate) fn get_product(q: &impl Queryable, id: ProductId) -> CommerceResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?");
    Ok(q.query_optional(&sql, params![id])?)
}

pub(crate) fn product_exists(q: &impl Queryable, id: ProductId) -> CommerceResult<bool> {
    let found = q.query_scalar("SELECT 1 FROM products WHERE id = ?", params![id])?;
    Ok(found.is_some())
}

pub(crate) fn product_ids(q: &impl Queryable) -> CommerceResult<Vec<ProductId>> {
    let result = q.query("SELECT id FROM products ORDER BY id ASC", &[])?;
    Ok(result
        .iter()
        .filter_map(|row| row.get_index(0).and_then(|v| v.as_integer()))
        .map(ProductId::new)
        .collect())
}

/// Store a freshly computed aggregate on the product row.
///
/// Only the review workflow calls this; it must hold the write transaction
/// in which `summary` was read.
pub(crate) fn update_product_rating(
    q: &impl Queryable,
    id: ProductId,
    summary: &RatingSummary,
) -> CommerceResult<()> {
    let changed = q.execute(
        "UPDATE products SET rating = ?, review_count = ? WHERE id = ?",
        params![summary.average, summary.total as i64, id],
    )?;
    if changed == 0 {
        return Err(CommerceError::ProductNotFound(id));
    }
    Ok(())
}

pub(crate) fn set_availability(
    q: &impl Queryable,
    id: ProductId,
    available: bool,
) -> CommerceResult<()> {
    let changed = q.execute(
        "UPDATE products SET is_available = ? WHERE id = ?",
        params![available, id],
    )?;
    if changed == 0 {
        return Err(CommerceError::ProductNotFound(id));
    }
    Ok(())
}

pub(crate) fn insert_product(q: &impl Queryable, entry: &NewProduct) -> CommerceResult<ProductId> {
    let id = q.insert(
        "INSERT INTO products (name, category, price, tag, image, description, stock, is_available)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            &entry.name,
            &entry.category,
            entry.price,
            &entry.tag,
            &entry.image,
            &entry.description,
            entry.stock,
            entry.available
        ],
    )?;
    Ok(ProductId::new(id))
}
