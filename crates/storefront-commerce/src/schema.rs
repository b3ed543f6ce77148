//! Database schema and demo data.

use storefront_db::{params, Db, Queryable, Value};
use tracing::info;

use crate::catalog::{store as catalog, NewProduct};
use crate::error::CommerceResult;
use crate::ids::ProductId;
use crate::storage::timestamp_now;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    name          TEXT    NOT NULL,
    category      TEXT    NOT NULL,
    price         REAL    NOT NULL CHECK (price > 0),
    rating        REAL    CHECK (rating IS NULL OR (rating >= 0 AND rating <= 5)),
    review_count  INTEGER NOT NULL DEFAULT 0,
    tag           TEXT    NOT NULL DEFAULT '',
    image         TEXT    NOT NULL DEFAULT '',
    description   TEXT    NOT NULL DEFAULT '',
    stock         INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
    is_available  INTEGER NOT NULL DEFAULT 1 CHECK (is_available IN (0, 1))
);

CREATE TABLE IF NOT EXISTS product_reviews (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id  INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    user_name   TEXT    NOT NULL,
    rating      INTEGER NOT NULL CHECK (rating >= 1 AND rating <= 5),
    comment     TEXT    NOT NULL,
    created_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_product_reviews_product_created
    ON product_reviews (product_id, created_at);

CREATE TABLE IF NOT EXISTS contact_messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    subject     TEXT NOT NULL DEFAULT '',
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
"#;

/// Create all tables and indexes. Safe to run on every start.
pub fn migrate(db: &Db) -> CommerceResult<()> {
    db.execute_batch(SCHEMA)?;
    Ok(())
}

/// Demo catalog: (name, category, price, tag, stock).
const SAMPLE_PRODUCTS: &[(&str, &str, f64, &str, i64)] = &[
    ("Smart Speaker", "audio", 129.99, "Best seller", 42),
    ("Air Purifier", "home", 249.0, "New", 18),
    ("Fitness Band", "wearables", 79.5, "Trending", 65),
    ("Wireless Earbuds", "audio", 99.0, "", 30),
    ("Eco Sneakers", "fashion", 119.0, "Eco", 24),
];

/// Demo reviews: (index into SAMPLE_PRODUCTS, author, stars, comment).
const SAMPLE_REVIEWS: &[(usize, &str, u8, &str)] = &[
    (0, "John Doe", 5, "Excellent sound quality! Best speaker I have ever owned."),
    (0, "Sarah Smith", 4, "Great product but a bit pricey. Worth it though!"),
    (1, "Mike Johnson", 5, "This air purifier changed my life. Highly recommend!"),
    (2, "Emily Brown", 4, "Good fitness band, accurate tracking and long battery life."),
    (4, "David Wilson", 5, "Most comfortable sneakers ever! Love the eco-friendly design."),
];

/// Fill an empty catalog with demo products and reviews.
///
/// Returns the number of products inserted; `0` when the catalog already
/// had products. Aggregates are computed in the same transaction.
pub fn seed_sample_data(db: &Db) -> CommerceResult<usize> {
    let inserted = db.transaction(|tx| -> CommerceResult<usize> {
        let existing = tx.query_scalar("SELECT COUNT(*) FROM products", &[])?;
        if existing.as_ref().and_then(Value::as_integer).unwrap_or(0) > 0 {
            return Ok(0);
        }

        let mut ids: Vec<ProductId> = Vec::with_capacity(SAMPLE_PRODUCTS.len());
        for &(name, category, price, tag, stock) in SAMPLE_PRODUCTS {
            let entry = NewProduct::new(name, category, price)
                .with_tag(tag)
                .with_stock(stock)
                .with_description(format!("{name} from the demo catalog"));
            ids.push(catalog::insert_product(tx, &entry)?);
        }

        let created_at = timestamp_now();
        for &(index, author, stars, comment) in SAMPLE_REVIEWS {
            tx.execute(
                "INSERT INTO product_reviews (product_id, user_name, rating, comment, created_at)
                 VALUES (?, ?, ?, ?, ?)",
                params![ids[index], author, stars, comment, &created_at],
            )?;
        }

        for &id in &ids {
            crate::reviews::store::refresh_aggregate(tx, id)?;
        }
        Ok(ids.len())
    })?;

    if inserted > 0 {
        info!(products = inserted, reviews = SAMPLE_REVIEWS.len(), "sample data seeded");
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_is_idempotent() {
        let db = Db::open_in_memory().unwrap();
        migrate(&db).unwrap();
        migrate(&db).unwrap();
        assert!(db.ping().is_ok());
    }

    #[test]
    fn test_seed_once() {
        let db = Db::open_in_memory().unwrap();
        migrate(&db).unwrap();

        assert_eq!(seed_sample_data(&db).unwrap(), SAMPLE_PRODUCTS.len());
        assert_eq!(seed_sample_data(&db).unwrap(), 0);

        let products = catalog::list_products(&db).unwrap();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].name, "Smart Speaker");
        assert_eq!(products[0].rating, Some(4.5));
        assert_eq!(products[0].review_count, 2);
        // Wireless Earbuds have no sample reviews.
        assert_eq!(products[3].rating, None);
        assert_eq!(products[3].review_count, 0);
    }

    #[test]
    fn test_reviews_cascade_with_product() {
        let db = Db::open_in_memory().unwrap();
        migrate(&db).unwrap();
        seed_sample_data(&db).unwrap();

        db.execute("DELETE FROM products WHERE name = ?", params!["Smart Speaker"])
            .unwrap();
        let remaining = db.query_scalar("SELECT COUNT(*) FROM product_reviews", &[]).unwrap();
        assert_eq!(remaining, Some(Value::Integer(3)));
    }

    #[test]
    fn test_rating_range_is_enforced() {
        let db = Db::open_in_memory().unwrap();
        migrate(&db).unwrap();
        seed_sample_data(&db).unwrap();

        let err = db
            .execute(
                "INSERT INTO product_reviews (product_id, user_name, rating, comment, created_at)
                 VALUES (1, 'X', 6, 'Out of range rating', '2026-01-01T00:00:00.000Z')",
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, storefront_db::DbError::ConstraintViolation(_)));
    }
}
