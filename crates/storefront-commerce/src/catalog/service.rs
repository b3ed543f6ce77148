//! Catalog operations exposed to the HTTP layer and the operator CLI.

use storefront_db::Db;
use tracing::info;

use crate::catalog::{store, NewProduct, Product};
use crate::error::{CommerceError, CommerceResult};
use crate::ids::ProductId;
use crate::storage::{bounded, run_to_completion, StoragePolicy};

/// Catalog access with bounded storage calls.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Db,
    policy: StoragePolicy,
}

impl CatalogService {
    pub fn new(db: Db, policy: StoragePolicy) -> Self {
        Self { db, policy }
    }

    /// All products, ordered by id ascending.
    pub async fn list_products(&self) -> CommerceResult<Vec<Product>> {
        bounded(&self.db, self.policy, "list_products", |db| store::list_products(db)).await
    }

    /// One product, or `ProductNotFound`.
    pub async fn get_product(&self, id: ProductId) -> CommerceResult<Product> {
        bounded(&self.db, self.policy, "get_product", move |db| {
            store::get_product(db, id)?.ok_or(CommerceError::ProductNotFound(id))
        })
        .await
    }

    pub async fn product_exists(&self, id: ProductId) -> CommerceResult<bool> {
        bounded(&self.db, self.policy, "product_exists", move |db| {
            store::product_exists(db, id)
        })
        .await
    }

    /// Toggle whether a product can be ordered.
    pub async fn set_availability(&self, id: ProductId, available: bool) -> CommerceResult<Product> {
        let product = run_to_completion(&self.db, "set_availability", move |db| {
            db.transaction(|tx| {
                store::set_availability(tx, id, available)?;
                store::get_product(tx, id)?.ok_or(CommerceError::ProductNotFound(id))
            })
        })
        .await?;

        info!(product_id = %id, available, "product availability changed");
        Ok(product)
    }

    /// Add a product. It starts without a rating.
    pub async fn create_product(&self, entry: NewProduct) -> CommerceResult<Product> {
        let entry = entry.validated()?;
        let product = run_to_completion(&self.db, "create_product", move |db| {
            db.transaction(|tx| {
                let id = store::insert_product(tx, &entry)?;
                store::get_product(tx, id)?.ok_or(CommerceError::ProductNotFound(id))
            })
        })
        .await?;

        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn service() -> CatalogService {
        let db = Db::open_in_memory().unwrap();
        schema::migrate(&db).unwrap();
        CatalogService::new(db, StoragePolicy::default())
    }

    #[tokio::test]
    async fn test_create_and_list_in_id_order() {
        let catalog = service();
        let lamp = catalog
            .create_product(NewProduct::new("Desk Lamp", "home", 39.0).with_stock(4))
            .await
            .unwrap();
        let fan = catalog
            .create_product(NewProduct::new("Tower Fan", "home", 59.0))
            .await
            .unwrap();

        assert_eq!(lamp.rating, None);
        assert_eq!(lamp.review_count, 0);
        assert!(lamp.available);

        let ids: Vec<_> = catalog
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![lamp.id, fan.id]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_entry_before_storage() {
        let catalog = service();
        let err = catalog
            .create_product(NewProduct::new("Lamp", "home", -2.0))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::InvalidCatalogEntry(_)));
        assert!(catalog.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_availability() {
        let catalog = service();
        let lamp = catalog
            .create_product(NewProduct::new("Desk Lamp", "home", 39.0))
            .await
            .unwrap();

        let updated = catalog.set_availability(lamp.id, false).await.unwrap();
        assert!(!updated.available);
        assert!(!catalog.get_product(lamp.id).await.unwrap().available);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let catalog = service();
        let missing = ProductId::new(999_999);

        assert!(!catalog.product_exists(missing).await.unwrap());
        assert!(matches!(
            catalog.get_product(missing).await,
            Err(CommerceError::ProductNotFound(id)) if id == missing
        ));
        assert!(matches!(
            catalog.set_availability(missing, true).await,
            Err(CommerceError::ProductNotFound(_))
        ));
    }
}
