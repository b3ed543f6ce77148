//! Product types.

use serde::{Deserialize, Serialize};
use storefront_db::sqlite_bool;

use crate::error::{CommerceError, CommerceResult};
use crate::ids::ProductId;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Category slug used by the storefront filters.
    pub category: String,
    /// Unit price.
    pub price: f64,
    /// Cached mean review rating, `None` while the product has no reviews.
    pub rating: Option<f64>,
    /// Number of reviews the cached rating was computed from.
    pub review_count: i64,
    /// Short marketing label ("New", "Best seller").
    pub tag: String,
    /// Image URL.
    pub image: String,
    /// Listing description.
    pub description: String,
    /// Units in stock.
    pub stock: i64,
    /// Whether the product can be ordered.
    #[serde(rename = "is_available", deserialize_with = "sqlite_bool")]
    pub available: bool,
}

impl Product {
    /// Check if the product can be put in a cart.
    pub fn is_purchasable(&self) -> bool {
        self.available && self.stock > 0
    }

    /// Rating for display; products without reviews show `0.0`.
    pub fn display_rating(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}

/// Fields for a new catalog entry.
///
/// New products start without a rating; it is derived from reviews only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl NewProduct {
    /// Create an entry with the required fields; the rest default.
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            price,
            tag: String::new(),
            image: String::new(),
            description: String::new(),
            stock: 0,
            available: true,
        }
    }

    /// Set the stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = stock;
        self
    }

    /// Set the marketing tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Trim text fields and check the entry can be stored.
    pub fn validated(mut self) -> CommerceResult<Self> {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        self.tag = self.tag.trim().to_string();
        self.image = self.image.trim().to_string();
        self.description = self.description.trim().to_string();

        if self.name.is_empty() {
            return Err(CommerceError::InvalidCatalogEntry("name is required".into()));
        }
        if self.category.is_empty() {
            return Err(CommerceError::InvalidCatalogEntry("category is required".into()));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(CommerceError::InvalidCatalogEntry(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        if self.stock < 0 {
            return Err(CommerceError::InvalidCatalogEntry(format!(
                "stock cannot be negative, got {}",
                self.stock
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(rating: Option<f64>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Smart Speaker".into(),
            category: "audio".into(),
            price: 129.99,
            rating,
            review_count: 0,
            tag: String::new(),
            image: String::new(),
            description: String::new(),
            stock: 3,
            available: true,
        }
    }

    #[test]
    fn test_display_rating_defaults_only_for_presentation() {
        let unrated = product(None);
        assert_eq!(unrated.rating, None);
        assert_eq!(unrated.display_rating(), 0.0);

        let rated = product(Some(4.5));
        assert_eq!(rated.display_rating(), 4.5);
    }

    #[test]
    fn test_unrated_product_serializes_null_rating() {
        let json = serde_json::to_value(product(None)).unwrap();
        assert!(json["rating"].is_null());
        assert_eq!(json["is_available"], true);
    }

    #[test]
    fn test_is_purchasable() {
        let mut p = product(None);
        assert!(p.is_purchasable());
        p.stock = 0;
        assert!(!p.is_purchasable());
        p.stock = 5;
        p.available = false;
        assert!(!p.is_purchasable());
    }

    #[test]
    fn test_validated_trims_fields() {
        let entry = NewProduct::new("  Desk Lamp ", " home ", 39.0)
            .with_tag(" New ")
            .validated()
            .unwrap();
        assert_eq!(entry.name, "Desk Lamp");
        assert_eq!(entry.category, "home");
        assert_eq!(entry.tag, "New");
    }

    #[test]
    fn test_validated_rejects_bad_entries() {
        for entry in [
            NewProduct::new("   ", "home", 10.0),
            NewProduct::new("Lamp", "", 10.0),
            NewProduct::new("Lamp", "home", 0.0),
            NewProduct::new("Lamp", "home", f64::NAN),
            NewProduct::new("Lamp", "home", 10.0).with_stock(-1),
        ] {
            assert!(matches!(
                entry.validated(),
                Err(CommerceError::InvalidCatalogEntry(_))
            ));
        }
    }
}
