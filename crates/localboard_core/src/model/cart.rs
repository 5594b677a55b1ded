//! Product catalog and cart line model.
//!
//! # Responsibility
//! - Define the compiled-in product catalog.
//! - Define cart lines keyed by product identity.
//!
//! # Invariants
//! - A cart line id equals the id of the product it was created from.
//! - Stored lines always have `quantity >= 1`.

use crate::model::record::{Category, Record, RecordValidationError};
use serde::{Deserialize, Serialize};

pub type ProductId = u32;

/// Catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Electronics,
    Accessories,
    Photography,
    Fashion,
    Bags,
}

impl Category for ProductCategory {
    const ALL: &'static [Self] = &[
        Self::Electronics,
        Self::Accessories,
        Self::Photography,
        Self::Fashion,
        Self::Bags,
    ];
    const DEFAULT: Self = Self::Electronics;

    fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "Electronics",
            Self::Accessories => "Accessories",
            Self::Photography => "Photography",
            Self::Fashion => "Fashion",
            Self::Bags => "Bags",
        }
    }
}

/// One catalog entry. Prices are whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: &'static str,
    pub price: u64,
    pub category: ProductCategory,
    pub image: &'static str,
}

pub const CATALOG: &[Product] = &[
    Product {
        id: 1,
        name: "Wireless Headphones",
        price: 1_500_000,
        category: ProductCategory::Electronics,
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500&q=80",
    },
    Product {
        id: 2,
        name: "Minimalist Watch",
        price: 850_000,
        category: ProductCategory::Accessories,
        image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=500&q=80",
    },
    Product {
        id: 3,
        name: "Instant Camera",
        price: 3_200_000,
        category: ProductCategory::Photography,
        image: "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=500&q=80",
    },
    Product {
        id: 4,
        name: "White Sneakers",
        price: 1_200_000,
        category: ProductCategory::Fashion,
        image: "https://images.unsplash.com/photo-1549298916-b41d501d3772?w=500&q=80",
    },
    Product {
        id: 5,
        name: "Sunglasses",
        price: 450_000,
        category: ProductCategory::Accessories,
        image: "https://images.unsplash.com/photo-1572635196237-14b3f281503f?w=500&q=80",
    },
    Product {
        id: 6,
        name: "Laptop Backpack",
        price: 750_000,
        category: ProductCategory::Bags,
        image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=500&q=80",
    },
];

/// Looks up a catalog product by id.
pub fn find_product(id: ProductId) -> Option<&'static Product> {
    CATALOG.iter().find(|product| product.id == id)
}

/// Cart line: a product snapshot plus quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub category: ProductCategory,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl CartLine {
    /// Price of this line (`price * quantity`), saturating.
    pub fn line_total(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Create input for a cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineFields {
    pub product: Product,
    pub quantity: u32,
}

/// Quantity adjustment applied to an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Increment(u32),
    /// Saturates at zero; a zero line is removed by the store.
    Decrement(u32),
}

impl Record for CartLine {
    type Id = ProductId;
    type Fields = CartLineFields;
    type Patch = QuantityChange;
    type Category = ProductCategory;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn assign_id(fields: &Self::Fields) -> Self::Id {
        fields.product.id
    }

    fn build(id: Self::Id, fields: Self::Fields, now_ms: i64) -> Self {
        Self {
            id,
            name: fields.product.name.to_string(),
            price: fields.product.price,
            category: fields.product.category,
            image: fields.product.image.to_string(),
            quantity: fields.quantity,
            created_at: Some(now_ms),
            updated_at: None,
        }
    }

    fn apply_patch(&mut self, patch: Self::Patch, now_ms: i64) {
        self.quantity = match patch {
            QuantityChange::Increment(by) => self.quantity.saturating_add(by),
            QuantityChange::Decrement(by) => self.quantity.saturating_sub(by),
        };
        self.updated_at = Some(now_ms);
    }

    fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    fn category(&self) -> Self::Category {
        self.category
    }

    fn text_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::MissingField("name"));
        }
        if self.quantity == 0 {
            return Err(RecordValidationError::NonPositiveQuantity);
        }
        Ok(())
    }

    fn is_retained(&self) -> bool {
        self.quantity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::{find_product, CartLine, CartLineFields, QuantityChange, CATALOG};
    use crate::model::record::Record;
    use std::collections::HashSet;

    #[test]
    fn catalog_ids_are_unique() {
        let ids: HashSet<_> = CATALOG.iter().map(|product| product.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn decrement_saturates_and_drops_retention() {
        let product = *find_product(5).expect("sunglasses in catalog");
        let mut line = CartLine::build(
            product.id,
            CartLineFields {
                product,
                quantity: 1,
            },
            10,
        );
        assert_eq!(line.line_total(), 450_000);

        line.apply_patch(QuantityChange::Decrement(3), 20);
        assert_eq!(line.quantity, 0);
        assert!(!line.is_retained());
        assert!(line.validate().is_err());
    }

    #[test]
    fn increment_and_decrement_move_quantity_and_stamp_update() {
        let product = *find_product(2).expect("watch in catalog");
        let mut line = CartLine::build(
            product.id,
            CartLineFields {
                product,
                quantity: 1,
            },
            10,
        );

        line.apply_patch(QuantityChange::Increment(2), 20);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total(), 2_550_000);
        line.apply_patch(QuantityChange::Decrement(1), 30);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.created_at, Some(10));
        assert_eq!(line.updated_at, Some(30));
        assert!(line.is_retained());
    }
}
