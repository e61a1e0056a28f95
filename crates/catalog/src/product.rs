use serde::{Deserialize, Serialize};

use souqpos_core::{DomainError, DomainResult, Entity, ProductId};

/// A sellable catalog entry.
///
/// Products are mutated only through a price update; name and unit are fixed
/// at creation. Deleting a product never touches historical sales — sale line
/// items carry their own denormalized copies of these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unit price, non-negative. Fractional prices are expected (weight-based
    /// units sell fractional quantities).
    pub price: f64,
    /// Unit-of-measure label, free-form ("kg", "L", "pcs", ...).
    pub unit: String,
}

impl Product {
    /// Validate inputs and create a product with a freshly minted id.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        unit: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::with_id(ProductId::new(), name, price, unit)
    }

    /// Validate inputs and create a product with an explicit id.
    ///
    /// Used by seed fixtures and tests that need stable ids.
    pub fn with_id(
        id: ProductId,
        name: impl Into<String>,
        price: f64,
        unit: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if !(price >= 0.0) {
            return Err(DomainError::validation("product price must be non-negative"));
        }

        Ok(Self {
            id,
            name,
            price,
            unit: unit.into(),
        })
    }

    /// Replace the unit price.
    ///
    /// Historical sales are unaffected; they snapshot the price at sale time.
    pub fn set_price(&mut self, price: f64) -> DomainResult<()> {
        if !(price >= 0.0) {
            return Err(DomainError::validation("product price must be non-negative"));
        }
        self.price = price;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_product_gets_fresh_id() {
        let a = Product::new("Ajwa Dates", 12.5, "kg").unwrap();
        let b = Product::new("Ajwa Dates", 12.5, "kg").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.name, "Ajwa Dates");
        assert_eq!(a.price, 12.5);
        assert_eq!(a.unit, "kg");
    }

    #[test]
    fn rejects_blank_name() {
        let err = Product::new("   ", 5.0, "kg").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_price() {
        let err = Product::new("Almonds", -1.0, "kg").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_nan_price() {
        assert!(Product::new("Almonds", f64::NAN, "kg").is_err());
    }

    #[test]
    fn set_price_replaces_price_only() {
        let mut p = Product::with_id(ProductId::from("p1"), "Ajwa Dates", 12.5, "kg").unwrap();
        p.set_price(14.0).unwrap();
        assert_eq!(p.price, 14.0);
        assert_eq!(p.name, "Ajwa Dates");
        assert_eq!(p.id, ProductId::from("p1"));
    }

    #[test]
    fn set_price_rejects_negative() {
        let mut p = Product::new("Ajwa Dates", 12.5, "kg").unwrap();
        assert!(p.set_price(-0.5).is_err());
        assert_eq!(p.price, 12.5);
    }

    #[test]
    fn json_shape_is_flat() {
        let p = Product::with_id(ProductId::from("p1"), "Ajwa Dates", 12.5, "kg").unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], "p1");
        assert_eq!(json["name"], "Ajwa Dates");
        assert_eq!(json["price"], 12.5);
        assert_eq!(json["unit"], "kg");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: any non-blank name with a finite non-negative price
            /// constructs, and the inputs survive unchanged.
            #[test]
            fn valid_inputs_always_construct(
                name in "[A-Za-z][A-Za-z0-9 ]{0,49}",
                price in 0.0f64..100_000.0,
                unit in "(kg|g|L|ml|pcs)",
            ) {
                let p = Product::new(name.clone(), price, unit.clone()).unwrap();
                prop_assert_eq!(p.name, name);
                prop_assert_eq!(p.price, price);
                prop_assert_eq!(p.unit, unit);
            }

            /// Property: whitespace-only names are always rejected.
            #[test]
            fn blank_names_always_rejected(name in "[ \t]{0,10}") {
                prop_assert!(Product::new(name, 1.0, "kg").is_err());
            }
        }
    }
}
