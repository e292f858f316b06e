//! # Drafts
//!
//! Orders and sales are built up line by line at the prompt before anything
//! is written. These types hold the lines and enforce the rules that do not
//! need the database:
//!
//! - an order goes to one supplier, so every product must come from it
//! - adding a product twice merges into one line
//! - line count and per-line quantity are bounded
//!
//! Stock availability is checked later, inside the database transaction.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderLine, PaymentMethod, Product, SaleLine};
use crate::validation::validate_quantity;
use crate::MAX_LINES;

// =============================================================================
// Order Draft
// =============================================================================

/// A supplier order for one store, not yet placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    store_id: i64,
    supplier_id: Option<i64>,
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new(store_id: i64) -> Self {
        OrderDraft {
            store_id,
            supplier_id: None,
            lines: Vec::new(),
        }
    }

    pub fn store_id(&self) -> i64 {
        self.store_id
    }

    /// Supplier fixed by the first product added.
    pub fn supplier_id(&self) -> Option<i64> {
        self.supplier_id
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Adds `quantity` units of `product`.
    ///
    /// ## Errors
    /// - `Validation` if the quantity (or merged quantity) is out of range
    /// - `SupplierMismatch` if the product comes from a different supplier
    /// - `TooManyLines` if this would be one product too many
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(expected) = self.supplier_id {
            if expected != product.supplier_id {
                return Err(CoreError::SupplierMismatch {
                    product_id: product.product_id,
                    expected,
                    actual: product.supplier_id,
                });
            }
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.product_id)
        {
            validate_quantity(line.quantity + quantity)?;
            line.quantity += quantity;
            return Ok(());
        }

        if self.lines.len() >= MAX_LINES {
            return Err(CoreError::TooManyLines { max: MAX_LINES });
        }

        self.supplier_id = Some(product.supplier_id);
        self.lines.push(OrderLine {
            product_id: product.product_id,
            quantity,
        });
        Ok(())
    }

    /// Returns the supplier, failing on an empty draft.
    pub fn ensure_ready(&self) -> CoreResult<i64> {
        match self.supplier_id {
            Some(supplier_id) if !self.lines.is_empty() => Ok(supplier_id),
            _ => Err(CoreError::Empty("Order")),
        }
    }
}

// =============================================================================
// Sale Basket
// =============================================================================

/// The products a customer is buying, before checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBasket {
    store_id: i64,
    employee_id: i64,
    payment_method: PaymentMethod,
    lines: Vec<SaleLine>,
}

impl SaleBasket {
    pub fn new(store_id: i64, employee_id: i64) -> Self {
        SaleBasket {
            store_id,
            employee_id,
            payment_method: PaymentMethod::default(),
            lines: Vec::new(),
        }
    }

    pub fn store_id(&self) -> i64 {
        self.store_id
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current quantity of `product_id` in the basket.
    pub fn quantity_of(&self, product_id: i64) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    pub fn total(&self) -> Money {
        self.lines.iter().map(SaleLine::line_total).sum()
    }

    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Adds `quantity` units of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product.product_id)
        {
            validate_quantity(line.quantity + quantity)?;
            line.quantity += quantity;
            return Ok(());
        }

        if self.lines.len() >= MAX_LINES {
            return Err(CoreError::TooManyLines { max: MAX_LINES });
        }

        self.lines.push(SaleLine {
            product_id: product.product_id,
            product_name: product.name.clone(),
            unit_price: product.price,
            quantity,
        });
        Ok(())
    }

    pub fn ensure_ready(&self) -> CoreResult<()> {
        if self.lines.is_empty() {
            return Err(CoreError::Empty("Sale"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(product_id: i64, supplier_id: i64, price: i64) -> Product {
        Product {
            product_id,
            name: format!("Product {}", product_id),
            category: "Snacks".to_string(),
            price,
            supplier_id,
        }
    }

    #[test]
    fn test_order_draft_merges_and_fixes_supplier() {
        let mut draft = OrderDraft::new(1);
        assert!(draft.ensure_ready().is_err());

        draft.add(&product(10, 3, 1_200), 5).unwrap();
        draft.add(&product(11, 3, 1_300), 2).unwrap();
        draft.add(&product(10, 3, 1_200), 4).unwrap();

        assert_eq!(draft.supplier_id(), Some(3));
        assert_eq!(draft.lines().len(), 2);
        assert_eq!(draft.lines()[0].quantity, 9);
        assert_eq!(draft.total_quantity(), 11);
        assert_eq!(draft.ensure_ready().unwrap(), 3);
    }

    #[test]
    fn test_order_draft_rejects_other_supplier() {
        let mut draft = OrderDraft::new(1);
        draft.add(&product(10, 3, 1_200), 1).unwrap();

        let err = draft.add(&product(20, 4, 900), 1).unwrap_err();
        assert!(matches!(
            err,
            CoreError::SupplierMismatch {
                product_id: 20,
                expected: 3,
                actual: 4
            }
        ));
        assert_eq!(draft.lines().len(), 1);
    }

    #[test]
    fn test_order_draft_rejects_bad_quantity() {
        let mut draft = OrderDraft::new(1);
        assert!(draft.add(&product(10, 3, 1_200), 0).is_err());
        assert!(draft.add(&product(10, 3, 1_200), -2).is_err());
        // A rejected first line must not pin the supplier.
        assert_eq!(draft.supplier_id(), None);

        draft.add(&product(10, 3, 1_200), 9_000).unwrap();
        assert!(draft.add(&product(10, 3, 1_200), 1_000).is_err());
        assert_eq!(draft.lines()[0].quantity, 9_000);
    }

    #[test]
    fn test_sale_basket_totals() {
        let mut basket = SaleBasket::new(1, 2);
        assert!(matches!(basket.ensure_ready(), Err(CoreError::Empty("Sale"))));

        basket.add(&product(10, 3, 1_200), 2).unwrap();
        basket.add(&product(11, 4, 1_700), 1).unwrap();
        basket.add(&product(10, 3, 1_200), 1).unwrap();

        assert_eq!(basket.lines().len(), 2);
        assert_eq!(basket.quantity_of(10), 3);
        assert_eq!(basket.quantity_of(99), 0);
        assert_eq!(basket.total_quantity(), 4);
        assert_eq!(basket.total().minor(), 3 * 1_200 + 1_700);
        assert_eq!(basket.payment_method(), PaymentMethod::Card);

        basket.set_payment_method(PaymentMethod::Cash);
        assert_eq!(basket.payment_method(), PaymentMethod::Cash);
        assert!(basket.ensure_ready().is_ok());
    }

    #[test]
    fn test_sale_basket_line_limit() {
        let mut basket = SaleBasket::new(1, 1);
        for id in 0..MAX_LINES as i64 {
            basket.add(&product(id, 1, 100), 1).unwrap();
        }
        let err = basket.add(&product(9_999, 1, 100), 1).unwrap_err();
        assert!(matches!(err, CoreError::TooManyLines { .. }));
        // Merging into an existing line is still fine.
        basket.add(&product(0, 1, 100), 1).unwrap();
    }
}
