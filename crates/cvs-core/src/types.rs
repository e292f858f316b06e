//! # Domain Types
//!
//! Entities of the store chain and the report rows built from them.
//!
//! ## Entity Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   supplier ◄──── product ────► stock ◄──── store ◄──── employee        │
//! │      ▲              ▲                        ▲            ▲             │
//! │      │              │                        │            │             │
//! │  order_table ── order_details          transaction ───────┘             │
//! │      (store)                                 │                          │
//! │                                     transaction_details ──► product     │
//! │                                                                         │
//! │  Order:       Pending ─► Shipped ─► Delivered   (─► stock += qty)       │
//! │  Transaction: one sale, ≥1 line                 (─► stock -= qty)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All identifiers are the integer keys assigned by the database.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Store / Supplier / Employee
// =============================================================================

/// A franchise location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Store {
    pub store_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Fields needed to open a store record.
#[derive(Debug, Clone, Default)]
pub struct NewStore {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// A vendor that products are ordered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Supplier {
    pub supplier_id: i64,
    pub name: String,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSupplier {
    pub name: String,
    pub contact: Option<String>,
}

/// A staff member working at one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub employee_id: i64,
    pub store_id: i64,
    pub name: String,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewEmployee {
    pub store_id: i64,
    pub name: String,
    pub position: Option<String>,
}

// =============================================================================
// Product / Stock
// =============================================================================

/// A catalog item. Each product is sourced from exactly one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    pub category: String,
    /// Unit price in minor currency units.
    pub price: i64,
    pub supplier_id: i64,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: i64,
    pub supplier_id: i64,
}

/// One row of a store's inventory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockLevel {
    pub product_id: i64,
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub last_updated: DateTime<Utc>,
}

/// Stock left for a product after a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingStock {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of a supplier order.
///
/// ```text
/// Pending ──► Shipped ──► Delivered
///    │           │
///    └───────────┴──────► Cancelled
/// Pending ───────────────► Delivered   (direct drop-off)
/// ```
///
/// Stock is only touched once an order is `Delivered`, by the
/// receive-deliveries action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Statuses this one may move to.
    pub fn next_statuses(&self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[
                OrderStatus::Shipped,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Shipped => &[OrderStatus::Delivered, OrderStatus::Cancelled],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.next_statuses().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_statuses().is_empty()
    }

    /// The exact text stored in `order_table.status`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentMethod {
    Cash,
    Card,
    #[cfg_attr(feature = "sqlx", sqlx(rename = "Mobile Payment"))]
    #[serde(rename = "Mobile Payment")]
    MobilePayment,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::MobilePayment,
    ];

    /// Maps the payment menu choice ("1".."3") to a method.
    ///
    /// Returns `None` for anything else; callers fall back to
    /// [`PaymentMethod::default`] (card).
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(PaymentMethod::Cash),
            "2" => Some(PaymentMethod::Card),
            "3" => Some(PaymentMethod::MobilePayment),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobilePayment => "Mobile Payment",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Card
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Orders
// =============================================================================

/// A purchase request from one store to one supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub order_id: i64,
    pub store_id: i64,
    pub supplier_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    /// Set once a delivered order has been added to stock.
    pub stocked_at: Option<DateTime<Utc>>,
}

/// A product line on an order (`order_details`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i64,
}

/// One row of a store × supplier order listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub order_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Header of an order receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderReceipt {
    pub order_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub store_name: String,
    pub supplier_name: String,
    /// Product names joined with ", ".
    pub product_names: String,
    pub total_quantity: i64,
}

/// Result of applying delivered orders to stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub orders: i64,
    pub units: i64,
}

// =============================================================================
// Sales (the `transaction` table)
// =============================================================================

/// A customer purchase recorded at a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub transaction_id: i64,
    pub store_id: i64,
    pub employee_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
}

/// A product line in a sale basket (`transaction_details`).
///
/// Name and price ride along so the basket can be shown before checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i64,
}

impl SaleLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_minor(self.unit_price).multiply_quantity(self.quantity)
    }
}

/// What a committed sale hands back to the cashier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub transaction_id: i64,
    pub remaining: Vec<RemainingStock>,
}

/// One row of an employee's sale listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleSummary {
    pub transaction_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub total_price: i64,
}

/// Header of a sale receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleReceipt {
    pub transaction_id: i64,
    pub transaction_date: DateTime<Utc>,
    pub store_name: String,
    pub employee_name: String,
    pub payment_method: PaymentMethod,
    pub product_names: String,
    pub total_quantity: i64,
    pub total_price: i64,
}

/// An itemized receipt line, shared by order and sale receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReceiptLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: i64,
    pub line_total: i64,
}

// =============================================================================
// Reports
// =============================================================================

/// An employee's sales total over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SalesLeader {
    pub employee_id: i64,
    pub employee_name: String,
    pub store_name: String,
    pub total_sales: i64,
}

/// A half-open `[start, end)` window over transaction dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    /// The calendar month `year-month` (UTC).
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };

        Some(ReportPeriod {
            start: Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0)?),
            end: Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0)?),
        })
    }

    /// The calendar month containing `at`.
    pub fn month_containing(at: DateTime<Utc>) -> Self {
        // Every (year, month) taken from a valid date is itself valid.
        Self::month(at.year(), at.month()).unwrap_or(ReportPeriod { start: at, end: at })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// `YYYY-MM` label of the period's first month.
    pub fn label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));

        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
    }

    #[test]
    fn test_payment_method_menu_choice() {
        assert_eq!(PaymentMethod::from_menu_choice("1"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::from_menu_choice(" 2 "), Some(PaymentMethod::Card));
        assert_eq!(
            PaymentMethod::from_menu_choice("3"),
            Some(PaymentMethod::MobilePayment)
        );
        assert_eq!(PaymentMethod::from_menu_choice("4"), None);
        assert_eq!(PaymentMethod::from_menu_choice("cash"), None);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Card);
        assert_eq!(PaymentMethod::MobilePayment.to_string(), "Mobile Payment");
    }

    #[test]
    fn test_report_period_month() {
        let jan = ReportPeriod::month(2026, 1).unwrap();
        assert_eq!(jan.label(), "2026-01");
        assert!(jan.contains(Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap()));
        assert!(!jan.contains(Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap()));

        let dec = ReportPeriod::month(2025, 12).unwrap();
        assert_eq!(dec.end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());

        assert!(ReportPeriod::month(2026, 13).is_none());
    }

    #[test]
    fn test_report_period_month_containing() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let period = ReportPeriod::month_containing(at);
        assert_eq!(period.label(), "2026-10");
        assert!(period.contains(at));
    }

    #[test]
    fn test_sale_line_total() {
        let line = SaleLine {
            product_id: 1,
            product_name: "Banana Milk".to_string(),
            unit_price: 1_700,
            quantity: 3,
        };
        assert_eq!(line.line_total().minor(), 5_100);
    }
}
