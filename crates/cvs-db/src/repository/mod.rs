//! # Repository Module
//!
//! One repository per table group. Each holds a pool clone and owns the SQL
//! for its tables.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Menu command                                                          │
//! │       │  db.stock().list_for_store(3)                                  │
//! │       ▼                                                                 │
//! │  StockRepository ──► SQL ──► SQLite                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`store::StoreRepository`] - Store lookup and search
//! - [`supplier::SupplierRepository`] - Supplier lookup and search
//! - [`employee::EmployeeRepository`] - Staff per store
//! - [`product::ProductRepository`] - Catalog
//! - [`stock::StockRepository`] - Per-store inventory
//! - [`order::OrderRepository`] - Supplier orders and deliveries
//! - [`sale::SaleRepository`] - Customer sales (`transaction` table)
//! - [`report::ReportRepository`] - Sales leaderboard

pub mod employee;
pub mod order;
pub mod product;
pub mod report;
pub mod sale;
pub mod stock;
pub mod store;
pub mod supplier;

/// Builds a `LIKE ... ESCAPE '\'` pattern that matches `keyword` anywhere.
///
/// `%`, `_` and `\` in the keyword are matched literally. An empty keyword
/// yields `%%`, which matches every row.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
