//! # Render
//!
//! Turns query results into the line-oriented text the menu prints. Every
//! function here is pure: rows in, `String` out.

use chrono::{DateTime, Utc};
use cvs_core::{
    Currency, DeliveryReport, Employee, Money, OrderReceipt, OrderSummary, Product, ReceiptLine,
    SaleBasket, SaleOutcome, SaleReceipt, SaleSummary, SalesLeader, StockLevel, Store, Supplier,
};

pub const SEPARATOR: &str = "----------------------------------------";

/// `2026-01-05 14:30`
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// One line per item, each ending in a newline.
fn lines<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    items.into_iter().map(|line| line + "\n").collect()
}

// =============================================================================
// Search listings
// =============================================================================

pub fn store_list(stores: &[Store]) -> String {
    lines(stores.iter().map(|store| match &store.address {
        Some(address) => format!("[{}] {} ({})", store.store_id, store.name, address),
        None => format!("[{}] {}", store.store_id, store.name),
    }))
}

/// Suppliers are picked by position, so they are numbered from 1. The ID
/// tells apart suppliers that share a name.
pub fn supplier_list(suppliers: &[Supplier]) -> String {
    lines(suppliers.iter().enumerate().map(|(i, supplier)| {
        format!("{}. [{}] {}", i + 1, supplier.supplier_id, supplier.name)
    }))
}

pub fn employee_list(employees: &[Employee]) -> String {
    lines(employees.iter().map(|employee| {
        format!(
            "[{}] {} ({})",
            employee.employee_id,
            employee.name,
            employee.position.as_deref().unwrap_or("-")
        )
    }))
}

/// Employees picked by position (sale receipt flow).
pub fn numbered_employee_list(employees: &[Employee]) -> String {
    lines(
        employees
            .iter()
            .enumerate()
            .map(|(i, employee)| format!("{}. {}", i + 1, employee.name)),
    )
}

pub fn product_list(products: &[Product], currency: &Currency) -> String {
    lines(products.iter().map(|product| {
        format!(
            "[{}] {} | {} | {}",
            product.product_id,
            product.name,
            product.category,
            currency.format(product.price())
        )
    }))
}

/// Shown under a search listing that hit the row limit.
pub fn truncation_notice(limit: u32) -> String {
    format!("Showing the first {limit} matches; refine the search to see others.")
}

// =============================================================================
// Orders
// =============================================================================

pub fn order_list(orders: &[OrderSummary]) -> String {
    lines(orders.iter().enumerate().map(|(i, order)| {
        format!(
            "{}. Order #{} | {} | {}",
            i + 1,
            order.order_id,
            timestamp(order.order_date),
            order.status
        )
    }))
}

pub fn order_receipt(receipt: &OrderReceipt, items: &[ReceiptLine], currency: &Currency) -> String {
    let mut out = lines([
        SEPARATOR.to_string(),
        format!("Order ID:       {}", receipt.order_id),
        format!("Order date:     {}", timestamp(receipt.order_date)),
        format!("Status:         {}", receipt.status),
        format!("Store:          {}", receipt.store_name),
        format!("Supplier:       {}", receipt.supplier_name),
        format!("Products:       {}", receipt.product_names),
        format!("Total quantity: {}", receipt.total_quantity),
        SEPARATOR.to_string(),
    ]);
    out.push_str(&receipt_lines(items, currency));
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

pub fn delivery_report(report: &DeliveryReport) -> String {
    if report.orders == 0 {
        return "No delivered orders waiting to be stocked.".to_string();
    }
    format!(
        "Received {} order(s), {} unit(s) added to stock.",
        report.orders, report.units
    )
}

// =============================================================================
// Inventory
// =============================================================================

pub fn inventory_table(store: &Store, rows: &[StockLevel]) -> String {
    let header = [
        format!("Inventory for {}", store.name),
        "product | category | quantity | last updated".to_string(),
        SEPARATOR.to_string(),
    ];
    let body = rows.iter().map(|row| {
        format!(
            "{} | {} | {} | {}",
            row.product_name,
            row.category,
            row.quantity,
            timestamp(row.last_updated)
        )
    });
    lines(header.into_iter().chain(body))
}

// =============================================================================
// Sales
// =============================================================================

pub fn basket(basket: &SaleBasket, currency: &Currency) -> String {
    let items = basket.lines().iter().map(|line| {
        format!(
            "  {} x{} @ {} = {}",
            line.product_name,
            line.quantity,
            currency.format(Money::from_minor(line.unit_price)),
            currency.format(line.line_total())
        )
    });
    lines(
        std::iter::once("Basket:".to_string())
            .chain(items)
            .chain(std::iter::once(format!(
                "  Total: {}",
                currency.format(basket.total())
            ))),
    )
}

pub fn sale_outcome(outcome: &SaleOutcome) -> String {
    let header = [
        format!("Sale recorded (transaction ID {}).", outcome.transaction_id),
        "Remaining stock:".to_string(),
    ];
    let rows = outcome
        .remaining
        .iter()
        .map(|row| format!("  {}: {}", row.product_name, row.quantity));
    lines(header.into_iter().chain(rows))
}

pub fn sale_list(sales: &[SaleSummary], currency: &Currency) -> String {
    lines(sales.iter().enumerate().map(|(i, sale)| {
        format!(
            "{}. Transaction #{} | {} | {}",
            i + 1,
            sale.transaction_id,
            timestamp(sale.transaction_date),
            currency.format(Money::from_minor(sale.total_price))
        )
    }))
}

pub fn sale_receipt(receipt: &SaleReceipt, items: &[ReceiptLine], currency: &Currency) -> String {
    let mut out = lines([
        SEPARATOR.to_string(),
        format!("Transaction ID: {}", receipt.transaction_id),
        format!("Date:           {}", timestamp(receipt.transaction_date)),
        format!("Store:          {}", receipt.store_name),
        format!("Employee:       {}", receipt.employee_name),
        format!("Payment:        {}", receipt.payment_method),
        format!("Products:       {}", receipt.product_names),
        format!("Total quantity: {}", receipt.total_quantity),
        format!(
            "Total price:    {}",
            currency.format(Money::from_minor(receipt.total_price))
        ),
        SEPARATOR.to_string(),
    ]);
    out.push_str(&receipt_lines(items, currency));
    out.push_str(SEPARATOR);
    out.push('\n');
    out
}

fn receipt_lines(items: &[ReceiptLine], currency: &Currency) -> String {
    lines(items.iter().map(|line| {
        format!(
            "{} x{} @ {} = {}",
            line.product_name,
            line.quantity,
            currency.format(Money::from_minor(line.unit_price)),
            currency.format(Money::from_minor(line.line_total))
        )
    }))
}

// =============================================================================
// Reports
// =============================================================================

pub fn leaderboard(label: &str, leaders: &[SalesLeader], currency: &Currency) -> String {
    let header = [format!("Top sellers ({label})"), SEPARATOR.to_string()];
    let rows = leaders.iter().enumerate().map(|(i, leader)| {
        format!(
            "{}. {} ({}) {}",
            i + 1,
            leader.employee_name,
            leader.store_name,
            currency.format(Money::from_minor(leader.total_sales))
        )
    });
    lines(header.into_iter().chain(rows))
}
