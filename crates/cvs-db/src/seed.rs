//! # Demo Data
//!
//! A small, fixed store chain for trying the menu and for tests:
//!
//! - 3 stores, 3 suppliers, 7 products, 4 employees
//! - stock at every store; CU Jamsil doesn't carry the Nongshim ramen or
//!   the cider
//! - 3 orders (one delivered but not yet received)
//! - a handful of sales in December 2025 and January 2026
//!
//! Everything is deterministic so tests can look rows up by name.

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::Database;
use crate::repository::stock::add_units;
use cvs_core::{OrderStatus, PaymentMethod};

/// (name, address, phone)
const STORES: &[(&str, &str, &str)] = &[
    ("GS25 Gangnam", "396 Gangnam-daero, Seoul", "02-555-0101"),
    ("GS25 Hongdae", "160 Yanghwa-ro, Seoul", "02-333-0202"),
    ("CU Jamsil", "240 Olympic-ro, Seoul", "02-421-0303"),
];

/// (name, contact)
const SUPPLIERS: &[(&str, &str)] = &[
    ("Nongshim", "080-023-5181"),
    ("Lotte Confectionery", "080-024-6060"),
    ("Binggrae", "080-022-0085"),
];

/// (name, category, price, supplier index)
const PRODUCTS: &[(&str, &str, i64, usize)] = &[
    ("Shin Ramyun", "Ramen", 1_200, 0),
    ("Chapagetti", "Ramen", 1_300, 0),
    ("Saeukkang", "Snacks", 1_500, 0),
    ("Pepero", "Snacks", 1_700, 1),
    ("Chilsung Cider", "Beverages", 1_800, 1),
    ("Banana Milk", "Dairy", 1_700, 2),
    ("Melona", "Ice Cream", 1_000, 2),
];

/// (store index, name, position)
const EMPLOYEES: &[(usize, &str, &str)] = &[
    (0, "Kim Cheolsu", "Manager"),
    (0, "Lee Younghee", "Clerk"),
    (1, "Park Minsu", "Manager"),
    (2, "Choi Jiwoo", "Clerk"),
];

/// (store index, product index, quantity)
const STOCK: &[(usize, usize, i64)] = &[
    (0, 0, 40),
    (0, 1, 25),
    (0, 2, 30),
    (0, 3, 35),
    (0, 4, 24),
    (0, 5, 30),
    (0, 6, 50),
    (1, 0, 20),
    (1, 1, 20),
    (1, 2, 18),
    (1, 3, 22),
    (1, 4, 12),
    (1, 5, 16),
    (1, 6, 40),
    (2, 2, 15),
    (2, 3, 20),
    (2, 5, 12),
    (2, 6, 30),
];

/// Date as (year, month, day, hour, minute), UTC.
type Stamp = (i32, u32, u32, u32, u32);

struct DemoOrder {
    store: usize,
    supplier: usize,
    date: Stamp,
    status: OrderStatus,
    lines: &'static [(usize, i64)],
}

const ORDERS: &[DemoOrder] = &[
    DemoOrder {
        store: 0,
        supplier: 0,
        date: (2026, 1, 3, 9, 0),
        status: OrderStatus::Delivered,
        lines: &[(0, 24), (1, 12)],
    },
    DemoOrder {
        store: 1,
        supplier: 2,
        date: (2026, 1, 10, 14, 20),
        status: OrderStatus::Shipped,
        lines: &[(5, 20), (6, 30)],
    },
    DemoOrder {
        store: 0,
        supplier: 0,
        date: (2026, 1, 20, 10, 30),
        status: OrderStatus::Pending,
        lines: &[(2, 10)],
    },
];

struct DemoSale {
    employee: usize,
    date: Stamp,
    payment: PaymentMethod,
    lines: &'static [(usize, i64)],
}

const SALES: &[DemoSale] = &[
    DemoSale {
        employee: 2,
        date: (2025, 12, 28, 19, 5),
        payment: PaymentMethod::Card,
        lines: &[(4, 10)],
    },
    DemoSale {
        employee: 0,
        date: (2026, 1, 5, 10, 15),
        payment: PaymentMethod::Card,
        lines: &[(0, 3), (5, 2)],
    },
    DemoSale {
        employee: 1,
        date: (2026, 1, 8, 16, 45),
        payment: PaymentMethod::MobilePayment,
        lines: &[(6, 5), (4, 1)],
    },
    DemoSale {
        employee: 0,
        date: (2026, 1, 12, 18, 40),
        payment: PaymentMethod::Cash,
        lines: &[(3, 4)],
    },
    DemoSale {
        employee: 2,
        date: (2026, 1, 15, 12, 0),
        payment: PaymentMethod::Card,
        lines: &[(1, 2), (2, 1)],
    },
    DemoSale {
        employee: 3,
        date: (2026, 1, 22, 21, 30),
        payment: PaymentMethod::Cash,
        lines: &[(5, 1)],
    },
];

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stores: usize,
    pub suppliers: usize,
    pub products: usize,
    pub employees: usize,
    pub stock_rows: usize,
    pub orders: usize,
    pub sales: usize,
}

fn stamp((year, month, day, hour, minute): Stamp) -> DbResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| DbError::Internal(format!("invalid demo date {year}-{month}-{day}")))
}

fn id_at(ids: &[i64], index: usize, what: &str) -> DbResult<i64> {
    ids.get(index)
        .copied()
        .ok_or_else(|| DbError::Internal(format!("demo data refers to missing {what} #{index}")))
}

/// Tables checked by [`is_empty`], children first so [`clear_all`] can
/// delete in the same order.
const TABLES: [&str; 9] = [
    "transaction_details",
    r#""transaction""#,
    "order_details",
    "order_table",
    "stock",
    "employee",
    "product",
    "supplier",
    "store",
];

/// True when none of the store-chain tables has a row.
pub async fn is_empty(db: &Database) -> DbResult<bool> {
    for table in TABLES {
        let any: Option<i64> = sqlx::query_scalar(&format!("SELECT 1 FROM {table} LIMIT 1"))
            .fetch_optional(db.pool())
            .await?;
        if any.is_some() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Deletes every row, children first.
pub async fn clear_all(db: &Database) -> DbResult<()> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    for table in TABLES {
        sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    info!("Cleared all store-chain tables");
    Ok(())
}

/// Loads the demo chain into `db` in a single transaction.
///
/// Run against an empty database; existing rows are left alone and the
/// demo rows are added next to them. Nothing is written if any insert fails.
pub async fn seed_demo_data(db: &Database) -> DbResult<SeedSummary> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    match seed_in_tx(&mut *tx).await {
        Ok(summary) => {
            tx.commit()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            info!(?summary, "Demo data loaded");
            Ok(summary)
        }
        Err(e) => {
            warn!(error = %e, "Demo data load failed, rolling back");
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            Err(e)
        }
    }
}

async fn seed_in_tx(conn: &mut SqliteConnection) -> DbResult<SeedSummary> {
    let mut summary = SeedSummary::default();
    let now = Utc::now();

    let mut store_ids = Vec::with_capacity(STORES.len());
    for (name, address, phone) in STORES {
        let q = sqlx::query("INSERT INTO store (name, address, phone) VALUES (?, ?, ?)")
            .bind(*name)
            .bind(*address)
            .bind(*phone);
        store_ids.push(q.execute(&mut *conn).await?.last_insert_rowid());
    }
    summary.stores = store_ids.len();

    let mut supplier_ids = Vec::with_capacity(SUPPLIERS.len());
    for (name, contact) in SUPPLIERS {
        let q = sqlx::query("INSERT INTO supplier (name, contact) VALUES (?, ?)")
            .bind(*name)
            .bind(*contact);
        supplier_ids.push(q.execute(&mut *conn).await?.last_insert_rowid());
    }
    summary.suppliers = supplier_ids.len();

    let mut product_ids = Vec::with_capacity(PRODUCTS.len());
    for (name, category, price, supplier) in PRODUCTS {
        let q = sqlx::query(
            "INSERT INTO product (name, category, price, supplier_id) VALUES (?, ?, ?, ?)",
        )
        .bind(*name)
        .bind(*category)
        .bind(*price)
        .bind(id_at(&supplier_ids, *supplier, "supplier")?);
        product_ids.push(q.execute(&mut *conn).await?.last_insert_rowid());
    }
    summary.products = product_ids.len();

    // (store_id, employee_id)
    let mut employees = Vec::with_capacity(EMPLOYEES.len());
    for (store, name, position) in EMPLOYEES {
        let store_id = id_at(&store_ids, *store, "store")?;
        let q = sqlx::query("INSERT INTO employee (store_id, name, position) VALUES (?, ?, ?)")
            .bind(store_id)
            .bind(*name)
            .bind(*position);
        employees.push((store_id, q.execute(&mut *conn).await?.last_insert_rowid()));
    }
    summary.employees = employees.len();

    for (store, product, quantity) in STOCK {
        add_units(
            conn,
            id_at(&store_ids, *store, "store")?,
            id_at(&product_ids, *product, "product")?,
            *quantity,
            now,
        )
        .await?;
        summary.stock_rows += 1;
    }

    for order in ORDERS {
        let q = sqlx::query(
            "INSERT INTO order_table (store_id, supplier_id, order_date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(id_at(&store_ids, order.store, "store")?)
        .bind(id_at(&supplier_ids, order.supplier, "supplier")?)
        .bind(stamp(order.date)?)
        .bind(order.status);
        let order_id = q.execute(&mut *conn).await?.last_insert_rowid();

        for (product, quantity) in order.lines {
            sqlx::query(
                "INSERT INTO order_details (order_id, product_id, quantity) VALUES (?, ?, ?)",
            )
            .bind(order_id)
            .bind(id_at(&product_ids, *product, "product")?)
            .bind(*quantity)
            .execute(&mut *conn)
            .await?;
        }
        summary.orders += 1;
    }

    // Past sales are history only; the stock figures above are already net of them.
    for sale in SALES {
        let (store_id, employee_id) = *employees
            .get(sale.employee)
            .ok_or_else(|| DbError::Internal(format!("missing employee #{}", sale.employee)))?;

        let q = sqlx::query(
            r#"INSERT INTO "transaction" (store_id, employee_id, transaction_date, payment_method) VALUES (?, ?, ?, ?)"#,
        )
        .bind(store_id)
        .bind(employee_id)
        .bind(stamp(sale.date)?)
        .bind(sale.payment);
        let transaction_id = q.execute(&mut *conn).await?.last_insert_rowid();

        for (product, quantity) in sale.lines {
            sqlx::query(
                "INSERT INTO transaction_details (transaction_id, product_id, quantity) VALUES (?, ?, ?)",
            )
            .bind(transaction_id)
            .bind(id_at(&product_ids, *product, "product")?)
            .bind(*quantity)
            .execute(&mut *conn)
            .await?;
        }
        summary.sales += 1;
    }

    Ok(summary)
}
