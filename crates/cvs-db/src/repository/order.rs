//! # Order Repository
//!
//! Supplier orders (`order_table` + `order_details`) and receiving them
//! into stock.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. PLACE                                                              │
//! │     └── place(draft) → order_table { Pending } + order_details         │
//! │                                                                         │
//! │  2. SUPPLIER PROGRESS                                                  │
//! │     └── update_status() → Shipped → Delivered   (or Cancelled)         │
//! │                                                                         │
//! │  3. RECEIVE                                                            │
//! │     └── receive_deliveries() → stock += qty at the ordering store      │
//! │                                stocked_at = now (never applied twice)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::stock;
use crate::error::{DbError, DbResult};
use cvs_core::{
    CoreError, DeliveryReport, Order, OrderDraft, OrderReceipt, OrderStatus, OrderSummary,
    ReceiptLine,
};

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Places an order: one `order_table` row (Pending, dated now) and one
    /// `order_details` row per draft line, atomically.
    ///
    /// ## Returns
    /// The new order ID.
    pub async fn place(&self, draft: &OrderDraft) -> DbResult<i64> {
        let supplier_id = draft.ensure_ready()?;
        let now = Utc::now();

        debug!(
            store_id = draft.store_id(),
            supplier_id,
            lines = draft.lines().len(),
            "Placing order"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match insert_order(&mut *tx, draft, supplier_id, now).await {
            Ok(order_id) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                info!(order_id, supplier_id, "Order placed");
                Ok(order_id)
            }
            Err(err) => {
                warn!(error = %err, "Order rolled back");
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                Err(err)
            }
        }
    }

    pub async fn get_by_id(&self, order_id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT order_id, store_id, supplier_id, order_date, status, stocked_at
            FROM order_table
            WHERE order_id = ?
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Orders a store placed with a supplier, newest first.
    pub async fn list_for_store_and_supplier(
        &self,
        store_id: i64,
        supplier_id: i64,
    ) -> DbResult<Vec<OrderSummary>> {
        let orders = sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT order_id, order_date, status
            FROM order_table
            WHERE store_id = ? AND supplier_id = ?
            ORDER BY order_date DESC, order_id DESC
            "#,
        )
        .bind(store_id)
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Receipt header: store, supplier, product names and total quantity.
    pub async fn receipt(&self, order_id: i64) -> DbResult<Option<OrderReceipt>> {
        let receipt = sqlx::query_as::<_, OrderReceipt>(
            r#"
            SELECT
                o.order_id,
                o.order_date,
                o.status,
                s.name AS store_name,
                sp.name AS supplier_name,
                COALESCE(GROUP_CONCAT(p.name, ', '), '') AS product_names,
                COALESCE(SUM(d.quantity), 0) AS total_quantity
            FROM order_table o
            JOIN store s ON s.store_id = o.store_id
            JOIN supplier sp ON sp.supplier_id = o.supplier_id
            LEFT JOIN order_details d ON d.order_id = o.order_id
            LEFT JOIN product p ON p.product_id = d.product_id
            WHERE o.order_id = ?
            GROUP BY o.order_id
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Itemized lines of an order, in entry order.
    pub async fn receipt_lines(&self, order_id: i64) -> DbResult<Vec<ReceiptLine>> {
        let lines = sqlx::query_as::<_, ReceiptLine>(
            r#"
            SELECT
                p.name AS product_name,
                d.quantity,
                p.price AS unit_price,
                d.quantity * p.price AS line_total
            FROM order_details d
            JOIN product p ON p.product_id = d.product_id
            WHERE d.order_id = ?
            ORDER BY d.order_detail_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Moves an order to `next`, refusing moves the lifecycle doesn't allow.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such order
    /// * `DbError::Rule(InvalidStatusTransition)` - e.g. Delivered → Pending
    pub async fn update_status(&self, order_id: i64, next: OrderStatus) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match set_status(&mut *tx, order_id, next).await {
            Ok(previous) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                info!(order_id, from = %previous, to = %next, "Order status updated");
                Ok(())
            }
            Err(err) => {
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                Err(err)
            }
        }
    }

    /// Adds every delivered, not yet stocked order to its store's stock.
    ///
    /// Each order is stamped with `stocked_at`, so a second run finds
    /// nothing to do.
    pub async fn receive_deliveries(&self) -> DbResult<DeliveryReport> {
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match receive_pending(&mut *tx, now).await {
            Ok(report) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                info!(
                    orders = report.orders,
                    units = report.units,
                    "Deliveries received"
                );
                Ok(report)
            }
            Err(err) => {
                warn!(error = %err, "Receiving deliveries rolled back");
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                Err(err)
            }
        }
    }
}

// =============================================================================
// Transaction bodies
// =============================================================================

async fn insert_order(
    conn: &mut SqliteConnection,
    draft: &OrderDraft,
    supplier_id: i64,
    now: DateTime<Utc>,
) -> DbResult<i64> {
    let result = sqlx::query(
        "INSERT INTO order_table (store_id, supplier_id, order_date, status) VALUES (?, ?, ?, ?)",
    )
    .bind(draft.store_id())
    .bind(supplier_id)
    .bind(now)
    .bind(OrderStatus::Pending)
    .execute(&mut *conn)
    .await?;

    let order_id = result.last_insert_rowid();

    for line in draft.lines() {
        sqlx::query("INSERT INTO order_details (order_id, product_id, quantity) VALUES (?, ?, ?)")
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .execute(&mut *conn)
            .await?;
    }

    Ok(order_id)
}

async fn set_status(
    conn: &mut SqliteConnection,
    order_id: i64,
    next: OrderStatus,
) -> DbResult<OrderStatus> {
    let current: OrderStatus =
        sqlx::query_scalar("SELECT status FROM order_table WHERE order_id = ?")
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

    if !current.can_transition_to(next) {
        return Err(CoreError::InvalidStatusTransition {
            order_id,
            from: current,
            to: next,
        }
        .into());
    }

    sqlx::query("UPDATE order_table SET status = ? WHERE order_id = ?")
        .bind(next)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;

    Ok(current)
}

async fn receive_pending(conn: &mut SqliteConnection, now: DateTime<Utc>) -> DbResult<DeliveryReport> {
    let orders: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT order_id, store_id
        FROM order_table
        WHERE status = ? AND stocked_at IS NULL
        ORDER BY order_id
        "#,
    )
    .bind(OrderStatus::Delivered)
    .fetch_all(&mut *conn)
    .await?;

    let mut report = DeliveryReport::default();

    for (order_id, store_id) in orders {
        let lines: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT product_id, quantity FROM order_details WHERE order_id = ? ORDER BY order_detail_id",
        )
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await?;

        for (product_id, quantity) in lines {
            stock::add_units(&mut *conn, store_id, product_id, quantity, now).await?;
            report.units += quantity;
        }

        sqlx::query("UPDATE order_table SET stocked_at = ? WHERE order_id = ?")
            .bind(now)
            .bind(order_id)
            .execute(&mut *conn)
            .await?;

        debug!(order_id, store_id, "Order stocked");
        report.orders += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use crate::seed::seed_demo_data;
    use crate::{Database, DbConfig, DbError};
    use cvs_core::{CoreError, OrderDraft, OrderStatus};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        db
    }

    async fn store_id(db: &Database, name: &str) -> i64 {
        db.stores().search_by_name(name, 1).await.unwrap()[0].store_id
    }

    async fn product(db: &Database, name: &str) -> cvs_core::Product {
        db.products().search_by_name(name, 1).await.unwrap()[0].clone()
    }

    #[tokio::test]
    async fn test_place_order_writes_header_and_lines() {
        let db = seeded().await;
        let hongdae = store_id(&db, "Hongdae").await;
        let shin = product(&db, "Shin Ramyun").await;
        let chapa = product(&db, "Chapagetti").await;

        let mut draft = OrderDraft::new(hongdae);
        draft.add(&shin, 20).unwrap();
        draft.add(&chapa, 10).unwrap();

        let order_id = db.orders().place(&draft).await.unwrap();

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.store_id, hongdae);
        assert_eq!(order.supplier_id, shin.supplier_id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.stocked_at.is_none());

        let lines = db.orders().receipt_lines(order_id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_name, "Shin Ramyun");
        assert_eq!(lines[0].quantity, 20);
        assert_eq!(lines[0].line_total, 20 * 1_200);

        let receipt = db.orders().receipt(order_id).await.unwrap().unwrap();
        assert_eq!(receipt.store_name, "GS25 Hongdae");
        assert_eq!(receipt.supplier_name, "Nongshim");
        assert_eq!(receipt.total_quantity, 30);
        let mut names: Vec<&str> = receipt.product_names.split(", ").collect();
        names.sort();
        assert_eq!(names, vec!["Chapagetti", "Shin Ramyun"]);

        // Newest first
        let listed = db
            .orders()
            .list_for_store_and_supplier(hongdae, shin.supplier_id)
            .await
            .unwrap();
        assert_eq!(listed[0].order_id, order_id);
    }

    #[tokio::test]
    async fn test_place_empty_draft_is_refused() {
        let db = seeded().await;
        let err = db.orders().place(&OrderDraft::new(1)).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::Empty("Order"))));
    }

    #[tokio::test]
    async fn test_receive_deliveries_is_idempotent() {
        let db = seeded().await;
        let gangnam = store_id(&db, "Gangnam").await;
        let shin = product(&db, "Shin Ramyun").await;

        let before = db
            .stock()
            .quantity_of(gangnam, shin.product_id)
            .await
            .unwrap()
            .unwrap_or(0);

        // The demo data holds one delivered, unstocked order for Gangnam.
        let first = db.orders().receive_deliveries().await.unwrap();
        assert_eq!(first.orders, 1);
        assert!(first.units > 0);

        let after = db
            .stock()
            .quantity_of(gangnam, shin.product_id)
            .await
            .unwrap()
            .unwrap();
        assert!(after > before);

        let second = db.orders().receive_deliveries().await.unwrap();
        assert_eq!(second.orders, 0);
        assert_eq!(second.units, 0);
        assert_eq!(
            db.stock().quantity_of(gangnam, shin.product_id).await.unwrap(),
            Some(after)
        );
    }

    #[tokio::test]
    async fn test_delivery_stocks_the_ordering_store_only() {
        let db = seeded().await;
        db.orders().receive_deliveries().await.unwrap();

        let jamsil = store_id(&db, "Jamsil").await;
        let saeukkang = product(&db, "Saeukkang").await;
        let before = db
            .stock()
            .quantity_of(jamsil, saeukkang.product_id)
            .await
            .unwrap();

        let mut draft = OrderDraft::new(jamsil);
        draft.add(&saeukkang, 12).unwrap();
        let order_id = db.orders().place(&draft).await.unwrap();

        // Pending orders are not received
        assert_eq!(db.orders().receive_deliveries().await.unwrap().orders, 0);

        db.orders()
            .update_status(order_id, OrderStatus::Shipped)
            .await
            .unwrap();
        db.orders()
            .update_status(order_id, OrderStatus::Delivered)
            .await
            .unwrap();

        let report = db.orders().receive_deliveries().await.unwrap();
        assert_eq!(report.orders, 1);
        assert_eq!(report.units, 12);

        let after = db
            .stock()
            .quantity_of(jamsil, saeukkang.product_id)
            .await
            .unwrap();
        assert_eq!(after, Some(before.unwrap_or(0) + 12));

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert!(order.stocked_at.is_some());
    }

    #[tokio::test]
    async fn test_update_status_refuses_invalid_transition() {
        let db = seeded().await;
        let hongdae = store_id(&db, "Hongdae").await;
        let melona = product(&db, "Melona").await;

        let mut draft = OrderDraft::new(hongdae);
        draft.add(&melona, 5).unwrap();
        let order_id = db.orders().place(&draft).await.unwrap();

        db.orders()
            .update_status(order_id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let err = db
            .orders()
            .update_status(order_id, OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InvalidStatusTransition {
                from: OrderStatus::Cancelled,
                to: OrderStatus::Pending,
                ..
            })
        ));

        let order = db.orders().get_by_id(order_id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);

        let err = db
            .orders()
            .update_status(9_999, OrderStatus::Shipped)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
