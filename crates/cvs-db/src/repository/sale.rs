//! # Sale Repository
//!
//! Customer sales: the `transaction` table and its `transaction_details`.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  record(basket)  (one DB transaction)                   │
//! │                                                                         │
//! │  1. employee.store_id == basket.store_id ?    else EmployeeNotInStore  │
//! │  2. per line: stock row exists ?              else NotStocked          │
//! │              quantity >= requested ?          else InsufficientStock   │
//! │  3. INSERT "transaction" (now, payment method)                         │
//! │  4. per line: INSERT transaction_details                               │
//! │              UPDATE stock ... WHERE quantity >= n                      │
//! │              0 rows → InsufficientStock (someone sold it first)        │
//! │  5. COMMIT, report remaining stock                                     │
//! │                                                                         │
//! │  Any error → ROLLBACK: no header, no lines, no stock change            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::stock;
use crate::error::{DbError, DbResult};
use cvs_core::{
    CoreError, ReceiptLine, RemainingStock, Sale, SaleBasket, SaleOutcome, SaleReceipt,
    SaleSummary,
};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale and decrements stock, all or nothing.
    ///
    /// ## Returns
    /// The new transaction ID and the stock left for each product sold.
    ///
    /// ## Errors
    /// * `Rule(Empty)` - Basket has no lines
    /// * `Rule(EmployeeNotInStore)` - Cashier works elsewhere
    /// * `Rule(NotStocked)` / `Rule(InsufficientStock)` - Not enough on hand
    pub async fn record(&self, basket: &SaleBasket) -> DbResult<SaleOutcome> {
        basket.ensure_ready()?;
        let now = Utc::now();

        debug!(
            store_id = basket.store_id(),
            employee_id = basket.employee_id(),
            lines = basket.lines().len(),
            payment = %basket.payment_method(),
            "Recording sale"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        match record_in_tx(&mut *tx, basket, now).await {
            Ok(outcome) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                info!(
                    transaction_id = outcome.transaction_id,
                    total = basket.total().minor(),
                    "Sale recorded"
                );
                Ok(outcome)
            }
            Err(err) => {
                warn!(error = %err, "Sale rolled back");
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                Err(err)
            }
        }
    }

    pub async fn get_by_id(&self, transaction_id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT transaction_id, store_id, employee_id, transaction_date, payment_method
            FROM "transaction"
            WHERE transaction_id = ?
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// An employee's sales with their totals, newest first.
    pub async fn list_for_employee(&self, employee_id: i64) -> DbResult<Vec<SaleSummary>> {
        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT
                t.transaction_id,
                t.transaction_date,
                COALESCE(SUM(td.quantity * p.price), 0) AS total_price
            FROM "transaction" t
            LEFT JOIN transaction_details td ON td.transaction_id = t.transaction_id
            LEFT JOIN product p ON p.product_id = td.product_id
            WHERE t.employee_id = ?
            GROUP BY t.transaction_id
            ORDER BY t.transaction_date DESC, t.transaction_id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Receipt header for one sale.
    pub async fn receipt(&self, transaction_id: i64) -> DbResult<Option<SaleReceipt>> {
        let receipt = sqlx::query_as::<_, SaleReceipt>(
            r#"
            SELECT
                t.transaction_id,
                t.transaction_date,
                s.name AS store_name,
                e.name AS employee_name,
                t.payment_method,
                COALESCE(GROUP_CONCAT(p.name, ', '), '') AS product_names,
                COALESCE(SUM(td.quantity), 0) AS total_quantity,
                COALESCE(SUM(td.quantity * p.price), 0) AS total_price
            FROM "transaction" t
            JOIN store s ON s.store_id = t.store_id
            JOIN employee e ON e.employee_id = t.employee_id
            LEFT JOIN transaction_details td ON td.transaction_id = t.transaction_id
            LEFT JOIN product p ON p.product_id = td.product_id
            WHERE t.transaction_id = ?
            GROUP BY t.transaction_id
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    /// Itemized lines of a sale, in entry order.
    pub async fn receipt_lines(&self, transaction_id: i64) -> DbResult<Vec<ReceiptLine>> {
        let lines = sqlx::query_as::<_, ReceiptLine>(
            r#"
            SELECT
                p.name AS product_name,
                td.quantity,
                p.price AS unit_price,
                td.quantity * p.price AS line_total
            FROM transaction_details td
            JOIN product p ON p.product_id = td.product_id
            WHERE td.transaction_id = ?
            ORDER BY td.transaction_detail_id
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Transaction body
// =============================================================================

async fn record_in_tx(
    conn: &mut SqliteConnection,
    basket: &SaleBasket,
    now: DateTime<Utc>,
) -> DbResult<SaleOutcome> {
    let store_id = basket.store_id();
    let employee_id = basket.employee_id();

    let employee_store: i64 =
        sqlx::query_scalar("SELECT store_id FROM employee WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("Employee", employee_id))?;

    if employee_store != store_id {
        return Err(CoreError::EmployeeNotInStore {
            employee_id,
            store_id,
        }
        .into());
    }

    for line in basket.lines() {
        let available = stock::quantity_of(&mut *conn, store_id, line.product_id)
            .await?
            .ok_or(CoreError::NotStocked {
                store_id,
                product_id: line.product_id,
            })?;

        if available < line.quantity {
            return Err(CoreError::InsufficientStock {
                product: line.product_name.clone(),
                available,
                requested: line.quantity,
            }
            .into());
        }
    }

    let result = sqlx::query(
        r#"
        INSERT INTO "transaction" (store_id, employee_id, transaction_date, payment_method)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(store_id)
    .bind(employee_id)
    .bind(now)
    .bind(basket.payment_method())
    .execute(&mut *conn)
    .await?;

    let transaction_id = result.last_insert_rowid();

    for line in basket.lines() {
        sqlx::query(
            "INSERT INTO transaction_details (transaction_id, product_id, quantity) VALUES (?, ?, ?)",
        )
        .bind(transaction_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *conn)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE stock
            SET quantity = quantity - ?, last_updated = ?
            WHERE store_id = ? AND product_id = ? AND quantity >= ?
            "#,
        )
        .bind(line.quantity)
        .bind(now)
        .bind(store_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *conn)
        .await?;

        if updated.rows_affected() == 0 {
            let available = stock::quantity_of(&mut *conn, store_id, line.product_id)
                .await?
                .unwrap_or(0);
            return Err(CoreError::InsufficientStock {
                product: line.product_name.clone(),
                available,
                requested: line.quantity,
            }
            .into());
        }
    }

    let mut remaining = Vec::with_capacity(basket.lines().len());
    for line in basket.lines() {
        let quantity = stock::quantity_of(&mut *conn, store_id, line.product_id)
            .await?
            .unwrap_or(0);
        remaining.push(RemainingStock {
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity,
        });
    }

    Ok(SaleOutcome {
        transaction_id,
        remaining,
    })
}

#[cfg(test)]
mod tests {
    use crate::seed::seed_demo_data;
    use crate::{Database, DbConfig, DbError};
    use cvs_core::{CoreError, PaymentMethod, Product, SaleBasket};

    struct Fixture {
        db: Database,
        gangnam: i64,
        jamsil: i64,
        kim: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        let gangnam = db.stores().search_by_name("Gangnam", 1).await.unwrap()[0].store_id;
        let jamsil = db.stores().search_by_name("Jamsil", 1).await.unwrap()[0].store_id;
        let kim = db
            .employees()
            .search_in_store(gangnam, "Kim", 1)
            .await
            .unwrap()[0]
            .employee_id;

        Fixture {
            db,
            gangnam,
            jamsil,
            kim,
        }
    }

    async fn product(db: &Database, name: &str) -> Product {
        db.products().search_by_name(name, 1).await.unwrap()[0].clone()
    }

    async fn sale_count(db: &Database) -> i64 {
        sqlx::query_scalar(r#"SELECT COUNT(*) FROM "transaction""#)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_record_sale_decrements_stock() {
        let f = fixture().await;
        let shin = product(&f.db, "Shin Ramyun").await;
        let banana = product(&f.db, "Banana Milk").await;

        let shin_before = f
            .db
            .stock()
            .quantity_of(f.gangnam, shin.product_id)
            .await
            .unwrap()
            .unwrap();
        let banana_before = f
            .db
            .stock()
            .quantity_of(f.gangnam, banana.product_id)
            .await
            .unwrap()
            .unwrap();

        let mut basket = SaleBasket::new(f.gangnam, f.kim);
        basket.add(&shin, 2).unwrap();
        basket.add(&banana, 1).unwrap();
        basket.set_payment_method(PaymentMethod::MobilePayment);

        let outcome = f.db.sales().record(&basket).await.unwrap();

        assert_eq!(outcome.remaining.len(), 2);
        assert_eq!(outcome.remaining[0].product_name, "Shin Ramyun");
        assert_eq!(outcome.remaining[0].quantity, shin_before - 2);
        assert_eq!(outcome.remaining[1].quantity, banana_before - 1);

        let sale = f
            .db
            .sales()
            .get_by_id(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(sale.payment_method, PaymentMethod::MobilePayment);
        assert_eq!(sale.employee_id, f.kim);

        let receipt = f
            .db
            .sales()
            .receipt(outcome.transaction_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(receipt.store_name, "GS25 Gangnam");
        assert_eq!(receipt.employee_name, "Kim Cheolsu");
        assert_eq!(receipt.total_quantity, 3);
        assert_eq!(receipt.total_price, 2 * 1_200 + 1_700);

        let lines = f
            .db
            .sales()
            .receipt_lines(outcome.transaction_id)
            .await
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_total, 2_400);

        let listed = f.db.sales().list_for_employee(f.kim).await.unwrap();
        assert_eq!(listed[0].transaction_id, outcome.transaction_id);
        assert_eq!(listed[0].total_price, 4_100);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let f = fixture().await;
        let shin = product(&f.db, "Shin Ramyun").await;
        let pepero = product(&f.db, "Pepero").await;

        let pepero_before = f
            .db
            .stock()
            .quantity_of(f.gangnam, pepero.product_id)
            .await
            .unwrap()
            .unwrap();
        let sales_before = sale_count(&f.db).await;

        let mut basket = SaleBasket::new(f.gangnam, f.kim);
        basket.add(&pepero, 1).unwrap();
        basket.add(&shin, 9_999).unwrap();

        let err = f.db.sales().record(&basket).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InsufficientStock {
                requested: 9_999,
                ..
            })
        ));

        assert_eq!(sale_count(&f.db).await, sales_before);
        assert_eq!(
            f.db.stock()
                .quantity_of(f.gangnam, pepero.product_id)
                .await
                .unwrap(),
            Some(pepero_before)
        );
    }

    #[tokio::test]
    async fn test_product_not_stocked_in_store() {
        let f = fixture().await;
        // The demo data leaves Jamsil without Chapagetti.
        let chapa = product(&f.db, "Chapagetti").await;
        let choi = f
            .db
            .employees()
            .search_in_store(f.jamsil, "", 1)
            .await
            .unwrap()[0]
            .employee_id;

        let mut basket = SaleBasket::new(f.jamsil, choi);
        basket.add(&chapa, 1).unwrap();

        let err = f.db.sales().record(&basket).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::NotStocked { product_id, .. }) if product_id == chapa.product_id
        ));
    }

    #[tokio::test]
    async fn test_employee_from_other_store_is_refused() {
        let f = fixture().await;
        let melona = product(&f.db, "Melona").await;
        let sales_before = sale_count(&f.db).await;

        // Kim works at Gangnam, not Jamsil
        let mut basket = SaleBasket::new(f.jamsil, f.kim);
        basket.add(&melona, 1).unwrap();

        let err = f.db.sales().record(&basket).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::EmployeeNotInStore { .. })
        ));
        assert_eq!(sale_count(&f.db).await, sales_before);
    }

    #[tokio::test]
    async fn test_empty_basket_is_refused() {
        let f = fixture().await;
        let err = f
            .db
            .sales()
            .record(&SaleBasket::new(f.gangnam, f.kim))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Rule(CoreError::Empty("Sale"))));
    }

    #[tokio::test]
    async fn test_selling_the_last_unit_leaves_zero() {
        let f = fixture().await;
        let melona = product(&f.db, "Melona").await;
        let on_hand = f
            .db
            .stock()
            .quantity_of(f.gangnam, melona.product_id)
            .await
            .unwrap()
            .unwrap();

        let mut basket = SaleBasket::new(f.gangnam, f.kim);
        basket.add(&melona, on_hand).unwrap();
        let outcome = f.db.sales().record(&basket).await.unwrap();
        assert_eq!(outcome.remaining[0].quantity, 0);

        let mut again = SaleBasket::new(f.gangnam, f.kim);
        again.add(&melona, 1).unwrap();
        let err = f.db.sales().record(&again).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Rule(CoreError::InsufficientStock { available: 0, .. })
        ));
    }
}
