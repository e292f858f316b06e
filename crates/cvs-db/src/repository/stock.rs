//! # Stock Repository
//!
//! Per-store inventory: one row per (store, product) the store carries.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Receive deliveries ──► add()            quantity += n (row created)   │
//! │  Record sale        ──► guarded decrement quantity -= n                │
//! │                         WHERE quantity >= n  (sale.rs)                 │
//! │  CHECK (quantity >= 0) backs both paths                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use cvs_core::validation::validate_quantity;
use cvs_core::StockLevel;

#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Everything `store_id` carries, ordered by product name.
    pub async fn list_for_store(&self, store_id: i64) -> DbResult<Vec<StockLevel>> {
        debug!(store_id, "Listing store inventory");

        let levels = sqlx::query_as::<_, StockLevel>(
            r#"
            SELECT
                s.product_id,
                p.name AS product_name,
                p.category,
                s.quantity,
                s.last_updated
            FROM stock s
            JOIN product p ON p.product_id = s.product_id
            WHERE s.store_id = ?
            ORDER BY p.name, s.product_id
            "#,
        )
        .bind(store_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    /// Units on hand, or `None` when the store has no row for the product.
    pub async fn quantity_of(&self, store_id: i64, product_id: i64) -> DbResult<Option<i64>> {
        let mut conn = self.pool.acquire().await?;
        quantity_of(&mut *conn, store_id, product_id).await
    }

    /// Adds `quantity` units, creating the stock row if needed.
    pub async fn add(&self, store_id: i64, product_id: i64, quantity: i64) -> DbResult<()> {
        validate_quantity(quantity)?;

        let mut conn = self.pool.acquire().await?;
        add_units(&mut *conn, store_id, product_id, quantity, Utc::now()).await
    }
}

// =============================================================================
// Shared statements (run inside callers' transactions)
// =============================================================================

pub(crate) async fn quantity_of(
    conn: &mut SqliteConnection,
    store_id: i64,
    product_id: i64,
) -> DbResult<Option<i64>> {
    let quantity: Option<i64> =
        sqlx::query_scalar("SELECT quantity FROM stock WHERE store_id = ? AND product_id = ?")
            .bind(store_id)
            .bind(product_id)
            .fetch_optional(&mut *conn)
            .await?;

    Ok(quantity)
}

/// Upserts `quantity` more units of a product at a store.
pub(crate) async fn add_units(
    conn: &mut SqliteConnection,
    store_id: i64,
    product_id: i64,
    quantity: i64,
    now: DateTime<Utc>,
) -> DbResult<()> {
    debug!(store_id, product_id, quantity, "Adding stock");

    sqlx::query(
        r#"
        INSERT INTO stock (store_id, product_id, quantity, last_updated)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (store_id, product_id) DO UPDATE SET
            quantity = quantity + excluded.quantity,
            last_updated = excluded.last_updated
        "#,
    )
    .bind(store_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use cvs_core::{NewProduct, NewStore, NewSupplier};

    async fn setup() -> (Database, i64, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db
            .stores()
            .insert(&NewStore {
                name: "CU Jamsil".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        let supplier = db
            .suppliers()
            .insert(&NewSupplier {
                name: "Binggrae".to_string(),
                contact: None,
            })
            .await
            .unwrap();
        let melona = db
            .products()
            .insert(&NewProduct {
                name: "Melona".to_string(),
                category: "Ice Cream".to_string(),
                price: 1_000,
                supplier_id: supplier.supplier_id,
            })
            .await
            .unwrap();
        let banana = db
            .products()
            .insert(&NewProduct {
                name: "Banana Milk".to_string(),
                category: "Dairy".to_string(),
                price: 1_700,
                supplier_id: supplier.supplier_id,
            })
            .await
            .unwrap();
        (db, store.store_id, melona.product_id, banana.product_id)
    }

    #[tokio::test]
    async fn test_add_creates_then_accumulates() {
        let (db, store_id, melona, _) = setup().await;
        let repo = db.stock();

        assert_eq!(repo.quantity_of(store_id, melona).await.unwrap(), None);

        repo.add(store_id, melona, 10).await.unwrap();
        repo.add(store_id, melona, 5).await.unwrap();
        assert_eq!(repo.quantity_of(store_id, melona).await.unwrap(), Some(15));

        assert!(repo.add(store_id, melona, 0).await.unwrap_err().is_rule());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_product_name() {
        let (db, store_id, melona, banana) = setup().await;
        let repo = db.stock();

        repo.add(store_id, melona, 3).await.unwrap();
        repo.add(store_id, banana, 7).await.unwrap();

        let levels = repo.list_for_store(store_id).await.unwrap();
        let rows: Vec<(&str, &str, i64)> = levels
            .iter()
            .map(|l| (l.product_name.as_str(), l.category.as_str(), l.quantity))
            .collect();
        assert_eq!(
            rows,
            vec![("Banana Milk", "Dairy", 7), ("Melona", "Ice Cream", 3)]
        );

        assert!(repo.list_for_store(store_id + 100).await.unwrap().is_empty());
    }
}
