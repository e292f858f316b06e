//! # Report Repository
//!
//! Sales leaderboard: employees ranked by the value they rang up.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use cvs_core::{ReportPeriod, SalesLeader};

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Employees ranked by Σ(quantity × price) over `period`.
    ///
    /// `None` ranks over all recorded sales. Ties are broken by employee ID,
    /// and employees without sales in the period are left out.
    pub async fn top_sellers(
        &self,
        period: Option<ReportPeriod>,
        limit: u32,
    ) -> DbResult<Vec<SalesLeader>> {
        let start = period.map(|p| p.start);
        let end = period.map(|p| p.end);

        debug!(
            period = %period.map(|p| p.label()).unwrap_or_else(|| "all".to_string()),
            limit,
            "Ranking sellers"
        );

        let leaders = sqlx::query_as::<_, SalesLeader>(
            r#"
            SELECT
                e.employee_id,
                e.name AS employee_name,
                s.name AS store_name,
                SUM(td.quantity * p.price) AS total_sales
            FROM employee e
            JOIN store s ON s.store_id = e.store_id
            JOIN "transaction" t ON t.employee_id = e.employee_id
            JOIN transaction_details td ON td.transaction_id = t.transaction_id
            JOIN product p ON p.product_id = td.product_id
            WHERE (? IS NULL OR t.transaction_date >= ?)
              AND (? IS NULL OR t.transaction_date < ?)
            GROUP BY e.employee_id, e.name, s.name
            ORDER BY total_sales DESC, e.employee_id
            LIMIT ?
            "#,
        )
        .bind(start)
        .bind(start)
        .bind(end)
        .bind(end)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(leaders)
    }
}

#[cfg(test)]
mod tests {
    use crate::seed::seed_demo_data;
    use crate::{Database, DbConfig};
    use cvs_core::{ReportPeriod, SaleBasket};

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_demo_data(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_january_leaderboard() {
        let db = seeded().await;
        let january = ReportPeriod::month(2026, 1).unwrap();

        let leaders = db.reports().top_sellers(Some(january), 10).await.unwrap();
        assert!(!leaders.is_empty());

        // Sorted by total, descending
        for pair in leaders.windows(2) {
            assert!(pair[0].total_sales >= pair[1].total_sales);
        }
        assert_eq!(leaders[0].employee_name, "Kim Cheolsu");
        assert_eq!(leaders[0].store_name, "GS25 Gangnam");

        let top_one = db.reports().top_sellers(Some(january), 1).await.unwrap();
        assert_eq!(top_one.len(), 1);
        assert_eq!(top_one[0], leaders[0]);
    }

    #[tokio::test]
    async fn test_month_without_sales_is_empty() {
        let db = seeded().await;
        let march_2020 = ReportPeriod::month(2020, 3).unwrap();

        assert!(db
            .reports()
            .top_sellers(Some(march_2020), 10)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_all_time_includes_new_sales() {
        let db = seeded().await;
        let january = ReportPeriod::month(2026, 1).unwrap();

        let jamsil = db.stores().search_by_name("Jamsil", 1).await.unwrap()[0].store_id;
        let choi = db.employees().search_in_store(jamsil, "", 1).await.unwrap()[0].clone();
        let melona = db.products().search_by_name("Melona", 1).await.unwrap()[0].clone();

        let january_total = db
            .reports()
            .top_sellers(Some(january), 10)
            .await
            .unwrap()
            .into_iter()
            .find(|l| l.employee_id == choi.employee_id)
            .map(|l| l.total_sales)
            .unwrap_or(0);

        let mut basket = SaleBasket::new(jamsil, choi.employee_id);
        basket.add(&melona, 2).unwrap();
        db.sales().record(&basket).await.unwrap();

        let all_time = db.reports().top_sellers(None, 10).await.unwrap();
        let choi_all = all_time
            .iter()
            .find(|l| l.employee_id == choi.employee_id)
            .unwrap();
        assert_eq!(choi_all.total_sales, january_total + 2 * 1_000);

        // A sale made today is not part of January 2026
        let january_again = db
            .reports()
            .top_sellers(Some(january), 10)
            .await
            .unwrap()
            .into_iter()
            .find(|l| l.employee_id == choi.employee_id)
            .map(|l| l.total_sales)
            .unwrap_or(0);
        assert_eq!(january_again, january_total);
    }
}
