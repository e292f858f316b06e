//! # Store Repository
//!
//! Lookup and keyword search over franchise locations.

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::error::DbResult;
use cvs_core::validation::{validate_keyword, validate_name};
use cvs_core::{NewStore, Store};

/// Repository for `store` rows.
#[derive(Debug, Clone)]
pub struct StoreRepository {
    pool: SqlitePool,
}

impl StoreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StoreRepository { pool }
    }

    /// Stores whose name contains `keyword`, ordered by name.
    ///
    /// An empty keyword lists every store (up to `limit`).
    pub async fn search_by_name(&self, keyword: &str, limit: u32) -> DbResult<Vec<Store>> {
        let keyword = validate_keyword(keyword)?;

        debug!(keyword = %keyword, limit = %limit, "Searching stores");

        let stores = sqlx::query_as::<_, Store>(
            r#"
            SELECT store_id, name, address, phone
            FROM store
            WHERE name LIKE ? ESCAPE '\'
            ORDER BY name, store_id
            LIMIT ?
            "#,
        )
        .bind(like_pattern(&keyword))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = stores.len(), "Store search returned");
        Ok(stores)
    }

    pub async fn get_by_id(&self, store_id: i64) -> DbResult<Option<Store>> {
        let store = sqlx::query_as::<_, Store>(
            "SELECT store_id, name, address, phone FROM store WHERE store_id = ?",
        )
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(store)
    }

    /// Inserts a store and returns it with its new ID.
    pub async fn insert(&self, new: &NewStore) -> DbResult<Store> {
        validate_name("store name", &new.name)?;

        debug!(name = %new.name, "Inserting store");

        let result = sqlx::query("INSERT INTO store (name, address, phone) VALUES (?, ?, ?)")
            .bind(new.name.trim())
            .bind(&new.address)
            .bind(&new.phone)
            .execute(&self.pool)
            .await?;

        Ok(Store {
            store_id: result.last_insert_rowid(),
            name: new.name.trim().to_string(),
            address: new.address.clone(),
            phone: new.phone.clone(),
        })
    }

    /// Counts stores (for diagnostics and the seed guard).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM store")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig, DbError};
    use cvs_core::NewStore;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_store(name: &str) -> NewStore {
        NewStore {
            name: name.to_string(),
            address: Some("Seoul".to_string()),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = db().await;
        let repo = db.stores();

        let store = repo.insert(&new_store("GS25 Gangnam")).await.unwrap();
        assert!(store.store_id > 0);

        let found = repo.get_by_id(store.store_id).await.unwrap().unwrap();
        assert_eq!(found, store);
        assert!(repo.get_by_id(9_999).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let db = db().await;
        let repo = db.stores();
        for name in ["GS25 Hongdae", "CU Jamsil", "GS25 Gangnam", "100% Mart"] {
            repo.insert(&new_store(name)).await.unwrap();
        }

        let gs: Vec<String> = repo
            .search_by_name("gs25", 50)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        // SQLite LIKE is case-insensitive for ASCII
        assert_eq!(gs, vec!["GS25 Gangnam", "GS25 Hongdae"]);

        assert_eq!(repo.search_by_name("", 50).await.unwrap().len(), 4);
        assert_eq!(repo.search_by_name("", 2).await.unwrap().len(), 2);
        assert!(repo.search_by_name("Lawson", 50).await.unwrap().is_empty());

        // The wildcard is matched literally
        let pct = repo.search_by_name("%", 50).await.unwrap();
        assert_eq!(pct.len(), 1);
        assert_eq!(pct[0].name, "100% Mart");
    }

    #[tokio::test]
    async fn test_rejects_blank_name_and_long_keyword() {
        let db = db().await;
        let repo = db.stores();

        let err = repo.insert(&new_store("  ")).await.unwrap_err();
        assert!(err.is_rule());

        let err = repo.search_by_name(&"x".repeat(101), 50).await.unwrap_err();
        assert!(matches!(err, DbError::Rule(_)));
    }
}
