//! # Supplier Repository

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::error::DbResult;
use cvs_core::validation::{validate_keyword, validate_name};
use cvs_core::{NewSupplier, Supplier};

/// Repository for `supplier` rows.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Suppliers whose name contains `keyword`, ordered by name.
    pub async fn search_by_name(&self, keyword: &str, limit: u32) -> DbResult<Vec<Supplier>> {
        let keyword = validate_keyword(keyword)?;

        debug!(keyword = %keyword, "Searching suppliers");

        let suppliers = sqlx::query_as::<_, Supplier>(
            r#"
            SELECT supplier_id, name, contact
            FROM supplier
            WHERE name LIKE ? ESCAPE '\'
            ORDER BY name, supplier_id
            LIMIT ?
            "#,
        )
        .bind(like_pattern(&keyword))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn get_by_id(&self, supplier_id: i64) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT supplier_id, name, contact FROM supplier WHERE supplier_id = ?",
        )
        .bind(supplier_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    pub async fn insert(&self, new: &NewSupplier) -> DbResult<Supplier> {
        validate_name("supplier name", &new.name)?;

        let result = sqlx::query("INSERT INTO supplier (name, contact) VALUES (?, ?)")
            .bind(new.name.trim())
            .bind(&new.contact)
            .execute(&self.pool)
            .await?;

        Ok(Supplier {
            supplier_id: result.last_insert_rowid(),
            name: new.name.trim().to_string(),
            contact: new.contact.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use cvs_core::NewSupplier;

    #[tokio::test]
    async fn test_insert_search_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suppliers();

        for name in ["Nongshim", "Lotte Confectionery", "Binggrae"] {
            repo.insert(&NewSupplier {
                name: name.to_string(),
                contact: Some("02-000-0000".to_string()),
            })
            .await
            .unwrap();
        }

        let found = repo.search_by_name("o", 50).await.unwrap();
        let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Lotte Confectionery", "Nongshim"]);

        let first = repo.get_by_id(found[0].supplier_id).await.unwrap().unwrap();
        assert_eq!(first.name, "Lotte Confectionery");
        assert_eq!(first.contact.as_deref(), Some("02-000-0000"));
    }
}
