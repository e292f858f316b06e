//! # Product Repository
//!
//! Catalog lookups. Products are chain-wide; what a store actually holds
//! lives in `stock` (see [`super::stock`]).

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::error::DbResult;
use cvs_core::validation::{validate_keyword, validate_name, validate_price};
use cvs_core::{NewProduct, Product};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search_by_name("ramyun", 50).await?;
/// let product = repo.get_by_id(3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Products whose name contains `keyword`, ordered by name.
    ///
    /// ## Arguments
    /// * `keyword` - Partial name; empty lists the catalog
    /// * `limit` - Maximum results to return
    pub async fn search_by_name(&self, keyword: &str, limit: u32) -> DbResult<Vec<Product>> {
        let keyword = validate_keyword(keyword)?;

        debug!(keyword = %keyword, limit = %limit, "Searching products");

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, category, price, supplier_id
            FROM product
            WHERE name LIKE ? ESCAPE '\'
            ORDER BY name, product_id
            LIMIT ?
            "#,
        )
        .bind(like_pattern(&keyword))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Products from one supplier whose name contains `keyword`.
    ///
    /// Used while building an order, once the first line has fixed the
    /// supplier.
    pub async fn search_for_supplier(
        &self,
        supplier_id: i64,
        keyword: &str,
        limit: u32,
    ) -> DbResult<Vec<Product>> {
        let keyword = validate_keyword(keyword)?;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, name, category, price, supplier_id
            FROM product
            WHERE supplier_id = ? AND name LIKE ? ESCAPE '\'
            ORDER BY name, product_id
            LIMIT ?
            "#,
        )
        .bind(supplier_id)
        .bind(like_pattern(&keyword))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, product_id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT product_id, name, category, price, supplier_id FROM product WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its new ID
    /// * `Err(DbError::ForeignKeyViolation)` - Supplier doesn't exist
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        validate_name("product name", &new.name)?;
        validate_name("category", &new.category)?;
        validate_price(new.price)?;

        debug!(name = %new.name, price = new.price, "Inserting product");

        let result = sqlx::query(
            "INSERT INTO product (name, category, price, supplier_id) VALUES (?, ?, ?, ?)",
        )
        .bind(new.name.trim())
        .bind(new.category.trim())
        .bind(new.price)
        .bind(new.supplier_id)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            product_id: result.last_insert_rowid(),
            name: new.name.trim().to_string(),
            category: new.category.trim().to_string(),
            price: new.price,
            supplier_id: new.supplier_id,
        })
    }
}
