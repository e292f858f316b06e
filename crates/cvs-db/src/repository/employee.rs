//! # Employee Repository
//!
//! Staff are always looked up within one store: the sale and receipt flows
//! pick a store first, then someone who works there.

use sqlx::SqlitePool;
use tracing::debug;

use super::like_pattern;
use crate::error::DbResult;
use cvs_core::validation::{validate_keyword, validate_name};
use cvs_core::{Employee, NewEmployee};

#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Employees of `store_id` whose name contains `keyword`.
    pub async fn search_in_store(
        &self,
        store_id: i64,
        keyword: &str,
        limit: u32,
    ) -> DbResult<Vec<Employee>> {
        let keyword = validate_keyword(keyword)?;

        debug!(store_id, keyword = %keyword, "Searching employees");

        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT employee_id, store_id, name, position
            FROM employee
            WHERE store_id = ? AND name LIKE ? ESCAPE '\'
            ORDER BY name, employee_id
            LIMIT ?
            "#,
        )
        .bind(store_id)
        .bind(like_pattern(&keyword))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn get_by_id(&self, employee_id: i64) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT employee_id, store_id, name, position FROM employee WHERE employee_id = ?",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Inserts an employee. Fails with a foreign key violation for an
    /// unknown store.
    pub async fn insert(&self, new: &NewEmployee) -> DbResult<Employee> {
        validate_name("employee name", &new.name)?;

        let result =
            sqlx::query("INSERT INTO employee (store_id, name, position) VALUES (?, ?, ?)")
                .bind(new.store_id)
                .bind(new.name.trim())
                .bind(&new.position)
                .execute(&self.pool)
                .await?;

        Ok(Employee {
            employee_id: result.last_insert_rowid(),
            store_id: new.store_id,
            name: new.name.trim().to_string(),
            position: new.position.clone(),
        })
    }
}
