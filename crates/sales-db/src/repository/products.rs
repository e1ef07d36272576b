//! Product operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::Product;
use crate::repository::Database;

impl Database {
    // ==================== Product Operations ====================

    /// Insert a new product
    pub async fn insert_product(&self, product_name: &str) -> Result<Product, DbError> {
        let result = sqlx::query("INSERT INTO products (product_name) VALUES (?) RETURNING pid")
            .bind(product_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(Product {
            pid: result.get("pid"),
            product_name: product_name.to_string(),
        })
    }

    /// Get a product by ID
    pub async fn get_product(&self, pid: i64) -> Result<Option<Product>, DbError> {
        let result = sqlx::query("SELECT pid, product_name FROM products WHERE pid = ?")
            .bind(pid)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Product::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all products
    pub async fn list_products(&self) -> Result<Vec<Product>, DbError> {
        let rows = sqlx::query("SELECT pid, product_name FROM products ORDER BY pid")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Product::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Rename a product
    pub async fn rename_product(&self, pid: i64, product_name: &str) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE products SET product_name = ? WHERE pid = ?")
            .bind(product_name)
            .bind(pid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a product
    pub async fn delete_product(&self, pid: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM products WHERE pid = ?")
            .bind(pid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
