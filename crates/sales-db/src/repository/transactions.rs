//! Transaction operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewTransaction, Transaction, TransactionChanges};
use crate::repository::Database;

const SELECT_TRANSACTION: &str = r#"
    SELECT tid, transaction_date, product, transaction_count, price,
           transaction_count * price AS estimated_total,
           actual_total, handler1, handler2, handler3, remarks
    FROM transactions
"#;

impl Database {
    // ==================== Transaction Operations ====================

    /// Insert a new transaction
    ///
    /// Fails with [`DbError::Constraint`] if the product or any handler
    /// does not exist.
    pub async fn insert_transaction(&self, tx: NewTransaction) -> Result<Transaction, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (transaction_date, product, transaction_count, price, actual_total, handler1, handler2, handler3, remarks)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING tid
            "#,
        )
        .bind(tx.transaction_date.to_rfc3339())
        .bind(tx.product)
        .bind(tx.transaction_count)
        .bind(tx.price)
        .bind(tx.actual_total)
        .bind(tx.handler1)
        .bind(tx.handler2)
        .bind(tx.handler3)
        .bind(&tx.remarks)
        .fetch_one(&self.pool)
        .await?;

        Ok(Transaction {
            tid: result.get("tid"),
            transaction_date: tx.transaction_date,
            product: tx.product,
            transaction_count: tx.transaction_count,
            price: tx.price,
            estimated_total: tx.transaction_count * tx.price,
            actual_total: tx.actual_total,
            handler1: tx.handler1,
            handler2: tx.handler2,
            handler3: tx.handler3,
            remarks: tx.remarks,
        })
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, tid: i64) -> Result<Option<Transaction>, DbError> {
        let result = sqlx::query(&format!("{SELECT_TRANSACTION} WHERE tid = ?"))
            .bind(tid)
            .fetch_optional(&self.pool)
            .await?;

        result
            .map(|row| Transaction::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all transactions, oldest first
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, DbError> {
        let rows = sqlx::query(&format!("{SELECT_TRANSACTION} ORDER BY transaction_date, tid"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Transaction::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update; unset fields keep their stored value
    pub async fn update_transaction(
        &self,
        tid: i64,
        changes: TransactionChanges,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                transaction_date = COALESCE(?, transaction_date),
                product = COALESCE(?, product),
                transaction_count = COALESCE(?, transaction_count),
                price = COALESCE(?, price),
                actual_total = COALESCE(?, actual_total),
                handler1 = COALESCE(?, handler1),
                handler2 = COALESCE(?, handler2),
                handler3 = COALESCE(?, handler3),
                remarks = COALESCE(?, remarks)
            WHERE tid = ?
            "#,
        )
        .bind(changes.transaction_date.map(|d| d.to_rfc3339()))
        .bind(changes.product)
        .bind(changes.transaction_count)
        .bind(changes.price)
        .bind(changes.actual_total)
        .bind(changes.handler1)
        .bind(changes.handler2)
        .bind(changes.handler3)
        .bind(changes.remarks)
        .bind(tid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a transaction
    pub async fn delete_transaction(&self, tid: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM transactions WHERE tid = ?")
            .bind(tid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
