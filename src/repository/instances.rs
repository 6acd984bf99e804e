//! Book instance (copy) repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
        loan::LoanStatus,
    },
};

const INSTANCE_COLUMNS: &str = "id, book_id, imprint, due_back, borrower_id, status";

#[derive(Clone)]
pub struct InstancesRepository {
    pool: Pool<Postgres>,
}

impl InstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE id = $1",
            INSTANCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Copies of one book, soonest due first
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "SELECT {} FROM book_instances WHERE book_id = $1 ORDER BY due_back, id",
            INSTANCE_COLUMNS
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Create a copy with a freshly generated identifier
    pub async fn create(&self, book_id: i32, data: &CreateBookInstance) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.status.unwrap_or_default())
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the editable fields of a copy
    pub async fn update(&self, id: Uuid, data: &UpdateBookInstance) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!(
            r#"
            UPDATE book_instances
            SET imprint = $1, status = $2, due_back = $3, borrower_id = $4
            WHERE id = $5
            RETURNING {}
            "#,
            INSTANCE_COLUMNS
        ))
        .bind(&data.imprint)
        .bind(data.status)
        .bind(data.due_back)
        .bind(data.borrower_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}
