//! Loans repository: borrowed copies, renewal, checkout and return

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book_instance::BookInstance,
        loan::{LoanStatus, LoanedCopyRow},
    },
};

const LOANED_COPY_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint, bi.due_back,
           bi.status, bi.borrower_id, u.username AS borrower_username
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
    LEFT JOIN users u ON u.id = bi.borrower_id
"#;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Copies on loan to one borrower, soonest due first
    pub async fn borrowed_by(&self, user_id: i32) -> AppResult<Vec<LoanedCopyRow>> {
        let rows = sqlx::query_as::<_, LoanedCopyRow>(&format!(
            "{} WHERE bi.borrower_id = $1 AND bi.status = $2 ORDER BY bi.due_back, bi.id",
            LOANED_COPY_SELECT
        ))
        .bind(user_id)
        .bind(LoanStatus::OnLoan)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Every copy on loan, soonest due first
    pub async fn all_borrowed(&self) -> AppResult<Vec<LoanedCopyRow>> {
        let rows = sqlx::query_as::<_, LoanedCopyRow>(&format!(
            "{} WHERE bi.status = $1 ORDER BY bi.due_back, bi.id",
            LOANED_COPY_SELECT
        ))
        .bind(LoanStatus::OnLoan)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Overwrite the due date of a copy
    pub async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances SET due_back = $1
            WHERE id = $2
            RETURNING id, book_id, imprint, due_back, borrower_id, status
            "#,
        )
        .bind(due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Lend a copy: it must be available or reserved
    pub async fn check_out(
        &self,
        id: Uuid,
        borrower_id: i32,
        due_back: NaiveDate,
    ) -> AppResult<BookInstance> {
        let mut tx = self.pool.begin().await?;

        let status = Self::lock_status(&mut tx, id).await?;
        if !status.can_check_out() {
            return Err(AppError::BusinessRule(format!(
                "Book instance {} cannot be checked out while its status is '{}'",
                id, status
            )));
        }

        let instance = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = $1, borrower_id = $2, due_back = $3
            WHERE id = $4
            RETURNING id, book_id, imprint, due_back, borrower_id, status
            "#,
        )
        .bind(LoanStatus::OnLoan)
        .bind(borrower_id)
        .bind(due_back)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(instance)
    }

    /// Take a copy back: it must be on loan
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        let mut tx = self.pool.begin().await?;

        let status = Self::lock_status(&mut tx, id).await?;
        if status != LoanStatus::OnLoan {
            return Err(AppError::BusinessRule(format!(
                "Book instance {} is not on loan (status '{}')",
                id, status
            )));
        }

        let instance = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET status = $1, borrower_id = NULL, due_back = NULL
            WHERE id = $2
            RETURNING id, book_id, imprint, due_back, borrower_id, status
            "#,
        )
        .bind(LoanStatus::Available)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(instance)
    }

    async fn lock_status(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<LoanStatus> {
        sqlx::query_scalar::<_, LoanStatus>("SELECT status FROM book_instances WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }
}
