//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookInput, BookSummary},
        pagination::PageWindow,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT id, title, summary, isbn, author_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One page of books ordered by title
    pub async fn list(&self, window: &PageWindow) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            r#"
            SELECT b.id, b.title, b.isbn, b.author_id,
                   a.last_name || ', ' || a.first_name AS author_name
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            ORDER BY b.title, b.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(window.per_page)
        .bind(window.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Check whether another book already uses this ISBN
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int4 IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a book and its genre/language links in one transaction
    pub async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, summary, isbn, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, summary, isbn, author_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_classification(&mut tx, book.id, data).await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Replace a book and its genre/language links in one transaction
    pub async fn update(&self, id: i32, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, summary = $2, isbn = $3, author_id = $4
            WHERE id = $5
            RETURNING id, title, summary, isbn, author_id
            "#,
        )
        .bind(&data.title)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(data.author_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM book_languages WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::link_classification(&mut tx, id, data).await?;

        tx.commit().await?;
        Ok(book)
    }

    async fn link_classification(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        data: &BookInput,
    ) -> AppResult<()> {
        if !data.genre_ids.is_empty() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int4[]) ON CONFLICT DO NOTHING",
            )
            .bind(book_id)
            .bind(&data.genre_ids)
            .execute(&mut **tx)
            .await?;
        }
        if !data.language_ids.is_empty() {
            sqlx::query(
                "INSERT INTO book_languages (book_id, language_id) SELECT $1, UNNEST($2::int4[]) ON CONFLICT DO NOTHING",
            )
            .bind(book_id)
            .bind(&data.language_ids)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Delete a book. Refused while any copy of it exists.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i32> = sqlx::query_scalar("SELECT id FROM books WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        let copies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE book_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if copies > 0 {
            return Err(AppError::BusinessRule(format!(
                "Book cannot be deleted while copies of it exist ({} found)",
                copies
            )));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
