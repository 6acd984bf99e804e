//! Languages repository for database operations

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::language::Language};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all languages
    pub async fn list(&self) -> AppResult<Vec<Language>> {
        let rows = sqlx::query_as::<_, Language>("SELECT id, name FROM languages ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Languages of one book
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<Language>> {
        let rows = sqlx::query_as::<_, Language>(
            r#"
            SELECT l.id, l.name
            FROM book_languages bl
            JOIN languages l ON l.id = bl.language_id
            WHERE bl.book_id = $1
            ORDER BY l.name, l.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// How many of `ids` name an existing language
    pub async fn count_existing(&self, ids: &[i32]) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, name: &str) -> AppResult<Language> {
        let row = sqlx::query_as::<_, Language>("INSERT INTO languages (name) VALUES ($1) RETURNING id, name")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}
