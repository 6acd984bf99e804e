//! Users repository (borrower lookups)

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::UserShort,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<UserShort> {
        sqlx::query_as::<_, UserShort>(
            "SELECT id, username, first_name, last_name FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }
}
