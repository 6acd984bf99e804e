//! Book copy endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
        user::Permission,
    },
};

use super::AuthenticatedUser;

/// Add a copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/instances",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateBookInstance,
    responses(
        (status = 201, description = "Copy created", body = BookInstance),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Permission 'add_bookinstance' required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    payload: Result<Json<CreateBookInstance>, JsonRejection>,
) -> AppResult<(StatusCode, Json<BookInstance>)> {
    claims.require(Permission::AddBookinstance)?;
    let Json(data) = payload?;

    let instance = state.services.catalog.create_instance(book_id, data).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// Replace the editable fields of a copy
#[utoipa::path(
    put,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = UpdateBookInstance,
    responses(
        (status = 200, description = "Copy updated", body = BookInstance),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Permission 'change_bookinstance' required"),
        (status = 404, description = "Copy or borrower not found")
    )
)]
pub async fn update_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateBookInstance>, JsonRejection>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::ChangeBookinstance)?;
    let Json(data) = payload?;

    let instance = state.services.catalog.update_instance(id, data).await?;
    Ok(Json(instance))
}

#[utoipa::path(
    delete,
    path = "/instances/{id}",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 403, description = "Permission 'delete_bookinstance' required"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require(Permission::DeleteBookinstance)?;

    state.services.catalog.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
