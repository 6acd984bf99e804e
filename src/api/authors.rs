//! Author endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetails, AuthorInput},
        pagination::{AuthorPage, PageQuery},
        user::Permission,
    },
};

use super::AuthenticatedUser;

/// List authors, paginated
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of authors", body = AuthorPage),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<AuthorPage>> {
    let page = state.services.authors.list(query.page).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author with their books", body = AuthorDetails),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetails>> {
    let author = state.services.authors.get(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input or lifespan"),
        (status = 403, description = "Permission 'add_author' required")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<Json<AuthorInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require(Permission::AddAuthor)?;
    let Json(input) = payload?;

    let created = state.services.authors.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input or lifespan"),
        (status = 403, description = "Permission 'change_author' required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    payload: Result<Json<AuthorInput>, JsonRejection>,
) -> AppResult<Json<Author>> {
    claims.require(Permission::ChangeAuthor)?;
    let Json(input) = payload?;

    let updated = state.services.authors.update(id, input).await?;
    Ok(Json(updated))
}

/// Delete an author; their books are kept without an author
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 403, description = "Permission 'delete_author' required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require(Permission::DeleteAuthor)?;

    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
