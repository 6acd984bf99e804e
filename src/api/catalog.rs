//! Home page counts, genres, languages and loan status reference data

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, Language},
        loan::LoanStatusOption,
        user::Permission,
        CatalogCounts,
    },
};

use super::AuthenticatedUser;

/// Library home: record counts
#[utoipa::path(
    get,
    path = "/catalog",
    tag = "catalog",
    responses(
        (status = 200, description = "Counts of books, copies, authors and genres", body = CatalogCounts)
    )
)]
pub async fn home(State(state): State<crate::AppState>) -> AppResult<Json<CatalogCounts>> {
    let counts = state.services.catalog.counts().await?;
    Ok(Json(counts))
}

/// Loan status codes and labels
#[utoipa::path(
    get,
    path = "/loan-statuses",
    tag = "catalog",
    responses(
        (status = 200, description = "All loan statuses", body = Vec<LoanStatusOption>)
    )
)]
pub async fn list_loan_statuses(State(state): State<crate::AppState>) -> Json<Vec<LoanStatusOption>> {
    Json(state.services.loans.statuses())
}

#[utoipa::path(
    get,
    path = "/genres",
    tag = "catalog",
    responses(
        (status = 200, description = "All genres by name", body = Vec<Genre>)
    )
)]
pub async fn list_genres(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

#[utoipa::path(
    post,
    path = "/genres",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid name"),
        (status = 403, description = "Permission 'add_genre' required"),
        (status = 409, description = "Genre already exists")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<Json<CreateGenre>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require(Permission::AddGenre)?;
    let Json(data) = payload?;

    let genre = state.services.catalog.create_genre(data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}

#[utoipa::path(
    get,
    path = "/languages",
    tag = "catalog",
    responses(
        (status = 200, description = "All languages by name", body = Vec<Language>)
    )
)]
pub async fn list_languages(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.list_languages().await?;
    Ok(Json(languages))
}

#[utoipa::path(
    post,
    path = "/languages",
    tag = "catalog",
    security(("bearer_auth" = [])),
    request_body = CreateLanguage,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid name"),
        (status = 403, description = "Permission 'add_language' required"),
        (status = 409, description = "Language already exists")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    payload: Result<Json<CreateLanguage>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require(Permission::AddLanguage)?;
    let Json(data) = payload?;

    let language = state.services.catalog.create_language(data).await?;
    Ok((StatusCode::CREATED, Json(language)))
}
