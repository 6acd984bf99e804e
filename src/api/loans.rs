//! Loan endpoints: borrowed lists, renewal, checkout and return

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book_instance::BookInstance,
        loan::{CheckoutRequest, LoanedCopy, RenewalProposal, RenewalRequest},
        user::Permission,
    },
};

use super::AuthenticatedUser;

/// Copies on loan to the current user
#[utoipa::path(
    get,
    path = "/mybooks",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed copies, soonest due first", body = Vec<LoanedCopy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanedCopy>>> {
    let copies = state.services.loans.borrowed_by(claims.user_id).await?;
    Ok(Json(copies))
}

/// Every copy on loan (librarians)
#[utoipa::path(
    get,
    path = "/borrowed",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrowed copies, soonest due first", body = Vec<LoanedCopy>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Permission 'can_mark_returned' required")
    )
)]
pub async fn all_borrowed(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<LoanedCopy>>> {
    claims.require(Permission::CanMarkReturned)?;

    let copies = state.services.loans.all_borrowed().await?;
    Ok(Json(copies))
}

/// Renewal form with the proposed due date
#[utoipa::path(
    get,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Current and proposed due dates", body = RenewalProposal),
        (status = 403, description = "Permission 'can_mark_returned' required"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalProposal>> {
    claims.require(Permission::CanMarkReturned)?;

    let proposal = state.services.loans.renewal_proposal(id).await?;
    Ok(Json(proposal))
}

/// Set a new due date on a copy
#[utoipa::path(
    post,
    path = "/instances/{id}/renew",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = RenewalRequest,
    responses(
        (status = 200, description = "Due date updated", body = BookInstance),
        (status = 400, description = "Malformed date"),
        (status = 403, description = "Permission 'can_mark_returned' required"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renew_instance(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<RenewalRequest>, JsonRejection>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::CanMarkReturned)?;
    let Json(request) = payload?;

    let instance = state.services.loans.renew(id, &request.due_back).await?;
    Ok(Json(instance))
}

/// Lend an available or reserved copy
#[utoipa::path(
    post,
    path = "/instances/{id}/checkout",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Copy is on loan", body = BookInstance),
        (status = 403, description = "Permission 'can_mark_returned' required"),
        (status = 404, description = "Copy or borrower not found"),
        (status = 422, description = "Copy cannot be lent in its current status")
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::CanMarkReturned)?;
    let Json(request) = payload?;

    let instance = state.services.loans.check_out(id, request).await?;
    Ok(Json(instance))
}

/// Mark a borrowed copy as returned
#[utoipa::path(
    post,
    path = "/instances/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy is available again", body = BookInstance),
        (status = 403, description = "Permission 'can_mark_returned' required"),
        (status = 404, description = "Copy not found"),
        (status = 422, description = "Copy is not on loan")
    )
)]
pub async fn mark_returned(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstance>> {
    claims.require(Permission::CanMarkReturned)?;

    let instance = state.services.loans.mark_returned(id).await?;
    Ok(Json(instance))
}
