//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{check_calendar_date, loan::LoanStatus};
use crate::error::AppResult;

/// A specific physical copy of a book that can be borrowed
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    /// Unique ID for this particular copy across the whole library
    pub id: Uuid,
    pub book_id: i32,
    /// Publisher / edition of this copy
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
    pub status: LoanStatus,
}

impl BookInstance {
    /// A copy is overdue once its due date is strictly in the past.
    /// Copies without a due date are never overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        is_overdue(self.due_back, today)
    }
}

pub(crate) fn is_overdue(due_back: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_back.map(|due| due < today).unwrap_or(false)
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    /// Defaults to maintenance
    pub status: Option<LoanStatus>,
    pub due_back: Option<NaiveDate>,
}

/// Replace copy request.
///
/// Status, due date and borrower are set independently here; use the
/// checkout/return operations to move a copy through a loan consistently.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBookInstance {
    #[validate(length(min = 1, max = 200, message = "Imprint must be 1-200 characters"))]
    pub imprint: String,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

impl CreateBookInstance {
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        check_due_back(self.due_back)
    }
}

impl UpdateBookInstance {
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        check_due_back(self.due_back)
    }
}

fn check_due_back(due_back: Option<NaiveDate>) -> AppResult<()> {
    match due_back {
        Some(due_back) => check_calendar_date("due_back", due_back),
        None => Ok(()),
    }
}
