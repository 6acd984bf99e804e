//! Data models for LocalLibrary

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;
pub mod language;
pub mod loan;
pub mod pagination;
pub mod user;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

// Re-export commonly used types
pub use author::{Author, AuthorDetails, AuthorInput};
pub use book::{Book, BookDetails, BookInput, BookSummary};
pub use book_instance::BookInstance;
pub use genre::Genre;
pub use language::Language;
pub use loan::{LoanStatus, LoanedCopy};
pub use pagination::{Page, PageWindow};
pub use user::{Permission, UserClaims, UserShort};

/// Years a submitted date may fall in. chrono parses far wider years than
/// PostgreSQL `DATE` can store.
pub const CALENDAR_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Reject dates outside [`CALENDAR_YEARS`]
pub fn check_calendar_date(field: &str, date: NaiveDate) -> AppResult<()> {
    if CALENDAR_YEARS.contains(&date.year()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} must be between years {} and {}",
            field,
            CALENDAR_YEARS.start(),
            CALENDAR_YEARS.end()
        )))
    }
}

/// Record counts shown on the home page
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub num_books: i64,
    pub num_instances: i64,
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_dates_are_bounded_to_four_digit_years() {
        let ok = |y| NaiveDate::from_ymd_opt(y, 1, 1).unwrap();
        assert!(check_calendar_date("due_back", ok(1)).is_ok());
        assert!(check_calendar_date("due_back", ok(9999)).is_ok());
        assert!(matches!(
            check_calendar_date("due_back", ok(0)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_calendar_date("due_back", ok(-5000)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            check_calendar_date("due_back", ok(100_000)),
            Err(AppError::Validation(_))
        ));
    }
}
