//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{book::BookSummary, check_calendar_date};
use crate::error::{AppError, AppResult};

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author with the books they wrote
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    pub author: Author,
    pub books: Vec<BookSummary>,
}

/// Create or replace author request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorInput {
    /// Field rules plus the lifespan rule; nothing may be written unless this passes
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if let Some(birth) = self.date_of_birth {
            check_calendar_date("date_of_birth", birth)?;
        }
        if let Some(death) = self.date_of_death {
            check_calendar_date("date_of_death", death)?;
        }
        validate_lifespan(self.date_of_birth, self.date_of_death)
    }
}

/// A date of death must fall strictly after the date of birth. The rule only
/// applies when both dates are known.
pub fn validate_lifespan(
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
) -> AppResult<()> {
    match (date_of_birth, date_of_death) {
        (Some(birth), Some(death)) if death <= birth => Err(AppError::Validation(
            "date of birth cannot be greater than or equal to date of death".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn input(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> AuthorInput {
        AuthorInput {
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: birth,
            date_of_death: death,
        }
    }

    #[test]
    fn same_day_death_is_rejected() {
        let err = validate_lifespan(Some(date(1950, 1, 1)), Some(date(1950, 1, 1))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn death_the_next_day_is_accepted() {
        assert!(validate_lifespan(Some(date(1950, 1, 1)), Some(date(1950, 1, 2))).is_ok());
    }

    #[test]
    fn death_before_birth_is_rejected() {
        assert!(validate_lifespan(Some(date(1929, 10, 21)), Some(date(1900, 1, 1))).is_err());
    }

    #[test]
    fn missing_dates_skip_the_check() {
        assert!(validate_lifespan(None, None).is_ok());
        assert!(validate_lifespan(Some(date(1929, 10, 21)), None).is_ok());
        assert!(validate_lifespan(None, Some(date(2018, 1, 22))).is_ok());
    }

    #[test]
    fn input_check_covers_names_and_dates() {
        assert!(input(Some(date(1929, 10, 21)), Some(date(2018, 1, 22))).check().is_ok());

        let mut blank = input(None, None);
        blank.last_name = String::new();
        assert!(matches!(blank.check(), Err(AppError::Validation(_))));

        let reversed = input(Some(date(2018, 1, 22)), Some(date(1929, 10, 21)));
        assert!(matches!(reversed.check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn dates_the_database_cannot_store_are_rejected() {
        let ancient = NaiveDate::from_ymd_opt(-5000, 1, 1);
        assert!(matches!(input(ancient, None).check(), Err(AppError::Validation(_))));
        assert!(matches!(
            input(Some(date(1929, 10, 21)), NaiveDate::from_ymd_opt(100_000, 1, 1)).check(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn displays_as_last_then_first_name() {
        let author = Author {
            id: 1,
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
            date_of_birth: None,
            date_of_death: None,
        };
        assert_eq!(author.to_string(), "Le Guin, Ursula");
    }
}
