//! Loan status and loan-related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{book_instance::is_overdue, check_calendar_date};
use crate::error::{AppError, AppResult};

/// Availability of a copy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Maintenance,
    OnLoan,
    Available,
    Reserved,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Maintenance,
        LoanStatus::OnLoan,
        LoanStatus::Available,
        LoanStatus::Reserved,
    ];

    /// Single-letter code stored in the database
    pub fn code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "Maintenance",
            LoanStatus::OnLoan => "On loan",
            LoanStatus::Available => "Available",
            LoanStatus::Reserved => "Reserved",
        }
    }

    /// (code, label) pairs for every status, in declaration order
    pub fn options() -> Vec<LoanStatusOption> {
        Self::ALL
            .iter()
            .map(|status| LoanStatusOption {
                status: *status,
                code: status.code().to_string(),
                label: status.label().to_string(),
            })
            .collect()
    }

    /// Copies on the shelf or held for someone can go out on loan
    pub fn can_check_out(&self) -> bool {
        matches!(self, LoanStatus::Available | LoanStatus::Reserved)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for LoanStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(LoanStatus::Maintenance),
            "o" => Ok(LoanStatus::OnLoan),
            "a" => Ok(LoanStatus::Available),
            "r" => Ok(LoanStatus::Reserved),
            _ => Err(format!("Invalid loan status code: {}", s)),
        }
    }
}

// SQLx conversion for LoanStatus (stored as its code)
impl sqlx::Type<Postgres> for LoanStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for LoanStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<Postgres>>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for LoanStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.code(), buf)
    }
}

/// Status code with its display label
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoanStatusOption {
    pub status: LoanStatus,
    pub code: String,
    pub label: String,
}

/// Row of the borrowed-copies queries
#[derive(Debug, Clone, FromRow)]
pub struct LoanedCopyRow {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    pub borrower_username: Option<String>,
}

impl LoanedCopyRow {
    pub fn into_loaned_copy(self, today: NaiveDate) -> LoanedCopy {
        LoanedCopy {
            is_overdue: is_overdue(self.due_back, today),
            id: self.id,
            book_id: self.book_id,
            book_title: self.book_title,
            imprint: self.imprint,
            due_back: self.due_back,
            status: self.status,
            borrower_id: self.borrower_id,
            borrower_username: self.borrower_username,
        }
    }
}

/// Borrowed copy for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanedCopy {
    pub id: Uuid,
    pub book_id: i32,
    pub book_title: String,
    pub imprint: String,
    pub due_back: Option<NaiveDate>,
    pub status: LoanStatus,
    pub borrower_id: Option<i32>,
    pub borrower_username: Option<String>,
    pub is_overdue: bool,
}

impl std::fmt::Display for LoanedCopy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.book_title)
    }
}

/// Renewal form as presented to a librarian
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenewalProposal {
    pub instance_id: Uuid,
    pub current_due_back: Option<NaiveDate>,
    pub proposed_due_back: NaiveDate,
}

/// Renewal form submission
#[derive(Debug, Deserialize, ToSchema)]
pub struct RenewalRequest {
    /// New due date, `YYYY-MM-DD`
    pub due_back: String,
}

/// Check a copy out to a borrower
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub borrower_id: i32,
    /// Defaults to today plus the configured loan period
    pub due_back: Option<NaiveDate>,
}

impl CheckoutRequest {
    pub fn check(&self) -> AppResult<()> {
        match self.due_back {
            Some(due_back) => check_calendar_date("due_back", due_back),
            None => Ok(()),
        }
    }
}

/// Parse a submitted due date
pub fn parse_due_date(input: &str) -> AppResult<NaiveDate> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date '{}': expected YYYY-MM-DD", input)))?;
    check_calendar_date("due_back", date)?;
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_status_is_maintenance() {
        assert_eq!(LoanStatus::default(), LoanStatus::Maintenance);
    }

    #[test]
    fn options_list_every_code_with_label() {
        let options = LoanStatus::options();
        let pairs: Vec<(&str, &str)> = options
            .iter()
            .map(|o| (o.code.as_str(), o.label.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("m", "Maintenance"),
                ("o", "On loan"),
                ("a", "Available"),
                ("r", "Reserved"),
            ]
        );
    }

    #[test]
    fn codes_parse_back_to_statuses() {
        for status in LoanStatus::ALL {
            assert_eq!(status.code().parse::<LoanStatus>(), Ok(status));
        }
        assert!("x".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn json_uses_snake_case_names() {
        assert_eq!(serde_json::to_value(LoanStatus::OnLoan).unwrap(), "on_loan");
        let parsed: LoanStatus = serde_json::from_str("\"reserved\"").unwrap();
        assert_eq!(parsed, LoanStatus::Reserved);
    }

    #[test]
    fn only_available_or_reserved_copies_check_out() {
        assert!(LoanStatus::Available.can_check_out());
        assert!(LoanStatus::Reserved.can_check_out());
        assert!(!LoanStatus::OnLoan.can_check_out());
        assert!(!LoanStatus::Maintenance.can_check_out());
    }

    #[test]
    fn due_date_parsing() {
        assert_eq!(
            parse_due_date("2024-08-21").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 21).unwrap()
        );
        assert_eq!(
            parse_due_date(" 2024-08-21 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 21).unwrap()
        );
        assert!(matches!(parse_due_date("21/08/2024"), Err(AppError::Validation(_))));
        assert!(matches!(parse_due_date("2024-02-30"), Err(AppError::Validation(_))));
        assert!(matches!(parse_due_date(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn due_dates_outside_four_digit_years_are_rejected() {
        assert!(matches!(parse_due_date("-5000-01-01"), Err(AppError::Validation(_))));
        assert!(matches!(parse_due_date("+100000-01-01"), Err(AppError::Validation(_))));
        assert!(parse_due_date("9999-12-31").is_ok());
    }

    #[test]
    fn checkout_due_date_is_bounded() {
        let request = CheckoutRequest {
            borrower_id: 2,
            due_back: NaiveDate::from_ymd_opt(-5000, 1, 1),
        };
        assert!(matches!(request.check(), Err(AppError::Validation(_))));

        let request: CheckoutRequest = serde_json::from_str(r#"{"borrower_id": 2}"#).unwrap();
        assert!(request.check().is_ok());
    }

    #[test]
    fn loaned_copy_carries_overdue_flag() {
        let row = LoanedCopyRow {
            id: Uuid::new_v4(),
            book_id: 3,
            book_title: "Dune".to_string(),
            imprint: "Chilton, 1965".to_string(),
            due_back: NaiveDate::from_ymd_opt(2024, 7, 1),
            status: LoanStatus::OnLoan,
            borrower_id: Some(2),
            borrower_username: Some("reader".to_string()),
        };
        let copy = row.into_loaned_copy(NaiveDate::from_ymd_opt(2024, 7, 2).unwrap());
        assert!(copy.is_overdue);
        assert_eq!(copy.to_string(), format!("{} (Dune)", copy.id));
    }
}
