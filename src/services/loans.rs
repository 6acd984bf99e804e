//! Loan management service

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use uuid::Uuid;

use crate::{
    clock::Clock,
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        book_instance::BookInstance,
        loan::{parse_due_date, CheckoutRequest, LoanStatus, LoanStatusOption, LoanedCopy, RenewalProposal},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: CatalogConfig,
    clock: Arc<dyn Clock>,
}

impl LoansService {
    pub fn new(repository: Repository, config: CatalogConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            config,
            clock,
        }
    }

    /// Loan status codes with their labels
    pub fn statuses(&self) -> Vec<LoanStatusOption> {
        LoanStatus::options()
    }

    /// Copies currently on loan to `user_id`
    pub async fn borrowed_by(&self, user_id: i32) -> AppResult<Vec<LoanedCopy>> {
        let today = self.clock.today();
        let rows = self.repository.loans.borrowed_by(user_id).await?;
        Ok(rows.into_iter().map(|r| r.into_loaned_copy(today)).collect())
    }

    /// Every copy currently on loan
    pub async fn all_borrowed(&self) -> AppResult<Vec<LoanedCopy>> {
        let today = self.clock.today();
        let rows = self.repository.loans.all_borrowed().await?;
        Ok(rows.into_iter().map(|r| r.into_loaned_copy(today)).collect())
    }

    /// Due date a fresh loan or renewal starts from
    pub fn default_due_date(&self) -> AppResult<NaiveDate> {
        due_date_after(self.clock.today(), self.config.loan_period_days)
    }

    /// Renewal form pre-filled with the default due date
    pub async fn renewal_proposal(&self, id: Uuid) -> AppResult<RenewalProposal> {
        let instance = self.repository.instances.get_by_id(id).await?;
        Ok(RenewalProposal {
            instance_id: instance.id,
            current_due_back: instance.due_back,
            proposed_due_back: self.default_due_date()?,
        })
    }

    /// Overwrite the due date of a copy with the submitted date.
    /// Any well-formed date is accepted.
    pub async fn renew(&self, id: Uuid, due_back: &str) -> AppResult<BookInstance> {
        let due_back = parse_due_date(due_back)?;
        let instance = self.repository.loans.set_due_back(id, due_back).await?;
        tracing::info!("Book instance renewed: id={} due_back={}", id, due_back);
        Ok(instance)
    }

    /// Lend a copy to a borrower
    pub async fn check_out(&self, id: Uuid, request: CheckoutRequest) -> AppResult<BookInstance> {
        request.check()?;
        self.repository.users.get_by_id(request.borrower_id).await?;
        let due_back = match request.due_back {
            Some(due_back) => due_back,
            None => self.default_due_date()?,
        };
        let instance = self
            .repository
            .loans
            .check_out(id, request.borrower_id, due_back)
            .await?;
        tracing::info!(
            "Book instance checked out: id={} borrower_id={} due_back={}",
            id,
            request.borrower_id,
            due_back
        );
        Ok(instance)
    }

    /// Take a copy back onto the shelf
    pub async fn mark_returned(&self, id: Uuid) -> AppResult<BookInstance> {
        let instance = self.repository.loans.mark_returned(id).await?;
        tracing::info!("Book instance returned: id={}", id);
        Ok(instance)
    }
}

fn due_date_after(today: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    u64::try_from(days)
        .ok()
        .and_then(|days| today.checked_add_days(Days::new(days)))
        .ok_or_else(|| {
            AppError::Validation(format!("A loan period of {} days is out of range", days))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use sqlx::postgres::PgPoolOptions;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(clock: MockClock) -> LoansService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://locallibrary@localhost/locallibrary")
            .unwrap();
        LoansService::new(Repository::new(pool), CatalogConfig::default(), Arc::new(clock))
    }

    #[test]
    fn due_date_is_three_weeks_out() {
        assert_eq!(due_date_after(date(2024, 7, 31), 21).unwrap(), date(2024, 8, 21));
        assert_eq!(due_date_after(date(2024, 12, 20), 21).unwrap(), date(2025, 1, 10));
    }

    #[test]
    fn oversized_loan_period_is_an_error_not_a_panic() {
        assert!(due_date_after(date(2024, 7, 31), i64::MAX).is_err());
        assert!(due_date_after(date(2024, 7, 31), -1).is_err());
    }

    #[tokio::test]
    async fn default_due_date_reads_the_clock() {
        let mut clock = MockClock::new();
        clock.expect_today().times(1).return_const(date(2024, 2, 20));

        assert_eq!(service(clock).default_due_date().unwrap(), date(2024, 3, 12));
    }

    #[tokio::test]
    async fn malformed_renewal_date_is_rejected_before_the_store() {
        let mut clock = MockClock::new();
        clock.expect_today().never();

        let err = service(clock)
            .renew(Uuid::new_v4(), "next tuesday")
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::AppError::Validation(_)));
    }

    #[tokio::test]
    async fn out_of_range_checkout_date_is_rejected_before_the_store() {
        let mut clock = MockClock::new();
        clock.expect_today().never();

        let request = CheckoutRequest {
            borrower_id: 2,
            due_back: NaiveDate::from_ymd_opt(-5000, 1, 1),
        };
        let err = service(clock)
            .check_out(Uuid::new_v4(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
