//! Page arithmetic for paginated listings

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{author::Author, book::BookSummary};
use crate::error::{AppError, AppResult};

/// `?page=` query parameter (1-based)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// Bounds of one requested page within `total` rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

impl PageWindow {
    /// Page 1 always exists, even for an empty listing; any other page past
    /// the end is not found.
    pub fn new(page: Option<i64>, per_page: i64, total: i64) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        let window = Self {
            page,
            per_page: per_page.max(1),
            total,
        };
        if page < 1 || page > window.num_pages() {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        Ok(window)
    }

    pub fn num_pages(&self) -> i64 {
        if self.total <= 0 {
            1
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            num_pages: self.num_pages(),
            has_previous: self.page > 1,
            has_next: self.page < self.num_pages(),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[aliases(BookPage = Page<BookSummary>, AuthorPage = Page<Author>)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
    pub has_previous: bool,
    pub has_next: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_of_empty_listing_exists() {
        let window = PageWindow::new(None, 10, 0).unwrap();
        assert_eq!(window.offset(), 0);
        let page = window.into_page(Vec::<i32>::new());
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
        assert!(!page.has_previous);
    }

    #[test]
    fn pages_of_ten() {
        let window = PageWindow::new(Some(3), 10, 25).unwrap();
        assert_eq!(window.offset(), 20);
        assert_eq!(window.num_pages(), 3);
        let page = window.into_page(vec![1, 2, 3, 4, 5]);
        assert!(page.has_previous);
        assert!(!page.has_next);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        assert_eq!(PageWindow::new(Some(2), 10, 20).unwrap().num_pages(), 2);
        assert!(PageWindow::new(Some(3), 10, 20).is_err());
    }

    #[test]
    fn out_of_range_pages_are_not_found() {
        assert!(matches!(PageWindow::new(Some(0), 10, 5), Err(AppError::NotFound(_))));
        assert!(matches!(PageWindow::new(Some(-1), 10, 5), Err(AppError::NotFound(_))));
        assert!(matches!(PageWindow::new(Some(2), 10, 0), Err(AppError::NotFound(_))));
    }
}
