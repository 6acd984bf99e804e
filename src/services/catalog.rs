//! Catalog management service: books, copies, genres and languages

use uuid::Uuid;
use validator::Validate;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookInput, BookSummary},
        book_instance::{BookInstance, CreateBookInstance, UpdateBookInstance},
        genre::{CreateGenre, Genre},
        language::{CreateLanguage, Language},
        loan::LoanStatus,
        pagination::{Page, PageWindow},
        CatalogCounts,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }

    /// Home page counts
    pub async fn counts(&self) -> AppResult<CatalogCounts> {
        Ok(CatalogCounts {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.instances.count().await?,
            num_instances_available: self
                .repository
                .instances
                .count_by_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count().await?,
        })
    }

    // =========================================================================
    // BOOKS
    // =========================================================================

    /// One page of books
    pub async fn list_books(&self, page: Option<i64>) -> AppResult<Page<BookSummary>> {
        let total = self.repository.books.count().await?;
        let window = PageWindow::new(page, self.config.page_size, total)?;
        let books = self.repository.books.list(&window).await?;
        Ok(window.into_page(books))
    }

    /// Book with author, genres, languages and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        let author = match book.author_id {
            Some(author_id) => Some(self.repository.authors.get_by_id(author_id).await?),
            None => None,
        };
        Ok(BookDetails {
            author,
            genres: self.repository.genres.for_book(id).await?,
            languages: self.repository.languages.for_book(id).await?,
            instances: self.repository.instances.for_book(id).await?,
            book,
        })
    }

    /// Create a book. A duplicate ISBN is a conflict.
    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        let input = self.check_book(input).await?;

        if self.repository.books.isbn_exists(&input.isbn, None).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                input.isbn
            )));
        }

        let book = self.repository.books.create(&input).await?;
        tracing::info!("Book created: id={} isbn={}", book.id, book.isbn);
        Ok(book)
    }

    /// Replace a book
    pub async fn update_book(&self, id: i32, input: BookInput) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await?;
        let input = self.check_book(input).await?;

        if self.repository.books.isbn_exists(&input.isbn, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "A book with ISBN {} already exists",
                input.isbn
            )));
        }

        let book = self.repository.books.update(id, &input).await?;
        tracing::info!("Book updated: id={} isbn={}", book.id, book.isbn);
        Ok(book)
    }

    /// Delete a book that has no copies left
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Book deleted: id={}", id);
        Ok(())
    }

    /// Field rules, then every referenced author/genre/language must exist
    async fn check_book(&self, mut input: BookInput) -> AppResult<BookInput> {
        input.validate()?;

        input.genre_ids.sort_unstable();
        input.genre_ids.dedup();
        input.language_ids.sort_unstable();
        input.language_ids.dedup();

        if let Some(author_id) = input.author_id {
            if !self.repository.authors.exists(author_id).await? {
                return Err(AppError::Validation(format!("Author {} does not exist", author_id)));
            }
        }
        if !input.genre_ids.is_empty()
            && self.repository.genres.count_existing(&input.genre_ids).await?
                != input.genre_ids.len() as i64
        {
            return Err(AppError::Validation("Unknown genre selected".to_string()));
        }
        if !input.language_ids.is_empty()
            && self.repository.languages.count_existing(&input.language_ids).await?
                != input.language_ids.len() as i64
        {
            return Err(AppError::Validation("Unknown language selected".to_string()));
        }

        Ok(input)
    }

    // =========================================================================
    // COPIES
    // =========================================================================

    /// Add a copy of a book
    pub async fn create_instance(&self, book_id: i32, data: CreateBookInstance) -> AppResult<BookInstance> {
        data.check()?;
        self.repository.books.get_by_id(book_id).await?;
        let instance = self.repository.instances.create(book_id, &data).await?;
        tracing::info!("Book instance created: id={} book_id={}", instance.id, book_id);
        Ok(instance)
    }

    /// Replace the editable fields of a copy
    pub async fn update_instance(&self, id: Uuid, data: UpdateBookInstance) -> AppResult<BookInstance> {
        data.check()?;
        if let Some(borrower_id) = data.borrower_id {
            self.repository.users.get_by_id(borrower_id).await?;
        }
        let instance = self.repository.instances.update(id, &data).await?;
        tracing::info!("Book instance updated: id={} status={}", instance.id, instance.status);
        Ok(instance)
    }

    pub async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        self.repository.instances.delete(id).await?;
        tracing::info!("Book instance deleted: id={}", id);
        Ok(())
    }

    // =========================================================================
    // GENRES & LANGUAGES
    // =========================================================================

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn create_genre(&self, data: CreateGenre) -> AppResult<Genre> {
        let name = required_name(&data.name, "Genre")?;
        data.validate()?;
        let genre = self.repository.genres.create(name).await?;
        tracing::info!("Genre created: id={} name={}", genre.id, genre.name);
        Ok(genre)
    }

    pub async fn list_languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn create_language(&self, data: CreateLanguage) -> AppResult<Language> {
        let name = required_name(&data.name, "Language")?;
        data.validate()?;
        let language = self.repository.languages.create(name).await?;
        tracing::info!("Language created: id={} name={}", language.id, language.name);
        Ok(language)
    }
}

fn required_name<'a>(name: &'a str, what: &str) -> AppResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} name cannot be empty", what)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(required_name("  Fantasy ", "Genre").unwrap(), "Fantasy");
        assert!(matches!(required_name("   ", "Genre"), Err(AppError::Validation(_))));
        assert!(matches!(required_name("", "Language"), Err(AppError::Validation(_))));
    }
}
