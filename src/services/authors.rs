//! Author management service

use crate::{
    config::CatalogConfig,
    error::AppResult,
    models::{
        author::{Author, AuthorDetails, AuthorInput},
        pagination::{Page, PageWindow},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    config: CatalogConfig,
}

impl AuthorsService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self { repository, config }
    }

    /// One page of authors
    pub async fn list(&self, page: Option<i64>) -> AppResult<Page<Author>> {
        let total = self.repository.authors.count().await?;
        let window = PageWindow::new(page, self.config.page_size, total)?;
        let authors = self.repository.authors.list(&window).await?;
        Ok(window.into_page(authors))
    }

    /// Author with their books
    pub async fn get(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = self.repository.authors.get_by_id(id).await?;
        let books = self.repository.authors.books(id).await?;
        Ok(AuthorDetails { author, books })
    }

    pub async fn create(&self, input: AuthorInput) -> AppResult<Author> {
        input.check()?;
        let author = self.repository.authors.create(&input).await?;
        tracing::info!("Author created: id={} ({})", author.id, author);
        Ok(author)
    }

    pub async fn update(&self, id: i32, input: AuthorInput) -> AppResult<Author> {
        input.check()?;
        let author = self.repository.authors.update(id, &input).await?;
        tracing::info!("Author updated: id={} ({})", author.id, author);
        Ok(author)
    }

    /// Delete an author; their books are kept without an author
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await?;
        tracing::info!("Author deleted: id={}", id);
        Ok(())
    }
}
