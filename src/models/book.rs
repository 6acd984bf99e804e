//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{author::Author, book_instance::BookInstance, genre::Genre, language::Language};

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// 13 character ISBN, unique across the catalog
    pub isbn: String,
    /// Cleared when the author is deleted
    pub author_id: Option<i32>,
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub author_id: Option<i32>,
    /// "last_name, first_name" of the author, if any
    pub author_name: Option<String>,
}

/// Book with its author, classification and copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub languages: Vec<Language>,
    pub instances: Vec<BookInstance>,
}

/// Create or replace book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: String,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: String,
    pub author_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    #[serde(default)]
    pub language_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(isbn: &str) -> BookInput {
        BookInput {
            title: "The Left Hand of Darkness".to_string(),
            summary: "An envoy visits the planet Gethen.".to_string(),
            isbn: isbn.to_string(),
            author_id: Some(1),
            genre_ids: vec![1],
            language_ids: vec![],
        }
    }

    #[test]
    fn isbn_must_be_thirteen_characters() {
        assert!(input("9780441478125").validate().is_ok());
        assert!(input("044147812").validate().is_err());
        assert!(input("97804414781250").validate().is_err());
    }

    #[test]
    fn association_lists_default_to_empty() {
        let parsed: BookInput = serde_json::from_value(serde_json::json!({
            "title": "Dune",
            "summary": "Spice.",
            "isbn": "9780441172719"
        }))
        .unwrap();
        assert!(parsed.author_id.is_none());
        assert!(parsed.genre_ids.is_empty());
        assert!(parsed.language_ids.is_empty());
    }
}
