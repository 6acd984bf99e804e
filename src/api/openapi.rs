//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, catalog, health, instances, loans};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LocalLibrary API",
        version = "1.0.0",
        description = "Small library catalog REST API: books, authors, copies and loans"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Catalog
        catalog::home,
        catalog::list_loan_statuses,
        catalog::list_genres,
        catalog::create_genre,
        catalog::list_languages,
        catalog::create_language,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Copies
        instances::create_instance,
        instances::update_instance,
        instances::delete_instance,
        // Loans
        loans::my_borrowed,
        loans::all_borrowed,
        loans::renewal_form,
        loans::renew_instance,
        loans::check_out,
        loans::mark_returned,
    ),
    components(
        schemas(
            // Catalog
            crate::models::CatalogCounts,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            crate::models::language::Language,
            crate::models::language::CreateLanguage,
            // Books
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::BookDetails,
            crate::models::book::BookInput,
            crate::models::pagination::BookPage,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorDetails,
            crate::models::author::AuthorInput,
            crate::models::pagination::AuthorPage,
            // Copies
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::CreateBookInstance,
            crate::models::book_instance::UpdateBookInstance,
            // Loans
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanStatusOption,
            crate::models::loan::LoanedCopy,
            crate::models::loan::RenewalProposal,
            crate::models::loan::RenewalRequest,
            crate::models::loan::CheckoutRequest,
            crate::models::user::Permission,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "catalog", description = "Home counts and reference data"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "instances", description = "Physical copies of books"),
        (name = "loans", description = "Borrowing, renewal and return")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/catalog",
            "/books/{id}",
            "/authors/{id}",
            "/instances/{id}/renew",
            "/instances/{id}/checkout",
            "/mybooks",
            "/borrowed",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
