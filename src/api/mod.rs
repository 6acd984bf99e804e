//! API handlers for LocalLibrary REST endpoints

pub mod authors;
pub mod books;
pub mod catalog;
pub mod health;
pub mod instances;
pub mod loans;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Home
        .route("/catalog", get(catalog::home))
        .route("/loan-statuses", get(catalog::list_loan_statuses))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/instances", post(instances::create_instance))
        // Authors
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Genres & languages
        .route("/genres", get(catalog::list_genres).post(catalog::create_genre))
        .route("/languages", get(catalog::list_languages).post(catalog::create_language))
        // Copies
        .route(
            "/instances/:id",
            put(instances::update_instance).delete(instances::delete_instance),
        )
        // Loans
        .route("/mybooks", get(loans::my_borrowed))
        .route("/borrowed", get(loans::all_borrowed))
        .route(
            "/instances/:id/renew",
            get(loans::renewal_form).post(loans::renew_instance),
        )
        .route("/instances/:id/checkout", post(loans::check_out))
        .route("/instances/:id/return", post(loans::mark_returned))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use chrono::{NaiveDate, Utc};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::{
        clock::FixedClock, config::AppConfig, models::user::Permission, repository::Repository,
        services::Services,
    };

    /// Router over a pool that never connects: any request reaching the store fails
    fn app() -> (Router, AppConfig) {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://locallibrary@127.0.0.1:1/locallibrary")
            .unwrap();
        let clock = Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()));
        let services = Services::new(Repository::new(pool), config.catalog.clone(), clock);
        let state = AppState {
            config: Arc::new(config.clone()),
            services: Arc::new(services),
        };
        (create_router(state), config)
    }

    fn token(config: &AppConfig, permissions: Vec<Permission>) -> String {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "staff".to_string(),
            user_id: 1,
            permissions,
            exp: now + 3600,
            iat: now,
        }
        .create_token(&config.auth.jwt_secret)
        .unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_database() {
        let (app, _) = app();
        let response = app
            .oneshot(request(Method::GET, "/api/v1/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn loan_statuses_are_listed_with_labels() {
        let (app, _) = app();
        let response = app
            .oneshot(request(Method::GET, "/api/v1/loan-statuses", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let statuses = body.as_array().unwrap();
        assert_eq!(statuses.len(), 4);
        assert_eq!(statuses[1]["code"], "o");
        assert_eq!(statuses[1]["label"], "On loan");
    }

    #[tokio::test]
    async fn my_books_requires_a_token() {
        let (app, _) = app();
        let response = app
            .oneshot(request(Method::GET, "/api/v1/mybooks", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn forged_token_is_rejected() {
        let (app, _) = app();
        let mut other = AppConfig::default();
        other.auth.jwt_secret = "not-the-server-secret".to_string();
        let forged = token(&other, vec![Permission::CanMarkReturned]);
        let response = app
            .oneshot(request(Method::GET, "/api/v1/borrowed", Some(&forged), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn librarian_listing_requires_can_mark_returned() {
        let (app, config) = app();
        let reader = token(&config, vec![]);
        let response = app
            .oneshot(request(Method::GET, "/api/v1/borrowed", Some(&reader), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn renewal_without_permission_is_forbidden_before_the_store() {
        let (app, config) = app();
        let staff = token(&config, vec![Permission::ChangeBook, Permission::AddAuthor]);
        let uri = format!("/api/v1/instances/{}/renew", Uuid::new_v4());
        let response = app
            .oneshot(request(
                Method::POST,
                &uri,
                Some(&staff),
                Some(json!({ "due_back": "2024-08-21" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error"], "NotAuthorized");
    }

    #[tokio::test]
    async fn malformed_renewal_date_is_a_validation_error() {
        let (app, config) = app();
        let librarian = token(&config, vec![Permission::CanMarkReturned]);
        let uri = format!("/api/v1/instances/{}/renew", Uuid::new_v4());
        let response = app
            .oneshot(request(
                Method::POST,
                &uri,
                Some(&librarian),
                Some(json!({ "due_back": "31/07/2024" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "BadValue");
    }

    #[tokio::test]
    async fn permission_is_checked_before_the_body_is_parsed() {
        let (app, config) = app();
        let reader = token(&config, vec![]);
        let uri = format!("/api/v1/instances/{}/renew", Uuid::new_v4());
        let response = app
            .oneshot(request(
                Method::POST,
                &uri,
                Some(&reader),
                Some(json!({ "due_back": 20240821 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn mistyped_body_is_a_validation_error_for_permitted_callers() {
        let (app, config) = app();
        let librarian = token(&config, vec![Permission::CanMarkReturned]);
        let uri = format!("/api/v1/instances/{}/renew", Uuid::new_v4());
        let response = app
            .oneshot(request(
                Method::POST,
                &uri,
                Some(&librarian),
                Some(json!({ "due_back": 20240821 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "BadValue");
    }

    #[tokio::test]
    async fn renewal_date_the_database_cannot_store_is_a_validation_error() {
        let (app, config) = app();
        let librarian = token(&config, vec![Permission::CanMarkReturned]);
        let uri = format!("/api/v1/instances/{}/renew", Uuid::new_v4());
        let response = app
            .oneshot(request(
                Method::POST,
                &uri,
                Some(&librarian),
                Some(json!({ "due_back": "-5000-01-01" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "BadValue");
    }

    #[tokio::test]
    async fn author_dying_on_birth_day_is_rejected() {
        let (app, config) = app();
        let staff = token(&config, vec![Permission::AddAuthor]);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/authors",
                Some(&staff),
                Some(json!({
                    "first_name": "Jane",
                    "last_name": "Doe",
                    "date_of_birth": "1950-01-01",
                    "date_of_death": "1950-01-01"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("date of birth cannot be greater than or equal to date of death"));
    }

    #[tokio::test]
    async fn author_mutations_need_matching_permission() {
        let (app, config) = app();
        let adder = token(&config, vec![Permission::AddAuthor]);

        let update = request(
            Method::PUT,
            "/api/v1/authors/1",
            Some(&adder),
            Some(json!({ "first_name": "Jane", "last_name": "Doe" })),
        );
        let response = app.clone().oneshot(update).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let delete = request(Method::DELETE, "/api/v1/authors/1", Some(&adder), None);
        let response = app.oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn book_creation_needs_add_book() {
        let (app, config) = app();
        let staff = token(&config, vec![Permission::ChangeBook, Permission::DeleteBook]);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/books",
                Some(&staff),
                Some(json!({
                    "title": "Dune",
                    "summary": "Spice.",
                    "isbn": "9780441172719"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn short_isbn_is_a_validation_error() {
        let (app, config) = app();
        let staff = token(&config, vec![Permission::AddBook]);
        let response = app
            .oneshot(request(
                Method::POST,
                "/api/v1/books",
                Some(&staff),
                Some(json!({
                    "title": "Dune",
                    "summary": "Spice.",
                    "isbn": "0441172717"
                })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
