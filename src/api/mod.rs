//! HTTP layer: handlers, extractors and the router

pub mod auth;
pub mod authors;
pub mod books;
pub mod demo;
pub mod editors;
pub mod health;
pub mod home;
pub mod jobs;
pub mod openapi;
pub mod reviews;
pub mod routes;
pub mod series;
pub mod tags;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use tower_http::{
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

        let claims = state.services.auth.verify_token(token)?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Optional authentication, for endpoints whose access depends on the
/// resource policy. A missing header yields `None`; a present but invalid
/// token is still rejected.
pub struct MaybeUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(MaybeUser(None));
        }

        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        Ok(MaybeUser(Some(claims)))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route(routes::ENTRYPOINT, get(home::api_entrypoint))
        // Health check
        .route(routes::HEALTH, get(health::health_check))
        .route(routes::READY, get(health::readiness_check))
        // Authentication
        .route(routes::AUTH_LOGIN, post(auth::login))
        .route(routes::AUTH_ME, get(auth::me))
        // Books
        .route(routes::BOOKS, get(books::list_books).post(books::create_book))
        .route(
            routes::BOOK,
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route(
            routes::BOOK_AUTHORS,
            get(books::list_book_authors)
                .post(books::add_book_author)
                .put(books::set_book_authors),
        )
        .route(
            routes::BOOK_EDITORS,
            get(books::list_book_editors)
                .post(books::add_book_editor)
                .put(books::set_book_editors),
        )
        .route(routes::BOOK_REVIEWS, get(books::list_book_reviews))
        // Authors
        .route(routes::AUTHORS, get(authors::list_authors).post(authors::create_author))
        .route(
            routes::AUTHOR,
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        // Editors
        .route(routes::EDITORS, get(editors::list_editors).post(editors::create_editor))
        .route(
            routes::EDITOR,
            get(editors::get_editor)
                .put(editors::update_editor)
                .delete(editors::delete_editor),
        )
        // Jobs
        .route(routes::JOBS, get(jobs::list_jobs).post(jobs::create_job))
        .route(
            routes::JOB,
            get(jobs::get_job).put(jobs::update_job).delete(jobs::delete_job),
        )
        // Series
        .route(routes::SERIES, get(series::list_series).post(series::create_serie))
        .route(
            routes::SERIE,
            get(series::get_serie)
                .put(series::update_serie)
                .delete(series::delete_serie),
        )
        .route(routes::SERIE_BOOKS, get(series::list_serie_books))
        // Tags
        .route(routes::TAGS, get(tags::list_tags).post(tags::create_tag))
        .route(
            routes::TAG,
            get(tags::get_tag).put(tags::update_tag).delete(tags::delete_tag),
        )
        .route(routes::TAG_BOOKS, get(tags::list_tag_books))
        // Reviews
        .route(routes::REVIEWS, get(reviews::list_reviews).post(reviews::create_review))
        .route(
            routes::REVIEW,
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        );

    let demo = Router::new()
        .route(routes::HOME, get(home::index))
        .route(routes::DEMO_SIMPLE, get(demo::simple))
        .route(routes::DEMO_HELLO, get(demo::hello))
        .route(routes::DEMO_HTTP_CALL, get(demo::http_call));

    Router::new()
        .merge(demo)
        .nest(routes::API_PREFIX, api_v1)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
