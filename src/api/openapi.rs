//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, editors, health, home, jobs, reviews, routes, series, tags};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library demo API",
        version = "0.3.0",
        description = "Book catalog REST API: books, authors, editors, series, tags and reviews"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    modifiers(&SecurityAddon),
    paths(
        home::api_entrypoint,
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_book_authors,
        books::add_book_author,
        books::set_book_authors,
        books::list_book_editors,
        books::add_book_editor,
        books::set_book_editors,
        books::list_book_reviews,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        // Editors
        editors::list_editors,
        editors::get_editor,
        editors::create_editor,
        editors::update_editor,
        editors::delete_editor,
        // Jobs
        jobs::list_jobs,
        jobs::get_job,
        jobs::create_job,
        jobs::update_job,
        jobs::delete_job,
        // Series
        series::list_series,
        series::get_serie,
        series::create_serie,
        series::update_serie,
        series::delete_serie,
        series::list_serie_books,
        // Tags
        tags::list_tags,
        tags::get_tag,
        tags::create_tag,
        tags::update_tag,
        tags::delete_tag,
        tags::list_tag_books,
        // Reviews
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::update_review,
        reviews::delete_review,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::Role,
            // Books
            books::PaginatedBooks,
            crate::models::book::BookShort,
            crate::models::book::BookDetail,
            crate::models::book::BookSort,
            crate::models::book::SortDirection,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::NamedRef,
            crate::models::book::AuthorshipInput,
            crate::models::book::AuthorshipView,
            crate::models::book::EditionInput,
            crate::models::book::EditionView,
            // Reference data
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::author::UpdateAuthor,
            crate::models::editor::Editor,
            crate::models::editor::EditorInput,
            crate::models::job::Job,
            crate::models::job::JobInput,
            crate::models::serie::Serie,
            crate::models::serie::SerieInput,
            crate::models::tag::Tag,
            crate::models::tag::TagInput,
            crate::models::review::Review,
            crate::models::review::CreateReview,
            crate::models::review::UpdateReview,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "entrypoint", description = "Collections exposed by the API"),
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Books with their authors, editions and reviews"),
        (name = "authors", description = "Authors"),
        (name = "editors", description = "Editors (publishers)"),
        (name = "jobs", description = "Roles an author can hold on a book"),
        (name = "series", description = "Series"),
        (name = "tags", description = "Tags"),
        (name = "reviews", description = "Reader reviews")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new(routes::SWAGGER_UI).url(routes::OPENAPI_JSON, ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_book_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/books"));
        assert!(doc.paths.paths.contains_key("/books/{id}/authors"));
        assert!(doc.paths.paths.contains_key("/tags/{id}/books"));
    }
}
