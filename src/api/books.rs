//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{
            AuthorshipInput, AuthorshipView, BookDetail, BookQuery, BookShort, CreateBook,
            EditionInput, EditionView, UpdateBook,
        },
        review::Review,
    },
    policy::{Operation, Resource},
    repository::books::page_bounds,
    AppState,
};

use super::MaybeUser;

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(PaginatedBooks = PaginatedResponse<BookShort>)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    /// Total number of matching books
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = PaginatedBooks),
        (status = 400, description = "Page out of range"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<BookShort>>> {
    state.config.access.check(Resource::Books, Operation::Read, user.as_ref())?;

    let (page, per_page, _) = page_bounds(&query)?;
    let (items, total) = state.services.catalog.search_books(&query).await?;

    Ok(Json(PaginatedResponse {
        items,
        total,
        page,
        per_page,
    }))
}

/// Get a book with its authors and editors
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    state.config.access.check(Resource::Books, Operation::Read, user.as_ref())?;

    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(BookDetail::from(&book)))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetail),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetail>)> {
    state.config.access.check(Resource::Books, Operation::Create, user.as_ref())?;
    data.validate()?;

    let book = state.services.catalog.create_book(data).await?;
    Ok((StatusCode::CREATED, Json(BookDetail::from(&book))))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateBook>,
) -> AppResult<Json<BookDetail>> {
    state.config.access.check(Resource::Books, Operation::Update, user.as_ref())?;
    data.validate()?;

    let book = state.services.catalog.update_book(id, data).await?;
    Ok(Json(BookDetail::from(&book)))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Books, Operation::Delete, user.as_ref())?;

    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// AUTHORS / EDITORS / REVIEWS OF A BOOK
// =============================================================================

/// List the authors credited on a book
#[utoipa::path(
    get,
    path = "/books/{id}/authors",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Authorships", body = Vec<AuthorshipView>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_authors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<AuthorshipView>>> {
    state.config.access.check(Resource::Books, Operation::Read, user.as_ref())?;

    let authors = state.services.catalog.list_authors(id).await?;
    Ok(Json(authors))
}

/// Credit an author on a book. An existing (author, job) pair is left as is.
#[utoipa::path(
    post,
    path = "/books/{id}/authors",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = AuthorshipInput,
    responses(
        (status = 200, description = "Book with its authors", body = BookDetail),
        (status = 404, description = "Book, author or job not found")
    )
)]
pub async fn add_book_author(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(input): Json<AuthorshipInput>,
) -> AppResult<Json<BookDetail>> {
    state.config.access.check(Resource::Books, Operation::Update, user.as_ref())?;

    let book = state.services.catalog.add_author(id, input).await?;
    Ok(Json(BookDetail::from(&book)))
}

/// Replace the authors of a book
#[utoipa::path(
    put,
    path = "/books/{id}/authors",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = Vec<AuthorshipInput>,
    responses(
        (status = 200, description = "Book with its authors", body = BookDetail),
        (status = 404, description = "Book, author or job not found")
    )
)]
pub async fn set_book_authors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(inputs): Json<Vec<AuthorshipInput>>,
) -> AppResult<Json<BookDetail>> {
    state.config.access.check(Resource::Books, Operation::Update, user.as_ref())?;

    let book = state.services.catalog.set_authors(id, inputs).await?;
    Ok(Json(BookDetail::from(&book)))
}

/// List the editions of a book
#[utoipa::path(
    get,
    path = "/books/{id}/editors",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Editions", body = Vec<EditionView>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_editors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<EditionView>>> {
    state.config.access.check(Resource::Books, Operation::Read, user.as_ref())?;

    let editors = state.services.catalog.list_editors(id).await?;
    Ok(Json(editors))
}

/// Record an edition. An editor already present keeps its first edition.
#[utoipa::path(
    post,
    path = "/books/{id}/editors",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = EditionInput,
    responses(
        (status = 200, description = "Book with its editions", body = BookDetail),
        (status = 404, description = "Book or editor not found")
    )
)]
pub async fn add_book_editor(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(input): Json<EditionInput>,
) -> AppResult<Json<BookDetail>> {
    state.config.access.check(Resource::Books, Operation::Update, user.as_ref())?;
    input.validate()?;

    let book = state.services.catalog.add_editor(id, input).await?;
    Ok(Json(BookDetail::from(&book)))
}

/// Replace the editions of a book
#[utoipa::path(
    put,
    path = "/books/{id}/editors",
    tag = "books",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = Vec<EditionInput>,
    responses(
        (status = 200, description = "Book with its editions", body = BookDetail),
        (status = 404, description = "Book or editor not found")
    )
)]
pub async fn set_book_editors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(inputs): Json<Vec<EditionInput>>,
) -> AppResult<Json<BookDetail>> {
    state.config.access.check(Resource::Books, Operation::Update, user.as_ref())?;
    for input in &inputs {
        input.validate()?;
    }

    let book = state.services.catalog.set_editors(id, inputs).await?;
    Ok(Json(BookDetail::from(&book)))
}

/// List the reviews of a book
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reviews", body = Vec<Review>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_reviews(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Review>>> {
    state.config.access.check(Resource::Reviews, Operation::Read, user.as_ref())?;

    let reviews = state.services.catalog.list_reviews(id).await?;
    Ok(Json(reviews))
}
