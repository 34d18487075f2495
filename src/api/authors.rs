//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        author::{Author, CreateAuthor, UpdateAuthor},
    },
    policy::{Operation, Resource},
    AppState,
};

use super::MaybeUser;

#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses((status = 200, description = "All authors", body = Vec<Author>))
)]
pub async fn list_authors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Vec<Author>>> {
    state.config.access.check(Resource::Authors, Operation::Read, user.as_ref())?;

    let authors = state.services.authors.list().await?;
    Ok(Json(authors))
}

#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Author>> {
    state.config.access.check(Resource::Authors, Operation::Read, user.as_ref())?;

    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    state.config.access.check(Resource::Authors, Operation::Create, user.as_ref())?;
    data.validate()?;

    let author = state.services.authors.create(&data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    state.config.access.check(Resource::Authors, Operation::Update, user.as_ref())?;
    data.validate()?;

    let author = state.services.authors.update(id, &data).await?;
    Ok(Json(author))
}

#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still referenced")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Authors, Operation::Delete, user.as_ref())?;

    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
