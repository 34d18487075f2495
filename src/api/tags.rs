//! Tag endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::BookShort,
        tag::{Tag, TagInput},
    },
    policy::{Operation, Resource},
    AppState,
};

use super::MaybeUser;

#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    responses((status = 200, description = "All tags", body = Vec<Tag>))
)]
pub async fn list_tags(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Vec<Tag>>> {
    state.config.access.check(Resource::Tags, Operation::Read, user.as_ref())?;

    let tags = state.services.tags.list().await?;
    Ok(Json(tags))
}

#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag details", body = Tag),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn get_tag(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Tag>> {
    state.config.access.check(Resource::Tags, Operation::Read, user.as_ref())?;

    let tag = state.services.tags.get_by_id(id).await?;
    Ok(Json(tag))
}

#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    security(("bearer_auth" = [])),
    request_body = TagInput,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_tag(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<TagInput>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    state.config.access.check(Resource::Tags, Operation::Create, user.as_ref())?;
    data.validate()?;

    let tag = state.services.tags.create(&data).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

#[utoipa::path(
    put,
    path = "/tags/{id}",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag ID")),
    request_body = TagInput,
    responses(
        (status = 200, description = "Tag updated", body = Tag),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn update_tag(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<TagInput>,
) -> AppResult<Json<Tag>> {
    state.config.access.check(Resource::Tags, Operation::Update, user.as_ref())?;
    data.validate()?;

    let tag = state.services.tags.update(id, &data).await?;
    Ok(Json(tag))
}

#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn delete_tag(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Tags, Operation::Delete, user.as_ref())?;

    state.services.tags.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Books belonging to a tag
#[utoipa::path(
    get,
    path = "/tags/{id}/books",
    tag = "tags",
    params(("id" = i32, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Books", body = Vec<BookShort>),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn list_tag_books(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookShort>>> {
    state.config.access.check(Resource::Books, Operation::Read, user.as_ref())?;

    let books = state.services.tags.books(id).await?;
    Ok(Json(books))
}
