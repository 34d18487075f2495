//! Editor (publisher) endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        editor::{Editor, EditorInput},
    },
    policy::{Operation, Resource},
    AppState,
};

use super::MaybeUser;

#[utoipa::path(
    get,
    path = "/editors",
    tag = "editors",
    responses((status = 200, description = "All editors", body = Vec<Editor>))
)]
pub async fn list_editors(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Vec<Editor>>> {
    state.config.access.check(Resource::Editors, Operation::Read, user.as_ref())?;

    let editors = state.services.editors.list().await?;
    Ok(Json(editors))
}

#[utoipa::path(
    get,
    path = "/editors/{id}",
    tag = "editors",
    params(("id" = i32, Path, description = "Editor ID")),
    responses(
        (status = 200, description = "Editor details", body = Editor),
        (status = 404, description = "Editor not found")
    )
)]
pub async fn get_editor(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Editor>> {
    state.config.access.check(Resource::Editors, Operation::Read, user.as_ref())?;

    let editor = state.services.editors.get_by_id(id).await?;
    Ok(Json(editor))
}

#[utoipa::path(
    post,
    path = "/editors",
    tag = "editors",
    security(("bearer_auth" = [])),
    request_body = EditorInput,
    responses(
        (status = 201, description = "Editor created", body = Editor),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_editor(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<EditorInput>,
) -> AppResult<(StatusCode, Json<Editor>)> {
    state.config.access.check(Resource::Editors, Operation::Create, user.as_ref())?;
    data.validate()?;

    let editor = state.services.editors.create(&data).await?;
    Ok((StatusCode::CREATED, Json(editor)))
}

#[utoipa::path(
    put,
    path = "/editors/{id}",
    tag = "editors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Editor ID")),
    request_body = EditorInput,
    responses(
        (status = 200, description = "Editor updated", body = Editor),
        (status = 404, description = "Editor not found")
    )
)]
pub async fn update_editor(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<EditorInput>,
) -> AppResult<Json<Editor>> {
    state.config.access.check(Resource::Editors, Operation::Update, user.as_ref())?;
    data.validate()?;

    let editor = state.services.editors.update(id, &data).await?;
    Ok(Json(editor))
}

#[utoipa::path(
    delete,
    path = "/editors/{id}",
    tag = "editors",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Editor ID")),
    responses(
        (status = 204, description = "Editor deleted"),
        (status = 404, description = "Editor not found"),
        (status = 409, description = "Editor still referenced")
    )
)]
pub async fn delete_editor(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Editors, Operation::Delete, user.as_ref())?;

    state.services.editors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
