//! Serie endpoints

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
        serie::{Serie, SerieInput},
    },
    policy::{Operation, Resource},
    AppState,
};

use super::MaybeUser;

#[utoipa::path(
    get,
    path = "/series",
    tag = "series",
    responses((status = 200, description = "All series", body = Vec<Serie>))
)]
pub async fn list_series(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Vec<Serie>>> {
    state.config.access.check(Resource::Series, Operation::Read, user.as_ref())?;

    let series = state.services.series.list().await?;
    Ok(Json(series))
}

#[utoipa::path(
    get,
    path = "/series/{id}",
    tag = "series",
    params(("id" = i32, Path, description = "Serie ID")),
    responses(
        (status = 200, description = "Serie details", body = Serie),
        (status = 404, description = "Serie not found")
    )
)]
pub async fn get_serie(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Serie>> {
    state.config.access.check(Resource::Series, Operation::Read, user.as_ref())?;

    let serie = state.services.series.get_by_id(id).await?;
    Ok(Json(serie))
}

#[utoipa::path(
    post,
    path = "/series",
    tag = "series",
    security(("bearer_auth" = [])),
    request_body = SerieInput,
    responses(
        (status = 201, description = "Serie created", body = Serie),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_serie(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<SerieInput>,
) -> AppResult<(StatusCode, Json<Serie>)> {
    state.config.access.check(Resource::Series, Operation::Create, user.as_ref())?;
    data.validate()?;

    let serie = state.services.series.create(&data).await?;
    Ok((StatusCode::CREATED, Json(serie)))
}

#[utoipa::path(
    put,
    path = "/series/{id}",
    tag = "series",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Serie ID")),
    request_body = SerieInput,
    responses(
        (status = 200, description = "Serie updated", body = Serie),
        (status = 404, description = "Serie not found")
    )
)]
pub async fn update_serie(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<SerieInput>,
) -> AppResult<Json<Serie>> {
    state.config.access.check(Resource::Series, Operation::Update, user.as_ref())?;
    data.validate()?;

    let serie = state.services.series.update(id, &data).await?;
    Ok(Json(serie))
}

#[utoipa::path(
    delete,
    path = "/series/{id}",
    tag = "series",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Serie ID")),
    responses(
        (status = 204, description = "Serie deleted"),
        (status = 404, description = "Serie not found")
    )
)]
pub async fn delete_serie(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Series, Operation::Delete, user.as_ref())?;

    state.services.series.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Books belonging to a serie
#[utoipa::path(
    get,
    path = "/series/{id}/books",
    tag = "series",
    params(("id" = i32, Path, description = "Serie ID")),
    responses(
        (status = 200, description = "Books", body = Vec<BookShort>),
        (status = 404, description = "Serie not found")
    )
)]
pub async fn list_serie_books(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookShort>>> {
    state.config.access.check(Resource::Books, Operation::Read, user.as_ref())?;

    let books = state.services.series.books(id).await?;
    Ok(Json(books))
}
