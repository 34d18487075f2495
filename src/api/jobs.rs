//! Job endpoints. Jobs are the roles an author can hold on a book.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        job::{Job, JobInput},
    },
    policy::{Operation, Resource},
    AppState,
};

use super::MaybeUser;

#[utoipa::path(
    get,
    path = "/jobs",
    tag = "jobs",
    responses((status = 200, description = "All jobs", body = Vec<Job>))
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Vec<Job>>> {
    state.config.access.check(Resource::Jobs, Operation::Read, user.as_ref())?;

    let jobs = state.services.jobs.list().await?;
    Ok(Json(jobs))
}

#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "jobs",
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Job details", body = Job),
        (status = 404, description = "Job not found")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Job>> {
    state.config.access.check(Resource::Jobs, Operation::Read, user.as_ref())?;

    let job = state.services.jobs.get_by_id(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/jobs",
    tag = "jobs",
    security(("bearer_auth" = [])),
    request_body = JobInput,
    responses(
        (status = 201, description = "Job created", body = Job),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_job(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<JobInput>,
) -> AppResult<(StatusCode, Json<Job>)> {
    state.config.access.check(Resource::Jobs, Operation::Create, user.as_ref())?;
    data.validate()?;

    let job = state.services.jobs.create(&data).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[utoipa::path(
    put,
    path = "/jobs/{id}",
    tag = "jobs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Job ID")),
    request_body = JobInput,
    responses(
        (status = 200, description = "Job updated", body = Job),
        (status = 404, description = "Job not found")
    )
)]
pub async fn update_job(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<JobInput>,
) -> AppResult<Json<Job>> {
    state.config.access.check(Resource::Jobs, Operation::Update, user.as_ref())?;
    data.validate()?;

    let job = state.services.jobs.update(id, &data).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = "jobs",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Job ID")),
    responses(
        (status = 204, description = "Job deleted"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Job still referenced")
    )
)]
pub async fn delete_job(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Jobs, Operation::Delete, user.as_ref())?;

    state.services.jobs.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
