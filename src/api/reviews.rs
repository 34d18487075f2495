//! Review endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        review::{CreateReview, Review, UpdateReview},
    },
    policy::{Operation, Resource},
    AppState,
};

use super::MaybeUser;

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "reviews",
    responses((status = 200, description = "All reviews", body = Vec<Review>))
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> AppResult<Json<Vec<Review>>> {
    state.config.access.check(Resource::Reviews, Operation::Read, user.as_ref())?;

    let reviews = state.services.reviews.list().await?;
    Ok(Json(reviews))
}

#[utoipa::path(
    get,
    path = "/reviews/{id}",
    tag = "reviews",
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review details", body = Review),
        (status = 404, description = "Review not found")
    )
)]
pub async fn get_review(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Review>> {
    state.config.access.check(Resource::Reviews, Operation::Read, user.as_ref())?;

    let review = state.services.reviews.get_by_id(id).await?;
    Ok(Json(review))
}

#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_review(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(data): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<Review>)> {
    state.config.access.check(Resource::Reviews, Operation::Create, user.as_ref())?;
    data.validate()?;

    let review = state.services.reviews.create(&data).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    request_body = UpdateReview,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 404, description = "Review not found")
    )
)]
pub async fn update_review(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateReview>,
) -> AppResult<Json<Review>> {
    state.config.access.check(Resource::Reviews, Operation::Update, user.as_ref())?;
    data.validate()?;

    let review = state.services.reviews.update(id, &data).await?;
    Ok(Json(review))
}

#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.config.access.check(Resource::Reviews, Operation::Delete, user.as_ref())?;

    state.services.reviews.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
