//! Reviews service

use crate::{
    error::{AppError, AppResult},
    models::review::{CreateReview, Review, UpdateReview},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Review>> {
        self.repository.reviews.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Review> {
        self.repository.reviews.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateReview) -> AppResult<Review> {
        if !self.repository.books.exists(data.book_id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", data.book_id)));
        }
        self.repository.reviews.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateReview) -> AppResult<Review> {
        self.repository.reviews.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.reviews.delete(id).await
    }
}
