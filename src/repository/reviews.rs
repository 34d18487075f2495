//! Reviews repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::review::{CreateReview, Review, UpdateReview},
};

const REVIEW_COLUMNS: &str = "id, book_id, rating, body, author, publication_date";

#[derive(Clone)]
pub struct ReviewsRepository {
    pool: Pool<Postgres>,
}

impl ReviewsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Review>> {
        let query = format!(
            "SELECT {} FROM reviews ORDER BY publication_date DESC, id DESC",
            REVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, Review>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<Review>> {
        let query = format!(
            "SELECT {} FROM reviews WHERE book_id = $1 ORDER BY publication_date DESC, id DESC",
            REVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, Review>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Review> {
        let query = format!("SELECT {} FROM reviews WHERE id = $1", REVIEW_COLUMNS);
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }

    pub async fn create(&self, data: &CreateReview) -> AppResult<Review> {
        let query = format!(
            "INSERT INTO reviews (book_id, rating, body, author) VALUES ($1, $2, $3, $4) RETURNING {}",
            REVIEW_COLUMNS
        );
        let row = sqlx::query_as::<_, Review>(&query)
            .bind(data.book_id)
            .bind(data.rating)
            .bind(&data.body)
            .bind(&data.author)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateReview) -> AppResult<Review> {
        let query = format!(
            r#"
            UPDATE reviews
            SET rating = COALESCE($2, rating),
                body = COALESCE($3, body),
                author = COALESCE($4, author)
            WHERE id = $1
            RETURNING {}
            "#,
            REVIEW_COLUMNS
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(data.rating)
            .bind(&data.body)
            .bind(&data.author)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Review {} not found", id)));
        }
        Ok(())
    }
}
