//! Jobs repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::job::{Job, JobInput},
};

#[derive(Clone)]
pub struct JobsRepository {
    pool: Pool<Postgres>,
}

impl JobsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(
            "SELECT id, translation_key FROM jobs ORDER BY translation_key",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Job> {
        sqlx::query_as::<_, Job>("SELECT id, translation_key FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))
    }

    pub async fn translation_key_exists(&self, key: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM jobs WHERE translation_key = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(key)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &JobInput) -> AppResult<Job> {
        let row = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (translation_key) VALUES ($1) RETURNING id, translation_key",
        )
        .bind(&data.translation_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &JobInput) -> AppResult<Job> {
        sqlx::query_as::<_, Job>(
            "UPDATE jobs SET translation_key = $2 WHERE id = $1 RETURNING id, translation_key",
        )
        .bind(id)
        .bind(&data.translation_key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_authors WHERE job_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if referenced {
            return Err(AppError::Conflict(format!("Job {} is still in use", id)));
        }

        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Job {} not found", id)));
        }
        Ok(())
    }
}
