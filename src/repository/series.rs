//! Series repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::serie::{Serie, SerieInput},
};

#[derive(Clone)]
pub struct SeriesRepository {
    pool: Pool<Postgres>,
}

impl SeriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Serie>> {
        let rows = sqlx::query_as::<_, Serie>("SELECT id, name FROM series ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Serie> {
        sqlx::query_as::<_, Serie>("SELECT id, name FROM series WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Serie {} not found", id)))
    }

    pub async fn create(&self, data: &SerieInput) -> AppResult<Serie> {
        let row = sqlx::query_as::<_, Serie>("INSERT INTO series (name) VALUES ($1) RETURNING id, name")
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &SerieInput) -> AppResult<Serie> {
        sqlx::query_as::<_, Serie>("UPDATE series SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&data.name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Serie {} not found", id)))
    }

    /// Delete a serie; its books stay in the catalog without a serie.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM series WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Serie {} not found", id)));
        }
        Ok(())
    }
}
