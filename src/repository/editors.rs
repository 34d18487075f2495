//! Editors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::editor::{Editor, EditorInput},
};

#[derive(Clone)]
pub struct EditorsRepository {
    pool: Pool<Postgres>,
}

impl EditorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Editor>> {
        let rows = sqlx::query_as::<_, Editor>("SELECT id, name FROM editors ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Editor> {
        sqlx::query_as::<_, Editor>("SELECT id, name FROM editors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Editor {} not found", id)))
    }

    pub async fn create(&self, data: &EditorInput) -> AppResult<Editor> {
        let row = sqlx::query_as::<_, Editor>(
            "INSERT INTO editors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &EditorInput) -> AppResult<Editor> {
        sqlx::query_as::<_, Editor>("UPDATE editors SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&data.name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Editor {} not found", id)))
    }

    /// Delete an editor. Fails while an edition record still points to it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let referenced: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_editions WHERE editor_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if referenced {
            return Err(AppError::Conflict(format!(
                "Editor {} still has editions",
                id
            )));
        }

        let result = sqlx::query("DELETE FROM editors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Editor {} not found", id)));
        }
        Ok(())
    }
}
