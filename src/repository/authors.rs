//! Authors repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor, UpdateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>(
            "SELECT id, firstname, lastname FROM authors ORDER BY lastname, firstname",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT id, firstname, lastname FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn create(&self, data: &CreateAuthor) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (firstname, lastname)
            VALUES ($1, $2)
            RETURNING id, firstname, lastname
            "#,
        )
        .bind(&data.firstname)
        .bind(&data.lastname)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &UpdateAuthor) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET firstname = COALESCE($2, firstname),
                lastname = COALESCE($3, lastname)
            WHERE id = $1
            RETURNING id, firstname, lastname
            "#,
        )
        .bind(id)
        .bind(&data.firstname)
        .bind(&data.lastname)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Delete an author. Fails while the author is still credited on a book.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let credited: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM book_authors WHERE author_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        if credited {
            return Err(AppError::Conflict(format!(
                "Author {} is still credited on at least one book",
                id
            )));
        }

        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
