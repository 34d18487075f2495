//! Repository layer for database operations

pub mod authors;
pub mod books;
pub mod editors;
pub mod jobs;
pub mod reviews;
pub mod series;
pub mod tags;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub authors: authors::AuthorsRepository,
    pub editors: editors::EditorsRepository,
    pub jobs: jobs::JobsRepository,
    pub series: series::SeriesRepository,
    pub tags: tags::TagsRepository,
    pub reviews: reviews::ReviewsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            editors: editors::EditorsRepository::new(pool.clone()),
            jobs: jobs::JobsRepository::new(pool.clone()),
            series: series::SeriesRepository::new(pool.clone()),
            tags: tags::TagsRepository::new(pool.clone()),
            reviews: reviews::ReviewsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
