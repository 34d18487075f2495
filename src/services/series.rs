//! Series service

use crate::{
    error::AppResult,
    models::{
        book::BookShort,
        serie::{Serie, SerieInput},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct SeriesService {
    repository: Repository,
}

impl SeriesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Serie>> {
        self.repository.series.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Serie> {
        self.repository.series.get_by_id(id).await
    }

    pub async fn create(&self, data: &SerieInput) -> AppResult<Serie> {
        self.repository.series.create(data).await
    }

    pub async fn update(&self, id: i32, data: &SerieInput) -> AppResult<Serie> {
        self.repository.series.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.series.delete(id).await
    }

    /// Books of the serie in reading order
    pub async fn books(&self, id: i32) -> AppResult<Vec<BookShort>> {
        self.repository.series.get_by_id(id).await?;
        self.repository.books.list_by_serie(id).await
    }
}
