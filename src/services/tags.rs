//! Tags service

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookShort,
        tag::{Tag, TagInput},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct TagsService {
    repository: Repository,
}

impl TagsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Tag>> {
        self.repository.tags.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Tag> {
        self.repository.tags.get_by_id(id).await
    }

    /// Create a tag; tag names are unique
    pub async fn create(&self, data: &TagInput) -> AppResult<Tag> {
        if self.repository.tags.name_exists(&data.name, None).await? {
            return Err(AppError::Conflict(format!("Tag '{}' already exists", data.name)));
        }
        self.repository.tags.create(data).await
    }

    pub async fn update(&self, id: i32, data: &TagInput) -> AppResult<Tag> {
        if self.repository.tags.name_exists(&data.name, Some(id)).await? {
            return Err(AppError::Conflict(format!("Tag '{}' already exists", data.name)));
        }
        self.repository.tags.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.tags.delete(id).await
    }

    pub async fn books(&self, id: i32) -> AppResult<Vec<BookShort>> {
        self.repository.tags.get_by_id(id).await?;
        self.repository.books.list_by_tag(id).await
    }
}
