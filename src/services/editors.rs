//! Editors service

use crate::{
    error::AppResult,
    models::editor::{Editor, EditorInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct EditorsService {
    repository: Repository,
}

impl EditorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Editor>> {
        self.repository.editors.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Editor> {
        self.repository.editors.get_by_id(id).await
    }

    pub async fn create(&self, data: &EditorInput) -> AppResult<Editor> {
        self.repository.editors.create(data).await
    }

    pub async fn update(&self, id: i32, data: &EditorInput) -> AppResult<Editor> {
        self.repository.editors.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.editors.delete(id).await
    }
}
