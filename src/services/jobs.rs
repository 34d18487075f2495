//! Jobs service

use crate::{
    error::{AppError, AppResult},
    models::job::{Job, JobInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct JobsService {
    repository: Repository,
}

impl JobsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Job>> {
        self.repository.jobs.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Job> {
        self.repository.jobs.get_by_id(id).await
    }

    /// Create a job; translation keys are unique
    pub async fn create(&self, data: &JobInput) -> AppResult<Job> {
        if self.repository.jobs.translation_key_exists(&data.translation_key, None).await? {
            return Err(AppError::Conflict(format!(
                "Job '{}' already exists",
                data.translation_key
            )));
        }
        self.repository.jobs.create(data).await
    }

    pub async fn update(&self, id: i32, data: &JobInput) -> AppResult<Job> {
        if self
            .repository
            .jobs
            .translation_key_exists(&data.translation_key, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Job '{}' already exists",
                data.translation_key
            )));
        }
        self.repository.jobs.update(id, data).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.jobs.delete(id).await
    }
}
