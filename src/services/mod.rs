//! Business logic services

pub mod auth;
pub mod authors;
pub mod catalog;
pub mod editors;
pub mod http_demo;
pub mod jobs;
pub mod reviews;
pub mod series;
pub mod tags;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub authors: authors::AuthorsService,
    pub editors: editors::EditorsService,
    pub jobs: jobs::JobsService,
    pub series: series::SeriesService,
    pub tags: tags::TagsService,
    pub reviews: reviews::ReviewsService,
    pub http_demo: http_demo::HttpDemoService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        Ok(Self {
            auth: auth::AuthService::new(&config.auth)?,
            catalog: catalog::CatalogService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            editors: editors::EditorsService::new(repository.clone()),
            jobs: jobs::JobsService::new(repository.clone()),
            series: series::SeriesService::new(repository.clone()),
            tags: tags::TagsService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository.clone()),
            http_demo: http_demo::HttpDemoService::new(&config.demo)?,
            repository,
        })
    }
}
