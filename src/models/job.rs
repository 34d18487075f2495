//! Job (role of an author on a book)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use super::identity::CatalogIdentity;

/// Role such as writer, illustrator or colorist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Job {
    pub id: Option<i32>,
    /// Translation key used by front-ends to label the role
    pub translation_key: String,
}

impl Job {
    pub fn new(translation_key: &str) -> Self {
        Self {
            id: None,
            translation_key: translation_key.to_string(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.translation_key)
    }
}

impl CatalogIdentity for Job {
    fn identifier(&self) -> Option<i32> {
        self.id
    }
}

/// Create or update job request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct JobInput {
    #[validate(length(min = 1, max = 255, message = "Translation key must be 1 to 255 characters"))]
    pub translation_key: String,
}
