//! Serie model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use super::identity::CatalogIdentity;

/// A series of books, ordered by `Book::index_in_serie`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Serie {
    pub id: Option<i32>,
    pub name: String,
}

impl Serie {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Serie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl CatalogIdentity for Serie {
    fn identifier(&self) -> Option<i32> {
        self.id
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SerieInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,
}
