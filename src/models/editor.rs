//! Editor (publisher) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use super::identity::CatalogIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Editor {
    pub id: Option<i32>,
    pub name: String,
}

impl Editor {
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

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl CatalogIdentity for Editor {
    fn identifier(&self) -> Option<i32> {
        self.id
    }
}

/// Create or update editor request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EditorInput {
    #[validate(length(min = 1, max = 255, message = "Name must be 1 to 255 characters"))]
    pub name: String,
}
