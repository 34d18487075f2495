//! Author model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

use super::identity::CatalogIdentity;

/// Person credited on a book through an authorship record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Option<i32>,
    pub firstname: Option<String>,
    pub lastname: String,
}

impl Author {
    pub fn new(firstname: Option<&str>, lastname: &str) -> Self {
        Self {
            id: None,
            firstname: firstname.map(str::to_string),
            lastname: lastname.to_string(),
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.firstname.as_deref().filter(|s| !s.is_empty()) {
            Some(firstname) => write!(f, "{} {}", firstname, self.lastname),
            None => write!(f, "{}", self.lastname),
        }
    }
}

impl CatalogIdentity for Author {
    fn identifier(&self) -> Option<i32> {
        self.id
    }
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(max = 255, message = "Firstname cannot exceed 255 characters"))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Lastname must be 1 to 255 characters"))]
    pub lastname: String,
}

/// Update author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAuthor {
    #[validate(length(max = 255, message = "Firstname cannot exceed 255 characters"))]
    pub firstname: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Lastname must be 1 to 255 characters"))]
    pub lastname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint() {
        assert_eq!(Author::new(Some("Alan"), "Moore").to_string(), "Alan Moore");
        assert_eq!(Author::new(None, "Moebius").to_string(), "Moebius");
        assert_eq!(Author::new(Some(""), "Hergé").to_string(), "Hergé");
    }

    #[test]
    fn test_identifier_wins_over_footprint() {
        let a = Author::new(Some("Alan"), "Moore").with_id(1);
        let b = Author::new(Some("Alan"), "Moore").with_id(2);
        assert!(!a.same_as(&b));

        let unsaved = Author::new(Some("Alan"), "Moore");
        assert!(a.same_as(&unsaved));
        assert!(unsaved.same_as(&Author::new(Some("Alan"), "Moore")));
    }
}
