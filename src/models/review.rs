//! Review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use validator::Validate;

/// Reader review of a book. Reviews are owned by their book and go away with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: Option<i32>,
    pub book_id: Option<i32>,
    /// Rating from 0 to 5
    pub rating: i16,
    pub body: String,
    pub author: Option<String>,
    pub publication_date: Option<DateTime<Utc>>,
}

impl Review {
    pub fn new(rating: i16, body: &str) -> Self {
        Self {
            id: None,
            book_id: None,
            rating,
            body: body.to_string(),
            author: None,
            publication_date: None,
        }
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.rating)?;
        if let Some(author) = self.author.as_deref() {
            write!(f, " by {}", author)?;
        }
        Ok(())
    }
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub book_id: i32,
    #[validate(range(min = 0, max = 5, message = "Rating must be between 0 and 5"))]
    pub rating: i16,
    #[validate(length(min = 1, message = "Review body cannot be empty"))]
    pub body: String,
    #[validate(length(max = 255))]
    pub author: Option<String>,
}

/// Update review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReview {
    #[validate(range(min = 0, max = 5, message = "Rating must be between 0 and 5"))]
    pub rating: Option<i16>,
    #[validate(length(min = 1, message = "Review body cannot be empty"))]
    pub body: Option<String>,
    #[validate(length(max = 255))]
    pub author: Option<String>,
}
