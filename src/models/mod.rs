//! Data models for the library catalog

pub mod author;
pub mod book;
pub mod editor;
pub mod identity;
pub mod job;
pub mod project;
pub mod review;
pub mod serie;
pub mod tag;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookDetail, BookShort};
pub use editor::Editor;
pub use identity::CatalogIdentity;
pub use job::Job;
pub use project::{BookRef, ProjectBookCreation, ProjectBookEdition};
pub use review::Review;
pub use serie::Serie;
pub use tag::Tag;
pub use user::{Role, User, UserClaims};
