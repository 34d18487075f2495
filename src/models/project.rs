//! Authorship and edition records linking a book to its authors and editors.
//!
//! Records are attached through `Book`, which sets the back-reference; there
//! is no public way to point a record at a book.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{author::Author, editor::Editor, identity::CatalogIdentity, job::Job};

/// Back-reference from a child record to its owning book.
///
/// `key` identifies the in-memory aggregate (stable before the first save),
/// `id` is the database identifier once the book has been persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub key: Uuid,
    pub id: Option<i32>,
}

/// Authorship record: (book, author, job)
#[derive(Debug, Clone)]
pub struct ProjectBookCreation {
    id: Option<i32>,
    book: Option<BookRef>,
    author: Author,
    role: Job,
}

impl ProjectBookCreation {
    pub fn new(author: Author, role: Job) -> Self {
        Self {
            id: None,
            book: None,
            author,
            role,
        }
    }

    /// Record loaded from storage
    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn book(&self) -> Option<BookRef> {
        self.book
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn role(&self) -> &Job {
        &self.role
    }

    /// Same author and same job, each compared by identifier or footprint
    pub fn matches(&self, other: &ProjectBookCreation) -> bool {
        self.author.same_as(&other.author) && self.role.same_as(&other.role)
    }

    pub(super) fn link(&mut self, book: BookRef) {
        self.book = Some(book);
    }
}

impl fmt::Display for ProjectBookCreation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.author, self.role)
    }
}

/// Edition record: (book, editor, publication date, isbn, collection)
#[derive(Debug, Clone)]
pub struct ProjectBookEdition {
    id: Option<i32>,
    book: Option<BookRef>,
    editor: Editor,
    publication_date: NaiveDate,
    isbn: Option<String>,
    collection: Option<String>,
}

impl ProjectBookEdition {
    pub fn new(editor: Editor, publication_date: NaiveDate) -> Self {
        Self {
            id: None,
            book: None,
            editor,
            publication_date,
            isbn: None,
            collection: None,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_isbn(mut self, isbn: Option<String>) -> Self {
        self.isbn = isbn;
        self
    }

    pub fn with_collection(mut self, collection: Option<String>) -> Self {
        self.collection = collection;
        self
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn book(&self) -> Option<BookRef> {
        self.book
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn publication_date(&self) -> NaiveDate {
        self.publication_date
    }

    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    /// Same editor when both editors are saved, otherwise same edition footprint
    /// (editor, date, collection and isbn together).
    pub fn matches(&self, other: &ProjectBookEdition) -> bool {
        match (self.editor.id, other.editor.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }

    pub(super) fn link(&mut self, book: BookRef) {
        self.book = Some(book);
    }
}

impl fmt::Display for ProjectBookEdition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.editor, self.publication_date.format("%Y-%m-%d"))?;
        if let Some(collection) = self.collection.as_deref().filter(|s| !s.is_empty()) {
            write!(f, ", {}", collection)?;
        }
        if let Some(isbn) = self.isbn.as_deref().filter(|s| !s.is_empty()) {
            write!(f, ", {}", isbn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_edition_footprint() {
        let edition = ProjectBookEdition::new(Editor::new("DC Comics"), date(1986, 9, 1))
            .with_collection(Some("Vertigo".to_string()))
            .with_isbn(Some("0-930289-23-4".to_string()));
        assert_eq!(edition.to_string(), "DC Comics, 1986-09-01, Vertigo, 0-930289-23-4");

        let bare = ProjectBookEdition::new(Editor::new("DC Comics"), date(1986, 9, 1));
        assert_eq!(bare.to_string(), "DC Comics, 1986-09-01");
    }

    #[test]
    fn test_unsaved_editions_match_on_footprint() {
        let a = ProjectBookEdition::new(Editor::new("Dargaud"), date(2001, 1, 1));
        let b = ProjectBookEdition::new(Editor::new("Dargaud"), date(2001, 1, 1));
        let c = ProjectBookEdition::new(Editor::new("Dargaud"), date(2002, 1, 1));
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_authorship_footprint() {
        let project = ProjectBookCreation::new(Author::new(Some("Alan"), "Moore"), Job::new("writer"));
        assert_eq!(project.to_string(), "Alan Moore (writer)");
        assert!(project.book().is_none());
    }
}
