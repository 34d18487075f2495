//! Book aggregate and the request/response shapes built around it.
//!
//! A `Book` owns its authorship and edition records (and its reviews) and
//! references a shared serie and shared tags. Records only enter the
//! aggregate through `add_authors` / `add_editors`, which drop equivalent
//! records and set the back-reference before inserting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::{
    author::Author,
    editor::Editor,
    identity::CatalogIdentity,
    job::Job,
    project::{BookRef, ProjectBookCreation, ProjectBookEdition},
    review::Review,
    serie::Serie,
    tag::Tag,
};

pub const TITLE_MAX_LENGTH: u64 = 255;

#[derive(Debug, Clone)]
pub struct Book {
    key: Uuid,
    id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub index_in_serie: Option<i32>,
    serie: Option<Serie>,
    tags: Vec<Tag>,
    reviews: Vec<Review>,
    authors: Vec<ProjectBookCreation>,
    editors: Vec<ProjectBookEdition>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            key: Uuid::new_v4(),
            id: None,
            title: title.into(),
            description: None,
            index_in_serie: None,
            serie: None,
            tags: Vec::new(),
            reviews: Vec::new(),
            authors: Vec::new(),
            editors: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_index_in_serie(mut self, index: i32) -> Self {
        self.index_in_serie = Some(index);
        self
    }

    /// `None` until the book has been saved
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn reference(&self) -> BookRef {
        BookRef {
            key: self.key,
            id: self.id,
        }
    }

    /// Record the identifier given by storage and propagate it to every
    /// child back-reference.
    pub fn assign_id(&mut self, id: i32) {
        self.id = Some(id);
        let reference = self.reference();
        for project in &mut self.authors {
            project.link(reference);
        }
        for project in &mut self.editors {
            project.link(reference);
        }
        for review in &mut self.reviews {
            review.book_id = Some(id);
        }
    }

    // =========================================================================
    // SERIE / TAGS / REVIEWS
    // =========================================================================

    pub fn serie(&self) -> Option<&Serie> {
        self.serie.as_ref()
    }

    pub fn set_serie(&mut self, serie: Option<Serie>) -> &mut Self {
        self.serie = serie;
        self
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        if !self.tags.iter().any(|t| t.same_as(&tag)) {
            self.tags.push(tag);
        }
        self
    }

    pub fn set_tags(&mut self, tags: impl IntoIterator<Item = Tag>) -> &mut Self {
        self.tags.clear();
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn add_review(&mut self, mut review: Review) -> &mut Self {
        review.book_id = self.id;
        self.reviews.push(review);
        self
    }

    // =========================================================================
    // AUTHORS
    // =========================================================================

    pub fn authors(&self) -> &[ProjectBookCreation] {
        &self.authors
    }

    /// Credit `author` with `job` on this book. Does nothing if an equivalent
    /// credit already exists.
    pub fn add_author(&mut self, author: Author, job: Job) -> &mut Self {
        self.add_authors(ProjectBookCreation::new(author, job))
    }

    pub fn add_authors(&mut self, mut project: ProjectBookCreation) -> &mut Self {
        if self.has_project_book_creation(&project) {
            tracing::debug!(book = %self, credit = %project, "authorship already present, skipped");
            return self;
        }

        project.link(self.reference());
        self.authors.push(project);
        self
    }

    /// Replace every authorship record; duplicates in `projects` are dropped.
    pub fn set_authors(
        &mut self,
        projects: impl IntoIterator<Item = ProjectBookCreation>,
    ) -> &mut Self {
        self.authors.clear();
        for project in projects {
            self.add_authors(project);
        }
        self
    }

    fn has_project_book_creation(&self, project: &ProjectBookCreation) -> bool {
        self.authors.iter().any(|existing| existing.matches(project))
    }

    // =========================================================================
    // EDITORS
    // =========================================================================

    pub fn editors(&self) -> &[ProjectBookEdition] {
        &self.editors
    }

    pub fn add_editor(
        &mut self,
        editor: Editor,
        publication_date: NaiveDate,
        isbn: Option<String>,
        collection: Option<String>,
    ) -> &mut Self {
        let project = ProjectBookEdition::new(editor, publication_date)
            .with_isbn(isbn)
            .with_collection(collection);
        self.add_editors(project)
    }

    /// First edition recorded for an editor wins.
    pub fn add_editors(&mut self, mut project: ProjectBookEdition) -> &mut Self {
        if self.has_project_book_edition(&project) {
            tracing::debug!(book = %self, edition = %project, "edition already present, skipped");
            return self;
        }

        project.link(self.reference());
        self.editors.push(project);
        self
    }

    pub fn set_editors(
        &mut self,
        projects: impl IntoIterator<Item = ProjectBookEdition>,
    ) -> &mut Self {
        self.editors.clear();
        for project in projects {
            self.add_editors(project);
        }
        self
    }

    fn has_project_book_edition(&self, project: &ProjectBookEdition) -> bool {
        self.editors.iter().any(|existing| existing.matches(project))
    }
}

/// Label used by selection widgets and as the footprint of unsaved books
impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        if let Some(description) = self.description.as_deref().filter(|s| !s.is_empty()) {
            write!(f, ", {}", description)?;
        }
        if let Some(index) = self.index_in_serie {
            write!(f, ", #{}", index)?;
        }
        Ok(())
    }
}

impl CatalogIdentity for Book {
    fn identifier(&self) -> Option<i32> {
        self.id
    }
}

// =============================================================================
// API SHAPES
// =============================================================================

/// Short book representation for lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub index_in_serie: Option<i32>,
    pub serie_id: Option<i32>,
}

/// Authorship as exposed by the API (the book itself is omitted)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorshipView {
    pub id: Option<i32>,
    pub author: Author,
    pub role: Job,
}

impl From<&ProjectBookCreation> for AuthorshipView {
    fn from(project: &ProjectBookCreation) -> Self {
        Self {
            id: project.id(),
            author: project.author().clone(),
            role: project.role().clone(),
        }
    }
}

/// Edition as exposed by the API (the book itself is omitted)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EditionView {
    pub id: Option<i32>,
    pub editor: Editor,
    pub publication_date: NaiveDate,
    pub isbn: Option<String>,
    pub collection: Option<String>,
}

impl From<&ProjectBookEdition> for EditionView {
    fn from(project: &ProjectBookEdition) -> Self {
        Self {
            id: project.id(),
            editor: project.editor().clone(),
            publication_date: project.publication_date(),
            isbn: project.isbn().map(str::to_string),
            collection: project.collection().map(str::to_string),
        }
    }
}

/// Full book representation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    pub id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub index_in_serie: Option<i32>,
    pub serie: Option<Serie>,
    pub tags: Vec<Tag>,
    pub authors: Vec<AuthorshipView>,
    pub editors: Vec<EditionView>,
}

impl From<&Book> for BookDetail {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id(),
            title: book.title.clone(),
            description: book.description.clone(),
            index_in_serie: book.index_in_serie,
            serie: book.serie().cloned(),
            tags: book.tags().to_vec(),
            authors: book.authors().iter().map(AuthorshipView::from).collect(),
            editors: book.editors().iter().map(EditionView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookSort {
    Id,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Book search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Exact identifier
    pub id: Option<i32>,
    /// Case-insensitive title prefix
    pub title: Option<String>,
    /// Substring of the description
    pub description: Option<String>,
    /// Exact tag name
    pub tag: Option<String>,
    pub sort: Option<BookSort>,
    pub direction: Option<SortDirection>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Reference to a shared entity: an existing one by `id`, or a new one by `name`
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NamedRef {
    pub id: Option<i32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuthorshipInput {
    pub author_id: i32,
    pub job_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EditionInput {
    pub editor_id: i32,
    pub publication_date: NaiveDate,
    #[validate(length(max = 32, message = "ISBN cannot exceed 32 characters"))]
    pub isbn: Option<String>,
    #[validate(length(max = 255, message = "Collection cannot exceed 255 characters"))]
    pub collection: Option<String>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Title cannot be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = TITLE_MAX_LENGTH, message = "Title cannot exceed 255 characters")
    )]
    pub title: String,
    pub description: Option<String>,
    pub index_in_serie: Option<i32>,
    pub serie: Option<NamedRef>,
    #[serde(default)]
    pub tags: Vec<NamedRef>,
    #[serde(default)]
    pub authors: Vec<AuthorshipInput>,
    #[serde(default)]
    #[validate(nested)]
    pub editors: Vec<EditionInput>,
}

/// Update book request. Absent fields are left unchanged, present
/// collections replace the current ones. `description`, `index_in_serie`
/// and `serie` are cleared by an explicit `null`.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = TITLE_MAX_LENGTH, message = "Title cannot exceed 255 characters")
    )]
    pub title: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub index_in_serie: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<NamedRef>)]
    pub serie: Option<Option<NamedRef>>,
    pub tags: Option<Vec<NamedRef>>,
    pub authors: Option<Vec<AuthorshipInput>>,
    #[validate(nested)]
    pub editors: Option<Vec<EditionInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn moore() -> Author {
        Author::new(Some("Alan"), "Moore")
    }

    fn writer() -> Job {
        Job::new("writer")
    }

    #[test]
    fn test_new_book_is_empty() {
        let book = Book::new("Watchmen");
        assert!(book.id().is_none());
        assert!(book.authors().is_empty());
        assert!(book.editors().is_empty());
        assert!(book.tags().is_empty());
        assert!(book.reviews().is_empty());
        assert!(book.serie().is_none());
    }

    #[test]
    fn test_footprint() {
        let book = Book::new("Watchmen")
            .with_description("graphic novel")
            .with_index_in_serie(1);
        assert_eq!(book.to_string(), "Watchmen, graphic novel, #1");

        assert_eq!(Book::new("Watchmen").to_string(), "Watchmen");
        assert_eq!(Book::new("Watchmen").with_description("").to_string(), "Watchmen");
        assert_eq!(Book::new("Watchmen").with_index_in_serie(0).to_string(), "Watchmen, #0");
    }

    #[test]
    fn test_same_author_and_job_twice() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore(), writer()).add_author(moore(), writer());
        assert_eq!(book.authors().len(), 1);
    }

    #[test]
    fn test_same_author_other_job() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore(), writer())
            .add_author(moore(), Job::new("colorist"));
        assert_eq!(book.authors().len(), 2);
    }

    #[test]
    fn test_homonyms_with_distinct_ids_are_kept() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore().with_id(1), writer().with_id(1))
            .add_author(moore().with_id(2), writer().with_id(1));
        assert_eq!(book.authors().len(), 2);
    }

    #[test]
    fn test_unsaved_homonyms_collide() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore(), writer()).add_author(moore(), writer());
        assert_eq!(book.authors().len(), 1);

        // saved author against an unsaved homonym: footprint decides
        book.add_author(moore().with_id(7), writer());
        assert_eq!(book.authors().len(), 1);
    }

    #[test]
    fn test_same_ids_different_labels() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore().with_id(1), writer().with_id(3))
            .add_author(Author::new(None, "Moore").with_id(1), Job::new("scenarist").with_id(3));
        assert_eq!(book.authors().len(), 1);
    }

    #[test]
    fn test_editor_first_write_wins() {
        let dc = Editor::new("DC Comics").with_id(4);
        let mut book = Book::new("Watchmen");
        book.add_editor(dc.clone(), date(1986, 9, 1), None, None)
            .add_editor(dc, date(1987, 1, 1), Some("isbn".to_string()), Some("Absolute".to_string()));

        assert_eq!(book.editors().len(), 1);
        assert_eq!(book.editors()[0].publication_date(), date(1986, 9, 1));
        assert!(book.editors()[0].isbn().is_none());
    }

    #[test]
    fn test_unsaved_editor_matched_by_edition_footprint() {
        let mut book = Book::new("Watchmen");
        book.add_editor(Editor::new("DC Comics"), date(1986, 9, 1), None, None)
            .add_editor(Editor::new("DC Comics"), date(1986, 9, 1), None, None)
            .add_editor(Editor::new("DC Comics"), date(1987, 1, 1), None, None);
        assert_eq!(book.editors().len(), 2);
    }

    #[test]
    fn test_set_authors_deduplicates() {
        let projects = vec![
            ProjectBookCreation::new(moore(), writer()),
            ProjectBookCreation::new(Author::new(Some("Dave"), "Gibbons"), Job::new("artist")),
            ProjectBookCreation::new(moore(), writer()),
        ];

        let mut bulk = Book::new("Watchmen");
        bulk.add_author(Author::new(None, "Someone"), Job::new("letterer"));
        bulk.set_authors(projects);

        let mut one_by_one = Book::new("Watchmen");
        one_by_one
            .add_author(moore(), writer())
            .add_author(Author::new(Some("Dave"), "Gibbons"), Job::new("artist"));

        assert_eq!(bulk.authors().len(), 2);
        assert_eq!(bulk.authors().len(), one_by_one.authors().len());
        assert!(bulk.authors().iter().all(|p| p.author().lastname != "Someone"));
    }

    #[test]
    fn test_set_editors_deduplicates() {
        let glenat = Editor::new("Glénat").with_id(1);
        let mut book = Book::new("Akira");
        book.set_editors(vec![
            ProjectBookEdition::new(glenat.clone(), date(1990, 1, 1)),
            ProjectBookEdition::new(glenat, date(1999, 1, 1)),
            ProjectBookEdition::new(Editor::new("Kodansha").with_id(2), date(1984, 1, 1)),
        ]);
        assert_eq!(book.editors().len(), 2);
    }

    #[test]
    fn test_back_reference_is_set_on_insert() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore(), writer())
            .add_editor(Editor::new("DC Comics"), date(1986, 9, 1), None, None)
            .add_authors(ProjectBookCreation::new(
                Author::new(Some("Dave"), "Gibbons"),
                Job::new("artist"),
            ));

        let reference = book.reference();
        assert!(book.authors().iter().all(|p| p.book() == Some(reference)));
        assert!(book.editors().iter().all(|p| p.book() == Some(reference)));
    }

    #[test]
    fn test_assign_id_refreshes_back_references() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore(), writer())
            .add_editor(Editor::new("DC Comics"), date(1986, 9, 1), None, None)
            .add_review(Review::new(5, "A classic"));

        book.assign_id(42);

        let reference = book.reference();
        assert_eq!(reference.id, Some(42));
        assert!(book.authors().iter().all(|p| p.book() == Some(reference)));
        assert!(book.editors().iter().all(|p| p.book() == Some(reference)));
        assert_eq!(book.reviews()[0].book_id, Some(42));
    }

    #[test]
    fn test_records_of_other_books_are_not_confused() {
        let mut first = Book::new("Watchmen");
        let mut second = Book::new("V for Vendetta");
        first.add_author(moore(), writer());
        second.add_author(moore(), writer());

        assert_ne!(first.authors()[0].book(), second.authors()[0].book());
    }

    #[test]
    fn test_tags_deduplicated() {
        let mut book = Book::new("Watchmen");
        book.add_tag(Tag::new("comics").with_id(1))
            .add_tag(Tag::new("comics").with_id(1))
            .add_tag(Tag::new("dystopia"));
        assert_eq!(book.tags().len(), 2);

        book.set_tags(vec![Tag::new("noir"), Tag::new("noir")]);
        assert_eq!(book.tags().len(), 1);
    }

    #[test]
    fn test_create_book_validation() {
        let valid: CreateBook = serde_json::from_str(r#"{"title": "Watchmen"}"#).unwrap();
        assert!(valid.validate().is_ok());

        let blank: CreateBook = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(blank.validate().is_err());

        let long = CreateBook {
            title: "x".repeat(256),
            description: None,
            index_in_serie: None,
            serie: None,
            tags: vec![],
            authors: vec![],
            editors: vec![],
        };
        assert!(long.validate().is_err());

        let max = CreateBook {
            title: "é".repeat(255),
            ..long
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn test_update_book_validation() {
        assert!(UpdateBook::default().validate().is_ok());

        let blank = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_update_book_null_clears_absent_keeps() {
        let absent: UpdateBook = serde_json::from_str(r#"{"title": "Watchmen"}"#).unwrap();
        assert_eq!(absent.description, None);
        assert!(absent.serie.is_none());

        let cleared: UpdateBook =
            serde_json::from_str(r#"{"description": null, "serie": null, "index_in_serie": null}"#)
                .unwrap();
        assert_eq!(cleared.description, Some(None));
        assert_eq!(cleared.index_in_serie, Some(None));
        assert!(matches!(cleared.serie, Some(None)));

        let set: UpdateBook = serde_json::from_str(r#"{"description": "graphic novel"}"#).unwrap();
        assert_eq!(set.description, Some(Some("graphic novel".to_string())));
    }

    #[test]
    fn test_detail_omits_book_from_records() {
        let mut book = Book::new("Watchmen");
        book.add_author(moore(), writer());
        let json = serde_json::to_value(BookDetail::from(&book)).unwrap();
        assert_eq!(json["authors"][0]["author"]["lastname"], "Moore");
        assert!(json["authors"][0].get("book").is_none());
    }
}
