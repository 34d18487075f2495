//! Catalog service: use cases around the `Book` aggregate.
//!
//! Every mutation of an existing book runs in one transaction that locks the
//! book row, loads the aggregate, applies the change through the aggregate's
//! own mutators and writes it back. Concurrent additions of the same record
//! therefore serialize and the second one is absorbed by the duplicate check.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{
            AuthorshipInput, AuthorshipView, Book, BookQuery, BookShort, CreateBook, EditionInput,
            EditionView, NamedRef, UpdateBook,
        },
        project::{ProjectBookCreation, ProjectBookEdition},
        review::Review,
        serie::Serie,
        tag::Tag,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search books with filters
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<BookShort>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get a book with its serie, tags, authors and editors
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get(id).await
    }

    /// Create a book. Duplicate authorship or edition entries in the request
    /// are dropped silently.
    pub async fn create_book(&self, data: CreateBook) -> AppResult<Book> {
        let serie = match data.serie.as_ref() {
            Some(reference) => Some(self.resolve_serie(reference).await?),
            None => None,
        };
        let tags = self.resolve_tags(&data.tags).await?;
        let authors = self.resolve_authorships(&data.authors).await?;
        let editors = self.resolve_editions(&data.editors).await?;

        let mut book = Book::new(data.title);
        book.description = data.description;
        book.index_in_serie = data.index_in_serie;
        book.set_serie(serie)
            .set_tags(tags)
            .set_authors(authors)
            .set_editors(editors);

        let mut tx = self.repository.pool.begin().await?;
        let id = self.repository.books.insert(&mut tx, &mut book).await?;
        tx.commit().await?;

        self.repository.books.get(id).await
    }

    /// Update a book. Collections present in the request replace the current ones.
    pub async fn update_book(&self, id: i32, data: UpdateBook) -> AppResult<Book> {
        // Outer `None`: unchanged, `Some(None)`: detach
        let serie = match data.serie.as_ref() {
            Some(Some(reference)) => Some(Some(self.resolve_serie(reference).await?)),
            Some(None) => Some(None),
            None => None,
        };
        let tags = match data.tags.as_deref() {
            Some(refs) => Some(self.resolve_tags(refs).await?),
            None => None,
        };
        let authors = match data.authors.as_deref() {
            Some(inputs) => Some(self.resolve_authorships(inputs).await?),
            None => None,
        };
        let editors = match data.editors.as_deref() {
            Some(inputs) => Some(self.resolve_editions(inputs).await?),
            None => None,
        };

        let changes = BookChanges {
            title: data.title,
            description: data.description,
            index_in_serie: data.index_in_serie,
            serie,
            tags,
            authors,
            editors,
        };

        self.mutate(id, move |book| changes.apply(book))
        .await
    }

    /// Delete a book with its authorship, edition and review records
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // =========================================================================
    // AUTHORS / EDITORS OF A BOOK
    // =========================================================================

    pub async fn list_authors(&self, book_id: i32) -> AppResult<Vec<AuthorshipView>> {
        let book = self.repository.books.get(book_id).await?;
        Ok(book.authors().iter().map(AuthorshipView::from).collect())
    }

    /// Credit an author on a book. Crediting the same author with the same
    /// job again leaves the book unchanged.
    pub async fn add_author(&self, book_id: i32, input: AuthorshipInput) -> AppResult<Book> {
        let author = self.repository.authors.get_by_id(input.author_id).await?;
        let job = self.repository.jobs.get_by_id(input.job_id).await?;

        self.mutate(book_id, move |book| {
            book.add_author(author, job);
        })
        .await
    }

    pub async fn set_authors(&self, book_id: i32, inputs: Vec<AuthorshipInput>) -> AppResult<Book> {
        let projects = self.resolve_authorships(&inputs).await?;
        self.mutate(book_id, move |book| {
            book.set_authors(projects);
        })
        .await
    }

    pub async fn list_editors(&self, book_id: i32) -> AppResult<Vec<EditionView>> {
        let book = self.repository.books.get(book_id).await?;
        Ok(book.editors().iter().map(EditionView::from).collect())
    }

    /// Record an edition. An editor already present keeps its first edition.
    pub async fn add_editor(&self, book_id: i32, input: EditionInput) -> AppResult<Book> {
        let editor = self.repository.editors.get_by_id(input.editor_id).await?;

        self.mutate(book_id, move |book| {
            book.add_editor(editor, input.publication_date, input.isbn, input.collection);
        })
        .await
    }

    pub async fn set_editors(&self, book_id: i32, inputs: Vec<EditionInput>) -> AppResult<Book> {
        let projects = self.resolve_editions(&inputs).await?;
        self.mutate(book_id, move |book| {
            book.set_editors(projects);
        })
        .await
    }

    pub async fn list_reviews(&self, book_id: i32) -> AppResult<Vec<Review>> {
        if !self.repository.books.exists(book_id).await? {
            return Err(AppError::NotFound(format!("Book {} not found", book_id)));
        }
        self.repository.reviews.list_for_book(book_id).await
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Apply `change` to the book under a row lock and save it
    async fn mutate<F>(&self, id: i32, change: F) -> AppResult<Book>
    where
        F: FnOnce(&mut Book),
    {
        let mut tx = self.repository.pool.begin().await?;
        let mut book = self.repository.books.load(&mut tx, id, true).await?;

        change(&mut book);

        self.repository.books.update(&mut tx, &mut book).await?;
        tx.commit().await?;

        tracing::debug!(book_id = id, authors = book.authors().len(), editors = book.editors().len(), "book updated");
        self.repository.books.get(id).await
    }

    async fn resolve_serie(&self, reference: &NamedRef) -> AppResult<Serie> {
        match (reference.id, reference.name.as_deref()) {
            (Some(id), _) => self.repository.series.get_by_id(id).await,
            (None, Some(name)) if !name.trim().is_empty() => Ok(Serie::new(name.trim())),
            _ => Err(AppError::BadRequest(
                "A serie reference needs an id or a name".to_string(),
            )),
        }
    }

    async fn resolve_tags(&self, references: &[NamedRef]) -> AppResult<Vec<Tag>> {
        let mut tags = Vec::with_capacity(references.len());
        for reference in references {
            let tag = match (reference.id, reference.name.as_deref()) {
                (Some(id), _) => self.repository.tags.get_by_id(id).await?,
                (None, Some(name)) if !name.trim().is_empty() => Tag::new(name.trim()),
                _ => {
                    return Err(AppError::BadRequest(
                        "A tag reference needs an id or a name".to_string(),
                    ))
                }
            };
            tags.push(tag);
        }
        Ok(tags)
    }

    async fn resolve_authorships(&self, inputs: &[AuthorshipInput]) -> AppResult<Vec<ProjectBookCreation>> {
        let mut projects = Vec::with_capacity(inputs.len());
        for input in inputs {
            let author = self.repository.authors.get_by_id(input.author_id).await?;
            let job = self.repository.jobs.get_by_id(input.job_id).await?;
            projects.push(ProjectBookCreation::new(author, job));
        }
        Ok(projects)
    }

    async fn resolve_editions(&self, inputs: &[EditionInput]) -> AppResult<Vec<ProjectBookEdition>> {
        let mut projects = Vec::with_capacity(inputs.len());
        for input in inputs {
            let editor = self.repository.editors.get_by_id(input.editor_id).await?;
            projects.push(
                ProjectBookEdition::new(editor, input.publication_date)
                    .with_isbn(input.isbn.clone())
                    .with_collection(input.collection.clone()),
            );
        }
        Ok(projects)
    }
}

/// Resolved changes of an update request. Outer `None` leaves a field as is.
struct BookChanges {
    title: Option<String>,
    description: Option<Option<String>>,
    index_in_serie: Option<Option<i32>>,
    serie: Option<Option<Serie>>,
    tags: Option<Vec<Tag>>,
    authors: Option<Vec<ProjectBookCreation>>,
    editors: Option<Vec<ProjectBookEdition>>,
}

impl BookChanges {
    fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(description) = self.description {
            book.description = description;
        }
        if let Some(index) = self.index_in_serie {
            book.index_in_serie = index;
        }
        if let Some(serie) = self.serie {
            book.set_serie(serie);
        }
        if let Some(tags) = self.tags {
            book.set_tags(tags);
        }
        if let Some(authors) = self.authors {
            book.set_authors(authors);
        }
        if let Some(editors) = self.editors {
            book.set_editors(editors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unchanged() -> BookChanges {
        BookChanges {
            title: None,
            description: None,
            index_in_serie: None,
            serie: None,
            tags: None,
            authors: None,
            editors: None,
        }
    }

    fn sample() -> Book {
        let mut book = Book::new("Watchmen")
            .with_description("graphic novel")
            .with_index_in_serie(1);
        book.set_serie(Some(Serie::new("Watchmen").with_id(3)));
        book
    }

    #[test]
    fn test_absent_fields_are_kept() {
        let mut book = sample();
        unchanged().apply(&mut book);

        assert_eq!(book.title, "Watchmen");
        assert_eq!(book.description.as_deref(), Some("graphic novel"));
        assert_eq!(book.index_in_serie, Some(1));
        assert!(book.serie().is_some());
    }

    #[test]
    fn test_null_fields_are_cleared() {
        let mut book = sample();
        BookChanges {
            description: Some(None),
            index_in_serie: Some(None),
            serie: Some(None),
            ..unchanged()
        }
        .apply(&mut book);

        assert_eq!(book.title, "Watchmen");
        assert!(book.description.is_none());
        assert!(book.index_in_serie.is_none());
        assert!(book.serie().is_none());
    }

    #[test]
    fn test_values_replace_current_ones() {
        let mut book = sample();
        BookChanges {
            title: Some("V for Vendetta".to_string()),
            description: Some(Some("dystopia".to_string())),
            tags: Some(vec![Tag::new("comics"), Tag::new("comics")]),
            ..unchanged()
        }
        .apply(&mut book);

        assert_eq!(book.title, "V for Vendetta");
        assert_eq!(book.description.as_deref(), Some("dystopia"));
        assert_eq!(book.tags().len(), 1);
    }
}
