//! Books repository.
//!
//! Persists the `Book` aggregate: the book row, its authorship and edition
//! records (owned, saved and removed with the book), and the links to the
//! shared serie and tags (saved with the book, never removed with it).
//! Methods taking a `PgConnection` are meant to run inside the caller's
//! transaction.

use sqlx::{PgConnection, Pool, Postgres, QueryBuilder, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookQuery, BookShort, BookSort, SortDirection},
        editor::Editor,
        job::Job,
        project::{ProjectBookCreation, ProjectBookEdition},
        review::Review,
        serie::Serie,
        tag::Tag,
    },
};

pub const MAX_PER_PAGE: i64 = 100;

/// Escape `%`, `_` and `\` so user input is matched literally by LIKE
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Resolve `(page, per_page, offset)` for a search. `per_page` is clamped,
/// a page whose offset does not fit in an i64 is rejected.
pub fn page_bounds(query: &BookQuery) -> AppResult<(i64, i64, i64)> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, MAX_PER_PAGE);
    let offset = (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| AppError::BadRequest(format!("Page {} is out of range", page)))?;
    Ok((page, per_page, offset))
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    builder.push(" WHERE 1=1");

    if let Some(id) = query.id {
        builder.push(" AND b.id = ").push_bind(id);
    }

    if let Some(ref title) = query.title {
        builder
            .push(" AND LOWER(b.title) LIKE ")
            .push_bind(format!("{}%", escape_like(&title.to_lowercase())));
    }

    if let Some(ref description) = query.description {
        builder
            .push(" AND b.description ILIKE ")
            .push_bind(format!("%{}%", escape_like(description)));
    }

    if let Some(ref tag) = query.tag {
        builder
            .push(
                " AND EXISTS (SELECT 1 FROM book_tags bt JOIN tags t ON t.id = bt.tag_id \
                 WHERE bt.book_id = b.id AND t.name = ",
            )
            .push_bind(tag.clone())
            .push(")");
    }
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Search books with pagination
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookShort>, i64)> {
        let (_, per_page, offset) = page_bounds(query)?;

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books b");
        push_filters(&mut count, query);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT b.id, b.title, b.description, b.index_in_serie, b.serie_id FROM books b",
        );
        push_filters(&mut select, query);

        let column = match query.sort.unwrap_or(BookSort::Id) {
            BookSort::Id => "b.id",
            BookSort::Title => "b.title",
        };
        let direction = match query.direction.unwrap_or(SortDirection::Asc) {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        };
        select
            .push(format!(" ORDER BY {} {}", column, direction))
            .push(" LIMIT ")
            .push_bind(per_page)
            .push(" OFFSET ")
            .push_bind(offset);

        let books = select
            .build_query_as::<BookShort>()
            .fetch_all(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Books of a serie, in reading order
    pub async fn list_by_serie(&self, serie_id: i32) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT id, title, description, index_in_serie, serie_id
            FROM books
            WHERE serie_id = $1
            ORDER BY index_in_serie NULLS LAST, title
            "#,
        )
        .bind(serie_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_tag(&self, tag_id: i32) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT b.id, b.title, b.description, b.index_in_serie, b.serie_id
            FROM books b
            JOIN book_tags bt ON bt.book_id = b.id
            WHERE bt.tag_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // =========================================================================
    // READ
    // =========================================================================

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Load a full aggregate outside of any transaction
    pub async fn get(&self, id: i32) -> AppResult<Book> {
        let mut conn = self.pool.acquire().await?;
        self.load(&mut conn, id, false).await
    }

    /// Load a full aggregate. With `for_update`, the book row stays locked
    /// until the surrounding transaction ends.
    pub async fn load(&self, conn: &mut PgConnection, id: i32, for_update: bool) -> AppResult<Book> {
        let query = if for_update {
            "SELECT id, title, description, index_in_serie, serie_id FROM books WHERE id = $1 FOR UPDATE"
        } else {
            "SELECT id, title, description, index_in_serie, serie_id FROM books WHERE id = $1"
        };

        let row = sqlx::query_as::<_, BookShort>(query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        let mut book = Book::new(row.title);
        book.description = row.description;
        book.index_in_serie = row.index_in_serie;
        book.assign_id(row.id);

        if let Some(serie_id) = row.serie_id {
            let serie = sqlx::query_as::<_, Serie>("SELECT id, name FROM series WHERE id = $1")
                .bind(serie_id)
                .fetch_optional(&mut *conn)
                .await?;
            book.set_serie(serie);
        }

        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name
            FROM book_tags bt
            JOIN tags t ON t.id = bt.tag_id
            WHERE bt.book_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
        book.set_tags(tags);

        let authors = self.load_authors(&mut *conn, id).await?;
        book.set_authors(authors);

        let editors = self.load_editors(&mut *conn, id).await?;
        book.set_editors(editors);

        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, book_id, rating, body, author, publication_date
            FROM reviews
            WHERE book_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;
        for review in reviews {
            book.add_review(review);
        }

        Ok(book)
    }

    async fn load_authors(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<Vec<ProjectBookCreation>> {
        let rows = sqlx::query(
            r#"
            SELECT ba.id, a.id AS author_id, a.firstname, a.lastname,
                   j.id AS job_id, j.translation_key
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            JOIN jobs j ON j.id = ba.job_id
            WHERE ba.book_id = $1
            ORDER BY ba.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .iter()
            .map(|r| {
                let author = Author {
                    id: Some(r.get("author_id")),
                    firstname: r.get("firstname"),
                    lastname: r.get("lastname"),
                };
                let job = Job {
                    id: Some(r.get("job_id")),
                    translation_key: r.get("translation_key"),
                };
                ProjectBookCreation::new(author, job).with_id(r.get("id"))
            })
            .collect())
    }

    async fn load_editors(&self, conn: &mut PgConnection, book_id: i32) -> AppResult<Vec<ProjectBookEdition>> {
        let rows = sqlx::query(
            r#"
            SELECT be.id, be.publication_date, be.isbn, be.collection,
                   e.id AS editor_id, e.name
            FROM book_editions be
            JOIN editors e ON e.id = be.editor_id
            WHERE be.book_id = $1
            ORDER BY be.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows
            .iter()
            .map(|r| {
                let editor = Editor {
                    id: Some(r.get("editor_id")),
                    name: r.get("name"),
                };
                ProjectBookEdition::new(editor, r.get("publication_date"))
                    .with_isbn(r.get("isbn"))
                    .with_collection(r.get("collection"))
                    .with_id(r.get("id"))
            })
            .collect())
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a new book with its records. Assigns the book id.
    pub async fn insert(&self, conn: &mut PgConnection, book: &mut Book) -> AppResult<i32> {
        self.persist_shared(&mut *conn, book).await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, description, index_in_serie, serie_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.index_in_serie)
        .bind(book.serie().and_then(|s| s.id))
        .fetch_one(&mut *conn)
        .await?;

        book.assign_id(id);
        self.save_relations(&mut *conn, book).await?;

        tracing::info!(book_id = id, book = %book, "book created");
        Ok(id)
    }

    /// Write back an already persisted aggregate
    pub async fn update(&self, conn: &mut PgConnection, book: &mut Book) -> AppResult<()> {
        let id = book
            .id()
            .ok_or_else(|| AppError::Internal("Cannot update a book that was never saved".to_string()))?;

        self.persist_shared(&mut *conn, book).await?;

        let result = sqlx::query(
            r#"
            UPDATE books
            SET title = $2, description = $3, index_in_serie = $4, serie_id = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.index_in_serie)
        .bind(book.serie().and_then(|s| s.id))
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        self.save_relations(&mut *conn, book).await
    }

    /// Delete a book. Authorship, edition, tag links and reviews go with it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!(book_id = id, "book deleted");
        Ok(())
    }

    /// Save a not yet persisted serie or tag referenced by the book
    async fn persist_shared(&self, conn: &mut PgConnection, book: &mut Book) -> AppResult<()> {
        if let Some(serie) = book.serie().filter(|s| s.id.is_none()).cloned() {
            let saved = sqlx::query_as::<_, Serie>("INSERT INTO series (name) VALUES ($1) RETURNING id, name")
                .bind(&serie.name)
                .fetch_one(&mut *conn)
                .await?;
            book.set_serie(Some(saved));
        }

        if book.tags().iter().any(|t| t.id.is_none()) {
            let mut tags = Vec::with_capacity(book.tags().len());
            for tag in book.tags() {
                if tag.id.is_some() {
                    tags.push(tag.clone());
                    continue;
                }
                let saved = sqlx::query_as::<_, Tag>(
                    r#"
                    INSERT INTO tags (name) VALUES ($1)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id, name
                    "#,
                )
                .bind(&tag.name)
                .fetch_one(&mut *conn)
                .await?;
                tags.push(saved);
            }
            book.set_tags(tags);
        }

        Ok(())
    }

    /// Bring the record tables in line with the aggregate: rows no longer in
    /// the aggregate are removed, records without an id are inserted.
    async fn save_relations(&self, conn: &mut PgConnection, book: &Book) -> AppResult<()> {
        let book_id = book
            .id()
            .ok_or_else(|| AppError::Internal("Book must be saved before its records".to_string()))?;

        let kept: Vec<i32> = book.authors().iter().filter_map(|p| p.id()).collect();
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1 AND NOT (id = ANY($2))")
            .bind(book_id)
            .bind(&kept)
            .execute(&mut *conn)
            .await?;

        for project in book.authors().iter().filter(|p| p.id().is_none()) {
            let author_id = project.author().id.ok_or_else(|| {
                AppError::Validation(format!("Author '{}' must be saved first", project.author()))
            })?;
            let job_id = project.role().id.ok_or_else(|| {
                AppError::Validation(format!("Job '{}' must be saved first", project.role()))
            })?;
            sqlx::query("INSERT INTO book_authors (book_id, author_id, job_id) VALUES ($1, $2, $3)")
                .bind(book_id)
                .bind(author_id)
                .bind(job_id)
                .execute(&mut *conn)
                .await?;
        }

        let kept: Vec<i32> = book.editors().iter().filter_map(|p| p.id()).collect();
        sqlx::query("DELETE FROM book_editions WHERE book_id = $1 AND NOT (id = ANY($2))")
            .bind(book_id)
            .bind(&kept)
            .execute(&mut *conn)
            .await?;

        for project in book.editors().iter().filter(|p| p.id().is_none()) {
            let editor_id = project.editor().id.ok_or_else(|| {
                AppError::Validation(format!("Editor '{}' must be saved first", project.editor()))
            })?;
            sqlx::query(
                r#"
                INSERT INTO book_editions (book_id, editor_id, publication_date, isbn, collection)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(book_id)
            .bind(editor_id)
            .bind(project.publication_date())
            .bind(project.isbn())
            .bind(project.collection())
            .execute(&mut *conn)
            .await?;
        }

        let tag_ids: Vec<i32> = book.tags().iter().filter_map(|t| t.id).collect();
        sqlx::query("DELETE FROM book_tags WHERE book_id = $1 AND NOT (tag_id = ANY($2))")
            .bind(book_id)
            .bind(&tag_ids)
            .execute(&mut *conn)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO book_tags (book_id, tag_id)
            SELECT $1, UNNEST($2::int[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(&tag_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Watchmen"), "Watchmen");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
    }

    #[test]
    fn test_page_bounds() {
        let defaults = BookQuery::default();
        assert_eq!(page_bounds(&defaults).unwrap(), (1, 20, 0));

        let query = BookQuery {
            page: Some(3),
            per_page: Some(500),
            ..Default::default()
        };
        assert_eq!(page_bounds(&query).unwrap(), (3, MAX_PER_PAGE, 200));

        let query = BookQuery {
            page: Some(-4),
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(page_bounds(&query).unwrap(), (1, 1, 0));
    }

    #[test]
    fn test_page_bounds_overflow() {
        let query = BookQuery {
            page: Some(i64::MAX),
            ..Default::default()
        };
        assert!(matches!(page_bounds(&query), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_filters_sql() {
        let query = BookQuery {
            title: Some("Wat".to_string()),
            tag: Some("comics".to_string()),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books b");
        push_filters(&mut builder, &query);
        let sql = builder.sql();
        assert!(sql.contains("LOWER(b.title) LIKE $1"));
        assert!(sql.contains("t.name = $2"));
        assert!(!sql.contains("b.description"));
    }
}
