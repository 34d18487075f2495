//! Named routes and URL generation.
//!
//! Every path is declared once here. The router mounts handlers on these
//! constants and the landing menu resolves its links through `UrlGenerator`
//! reading the same constants.

use crate::error::{AppError, AppResult};

pub const API_PREFIX: &str = "/api/v1";

pub const HOME: &str = "/";
pub const DEMO_SIMPLE: &str = "/demo/simple";
pub const DEMO_HELLO: &str = "/demo/hello/:name";
pub const DEMO_HTTP_CALL: &str = "/demo/http-call";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

// Relative to API_PREFIX
pub const ENTRYPOINT: &str = "/";
pub const HEALTH: &str = "/health";
pub const READY: &str = "/ready";
pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_ME: &str = "/auth/me";
pub const BOOKS: &str = "/books";
pub const BOOK: &str = "/books/:id";
pub const BOOK_AUTHORS: &str = "/books/:id/authors";
pub const BOOK_EDITORS: &str = "/books/:id/editors";
pub const BOOK_REVIEWS: &str = "/books/:id/reviews";
pub const AUTHORS: &str = "/authors";
pub const AUTHOR: &str = "/authors/:id";
pub const EDITORS: &str = "/editors";
pub const EDITOR: &str = "/editors/:id";
pub const JOBS: &str = "/jobs";
pub const JOB: &str = "/jobs/:id";
pub const SERIES: &str = "/series";
pub const SERIE: &str = "/series/:id";
pub const SERIE_BOOKS: &str = "/series/:id/books";
pub const TAGS: &str = "/tags";
pub const TAG: &str = "/tags/:id";
pub const TAG_BOOKS: &str = "/tags/:id/books";
pub const REVIEWS: &str = "/reviews";
pub const REVIEW: &str = "/reviews/:id";

/// Route name and the path it is mounted on
#[derive(Debug, Clone, Copy)]
pub struct NamedRoute {
    pub name: &'static str,
    /// Prefix of the router the path is nested in, empty at the root
    pub prefix: &'static str,
    pub path: &'static str,
}

const fn root(name: &'static str, path: &'static str) -> NamedRoute {
    NamedRoute { name, prefix: "", path }
}

const fn api(name: &'static str, path: &'static str) -> NamedRoute {
    NamedRoute { name, prefix: API_PREFIX, path }
}

pub const ROUTES: &[NamedRoute] = &[
    root("home", HOME),
    root("simple", DEMO_SIMPLE),
    root("hello", DEMO_HELLO),
    root("http_call", DEMO_HTTP_CALL),
    root("api_doc", SWAGGER_UI),
    api("api_entrypoint", ENTRYPOINT),
    api("health", HEALTH),
    api("ready", READY),
    api("login", AUTH_LOGIN),
    api("login_check", AUTH_ME),
    api("books", BOOKS),
    api("book", BOOK),
    api("book_authors", BOOK_AUTHORS),
    api("book_editors", BOOK_EDITORS),
    api("book_reviews", BOOK_REVIEWS),
    api("authors", AUTHORS),
    api("author", AUTHOR),
    api("editors", EDITORS),
    api("editor", EDITOR),
    api("jobs", JOBS),
    api("job", JOB),
    api("series", SERIES),
    api("serie", SERIE),
    api("serie_books", SERIE_BOOKS),
    api("tags", TAGS),
    api("tag", TAG),
    api("tag_books", TAG_BOOKS),
    api("reviews", REVIEWS),
    api("review", REVIEW),
];

/// Resolves route names into URLs
#[derive(Debug, Clone)]
pub struct UrlGenerator {
    routes: &'static [NamedRoute],
}

impl UrlGenerator {
    pub fn new() -> Self {
        Self { routes: ROUTES }
    }

    /// Full path template for `name`, e.g. `/demo/hello/:name`
    pub fn template(&self, name: &str) -> Option<String> {
        self.routes
            .iter()
            .find(|r| r.name == name)
            .map(|r| format!("{}{}", r.prefix, r.path))
    }

    /// Build the URL of route `name`.
    ///
    /// Every `:param` segment must have a value in `params`; values that match
    /// no segment are appended as query parameters.
    pub fn generate(&self, name: &str, params: &[(&str, &str)]) -> AppResult<String> {
        let template = self
            .template(name)
            .ok_or_else(|| AppError::Internal(format!("Unknown route '{}'", name)))?;

        let mut used = Vec::with_capacity(params.len());
        let mut segments = Vec::new();
        for segment in template.split('/').skip(1) {
            match segment.strip_prefix(':') {
                Some(param) => {
                    let (key, value) = params
                        .iter()
                        .find(|(key, _)| *key == param)
                        .ok_or_else(|| {
                            AppError::Internal(format!(
                                "Missing parameter '{}' for route '{}'",
                                param, name
                            ))
                        })?;
                    used.push(*key);
                    segments.push(*value);
                }
                None => segments.push(segment),
            }
        }

        // Only used for its encoders; the host never appears in the result
        let mut url = reqwest::Url::parse("http://localhost")
            .map_err(|e| AppError::Internal(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Cannot build route path".to_string()))?
            .clear()
            .extend(segments.iter().filter(|s| !s.is_empty()));

        let extra: Vec<_> = params.iter().filter(|(k, _)| !used.contains(k)).collect();
        if !extra.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in extra {
                query.append_pair(key, value);
            }
        }

        Ok(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        })
    }
}

impl Default for UrlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_route() {
        let urls = UrlGenerator::new();
        assert_eq!(urls.generate("simple", &[]).unwrap(), "/demo/simple");
        assert_eq!(urls.generate("home", &[]).unwrap(), "/");
        assert_eq!(urls.generate("api_entrypoint", &[]).unwrap(), "/api/v1");
    }

    #[test]
    fn test_route_with_parameter() {
        let urls = UrlGenerator::new();
        assert_eq!(
            urls.generate("hello", &[("name", "world")]).unwrap(),
            "/demo/hello/world"
        );
        assert_eq!(
            urls.generate("hello", &[("name", "jane doe")]).unwrap(),
            "/demo/hello/jane%20doe"
        );
        assert_eq!(urls.generate("book", &[("id", "42")]).unwrap(), "/api/v1/books/42");
    }

    #[test]
    fn test_extra_parameters_become_query() {
        let urls = UrlGenerator::new();
        assert_eq!(
            urls.generate("books", &[("title", "Watch"), ("page", "2")]).unwrap(),
            "/api/v1/books?title=Watch&page=2"
        );
    }

    #[test]
    fn test_every_route_resolves() {
        let urls = UrlGenerator::new();
        for route in ROUTES {
            let url = urls.generate(route.name, &[("id", "1"), ("name", "x")]);
            assert!(url.is_ok(), "route {} does not resolve", route.name);
        }
        assert_eq!(urls.template("book_authors").as_deref(), Some("/api/v1/books/:id/authors"));
    }

    #[test]
    fn test_errors() {
        let urls = UrlGenerator::new();
        assert!(urls.generate("nope", &[]).is_err());
        assert!(urls.generate("hello", &[]).is_err());
    }
}
