//! Landing menu listing the demo routes

use axum::{extract::State, Json};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;

use crate::{config::DemoConfig, error::AppResult, AppState};

use super::routes::UrlGenerator;

const DEV_SERVER_MARKER: &str = "Development Server";

const TLS_NOTE: &str = "You need to set demo.ca_info and demo.ca_file to the path of a PEM bundle. \
     If you need one, download it from https://curl.se/docs/caextract.html";

const DEV_SERVER_NOTE: &str = "You are using a development server, api indexes for json or html \
     may not work and return a 404 Not Found";

/// A menu link, with an optional note when the environment limits it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MenuEntry {
    Url(String),
    Annotated { uri: String, note: String },
}

impl MenuEntry {
    fn annotate(self, note: &str) -> Self {
        let uri = match self {
            MenuEntry::Url(uri) | MenuEntry::Annotated { uri, .. } => uri,
        };
        MenuEntry::Annotated {
            uri,
            note: note.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    /// Label -> URL, in display order
    pub routes: IndexMap<String, MenuEntry>,
    pub is_dev_server: bool,
}

/// Facts about the running environment that change how routes are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentProbes {
    pub is_dev_server: bool,
    pub has_tls_certificates: bool,
}

impl From<&DemoConfig> for EnvironmentProbes {
    fn from(config: &DemoConfig) -> Self {
        let configured = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        Self {
            is_dev_server: config
                .server_software
                .as_deref()
                .is_some_and(|software| software.contains(DEV_SERVER_MARKER)),
            has_tls_certificates: configured(&config.ca_info) && configured(&config.ca_file),
        }
    }
}

/// Build the ordered menu for the given environment
pub fn build_menu(
    urls: &UrlGenerator,
    probes: EnvironmentProbes,
) -> AppResult<IndexMap<String, MenuEntry>> {
    let link = |name: &str, params: &[(&str, &str)]| -> AppResult<MenuEntry> {
        Ok(MenuEntry::Url(urls.generate(name, params)?))
    };

    let mut routes = IndexMap::new();
    routes.insert("Simple controller".to_string(), link("simple", &[])?);
    routes.insert("Hello controller".to_string(), link("hello", &[("name", "world")])?);
    routes.insert("HTTP client demo".to_string(), link("http_call", &[])?);
    routes.insert("Login".to_string(), link("login", &[])?);
    routes.insert("User login check for js app".to_string(), link("login_check", &[])?);
    routes.insert("Api: rest".to_string(), link("api_entrypoint", &[])?);
    routes.insert("Api: openapi documentation".to_string(), link("api_doc", &[])?);
    routes.insert("Health".to_string(), link("health", &[])?);

    if !probes.has_tls_certificates {
        annotate(&mut routes, "HTTP client demo", TLS_NOTE);
    }

    if probes.is_dev_server {
        annotate(&mut routes, "Api: rest", DEV_SERVER_NOTE);
        annotate(&mut routes, "Api: openapi documentation", DEV_SERVER_NOTE);
    }

    Ok(routes)
}

fn annotate(routes: &mut IndexMap<String, MenuEntry>, label: &str, note: &str) {
    if let Some(entry) = routes.get_mut(label) {
        *entry = entry.clone().annotate(note);
    }
}

/// Landing page: available routes
pub async fn index(State(state): State<AppState>) -> AppResult<Json<MenuResponse>> {
    let probes = EnvironmentProbes::from(&state.config.demo);
    let routes = build_menu(&UrlGenerator::new(), probes)?;

    Ok(Json(MenuResponse {
        routes,
        is_dev_server: probes.is_dev_server,
    }))
}

/// REST entrypoint: collection name -> URL
#[utoipa::path(
    get,
    path = "/",
    tag = "entrypoint",
    responses(
        (status = 200, description = "Collections exposed by the API", body = HashMap<String, String>)
    )
)]
pub async fn api_entrypoint() -> AppResult<Json<IndexMap<String, String>>> {
    let urls = UrlGenerator::new();

    let mut collections = IndexMap::new();
    for name in ENTRYPOINT_COLLECTIONS {
        collections.insert(name.to_string(), urls.generate(name, &[])?);
    }
    Ok(Json(collections))
}

const ENTRYPOINT_COLLECTIONS: &[&str] =
    &["books", "authors", "editors", "jobs", "series", "tags", "reviews"];

#[cfg(test)]
mod tests {
    use super::*;

    fn probes(is_dev_server: bool, has_tls_certificates: bool) -> EnvironmentProbes {
        EnvironmentProbes {
            is_dev_server,
            has_tls_certificates,
        }
    }

    #[test]
    fn test_plain_menu() {
        let menu = build_menu(&UrlGenerator::new(), probes(false, true)).unwrap();

        let labels: Vec<_> = menu.keys().map(String::as_str).collect();
        assert_eq!(
            labels,
            vec![
                "Simple controller",
                "Hello controller",
                "HTTP client demo",
                "Login",
                "User login check for js app",
                "Api: rest",
                "Api: openapi documentation",
                "Health",
            ]
        );
        assert!(menu.values().all(|e| matches!(e, MenuEntry::Url(_))));
        assert_eq!(
            menu["Hello controller"],
            MenuEntry::Url("/demo/hello/world".to_string())
        );
    }

    #[test]
    fn test_missing_certificates_annotate_http_demo() {
        let menu = build_menu(&UrlGenerator::new(), probes(false, false)).unwrap();

        match &menu["HTTP client demo"] {
            MenuEntry::Annotated { uri, note } => {
                assert_eq!(uri, "/demo/http-call");
                assert!(note.contains("ca_info"));
            }
            other => panic!("unexpected entry: {other:?}"),
        }
        assert_eq!(menu.len(), 8);
        assert!(matches!(menu["Api: rest"], MenuEntry::Url(_)));
    }

    #[test]
    fn test_dev_server_annotates_api_entries() {
        let menu = build_menu(&UrlGenerator::new(), probes(true, true)).unwrap();

        for label in ["Api: rest", "Api: openapi documentation"] {
            match &menu[label] {
                MenuEntry::Annotated { note, .. } => assert!(note.contains("404")),
                other => panic!("unexpected entry for {label}: {other:?}"),
            }
        }
        assert!(matches!(menu["HTTP client demo"], MenuEntry::Url(_)));
    }

    #[test]
    fn test_entry_serialization() {
        let plain = serde_json::to_value(MenuEntry::Url("/a".to_string())).unwrap();
        assert_eq!(plain, serde_json::json!("/a"));

        let annotated = serde_json::to_value(MenuEntry::Annotated {
            uri: "/a".to_string(),
            note: "n".to_string(),
        })
        .unwrap();
        assert_eq!(annotated, serde_json::json!({"uri": "/a", "note": "n"}));
    }

    #[test]
    fn test_probes_from_config() {
        let mut config = DemoConfig::default();
        assert_eq!(EnvironmentProbes::from(&config), probes(false, false));

        config.server_software = Some("Builtin Development Server 1.0".to_string());
        config.ca_info = Some("/etc/ssl/cacert.pem".to_string());
        assert_eq!(EnvironmentProbes::from(&config), probes(true, false));

        config.ca_file = Some("/etc/ssl/cacert.pem".to_string());
        config.server_software = Some("nginx".to_string());
        assert_eq!(EnvironmentProbes::from(&config), probes(false, true));
    }
}
