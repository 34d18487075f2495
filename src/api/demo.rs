//! Small demo routes linked from the landing menu

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{error::AppResult, services::http_demo::HttpCallResult, AppState};

/// Plain text response
pub async fn simple() -> &'static str {
    "Simple controller"
}

/// Greet someone by name
pub async fn hello(Path(name): Path<String>) -> String {
    format!("Hello {}!", name)
}

/// Call a remote HTTP service and report what came back
pub async fn http_call(State(state): State<AppState>) -> AppResult<Json<HttpCallResult>> {
    let result = state.services.http_demo.call().await?;
    Ok(Json(result))
}
