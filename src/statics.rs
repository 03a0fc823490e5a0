use axum::{
    extract::Path,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use include_dir::{include_dir, Dir};

use crate::{names, AppState};

static STATIC_DIR: Dir = include_dir!("static");
const STATIC_CACHE_CONTROL: &str = "max-age=3600, must-revalidate";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/static/{*path}", get(send_file))
        .route("/uploads/{*path}", get(send_upload))
}

async fn send_file(Path(path): Path<String>) -> Response {
    let Some(file) = STATIC_DIR.get_file(&path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = match file.path().extension() {
        Some(ext) if ext == "css" => "text/css",
        Some(ext) if ext == "svg" => "image/svg+xml",
        Some(ext) if ext == "js" => "text/javascript",
        _ => "application/octet-stream",
    };

    (
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, STATIC_CACHE_CONTROL),
        ],
        file.contents(),
    )
        .into_response()
}

/// Cover images live on disk, not in the binary. Only plain file names are
/// served; anything with a path separator 404s.
async fn send_upload(Path(path): Path<String>) -> Response {
    if path.contains('/') || path.contains("..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let Ok(contents) = tokio::fs::read(format!("{}/{path}", names::UPLOADS_DIR)).await else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = match path.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };

    (
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, STATIC_CACHE_CONTROL),
        ],
        contents,
    )
        .into_response()
}
