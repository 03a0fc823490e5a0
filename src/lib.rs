pub mod authoring;
pub mod db;
pub mod email;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod play;
pub mod rejections;
pub mod services;
pub mod statics;
pub mod utils;
pub mod views;

use axum::{middleware, Router};

use email::ResendEmailSender;
use play::PlayStore;
use services::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub auth: AuthService<db::Db, ResendEmailSender>,
    pub plays: PlayStore,
    pub secure_cookies: bool,
    pub base_url: String,
}

impl AppState {
    pub fn new(db: db::Db, resend_api_key: Option<String>, base_url: String, secure_cookies: bool) -> Self {
        let auth = AuthService::new(
            db.clone(),
            ResendEmailSender::new(resend_api_key),
            base_url.clone(),
        );
        AppState {
            db,
            auth,
            plays: PlayStore::new(),
            secure_cookies,
            base_url,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::account::routes())
        .merge(handlers::activity::routes())
        .merge(handlers::play::routes())
        .merge(handlers::sharing::routes())
        .layer(middleware::from_fn(csrf_check))
        .merge(statics::routes())
        .with_state(state)
}

async fn csrf_check(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;

    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
