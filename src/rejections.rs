use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use maud::html;

use crate::{names, views};

/// Handler-level failures. `Unauthorized` sends the browser to the login
/// screen instead of rendering an error page.
#[derive(Debug)]
pub enum AppError {
    Internal(&'static str),
    Input(&'static str),
    NotFound,
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match self {
            AppError::Unauthorized => return Redirect::to(names::LOGIN_URL).into_response(),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::Input(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound => (StatusCode::NOT_FOUND, "page not found"),
        };

        let page = views::page(
            "Error",
            html! {
                article {
                    h1 { "Something went wrong" }
                    p { (message) }
                    a href=(names::ACTIVITIES_URL) { "Back to activities" }
                }
            },
        );
        (code, page).into_response()
    }
}

/// Adapt service/db `Result`s at handler call sites: log the cause, keep a
/// static message for the page.
pub trait ResultExt<T> {
    fn reject(self, message: &'static str) -> Result<T, AppError>;
    fn reject_input(self, message: &'static str) -> Result<T, AppError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e}");
            AppError::Internal(message)
        })
    }

    fn reject_input(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::warn!("{message}: {e}");
            AppError::Input(message)
        })
    }
}

/// `Option` counterpart for lookups that should 404.
pub trait OptionExt<T> {
    fn or_not_found(self) -> Result<T, AppError>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_not_found(self) -> Result<T, AppError> {
        self.ok_or(AppError::NotFound)
    }
}
