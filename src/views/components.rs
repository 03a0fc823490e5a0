use maud::{html, Markup};

use crate::authoring::FieldErrors;

/// htmx navigation link with href fallback + hx-get for in-page swap.
pub fn nav_link(href: &str, body: Markup) -> Markup {
    html! {
        a href=(href)
          hx-get=(href)
          hx-target="main"
          hx-push-url="true"
          hx-swap="innerHTML" {
            (body)
        }
    }
}

/// Inline message under an invalid form field.
pub fn field_error(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @if let Some(message) = errors.get(field) {
            small."field-error" { (message) }
        }
    }
}

/// Generic failure banner for storage/API errors.
pub fn error_banner(message: &str) -> Markup {
    html! {
        article."error-banner" { (message) }
    }
}
