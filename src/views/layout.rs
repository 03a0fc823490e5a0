use maud::{html, Markup, DOCTYPE};

use crate::{names, utils};

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
        link rel="stylesheet" href="/static/index.css";
    }
}

fn js() -> Markup {
    html! {
        script src="https://unpkg.com/htmx.org@1.9.12" {}
        script src="https://unpkg.com/htmx.org@1.9.12/dist/ext/json-enc.js" {}
    }
}

fn header(user: Option<&str>) -> Markup {
    html! {
        header {
            nav {
                ul {
                    li."secondary" {
                        a href=(names::ACTIVITIES_URL) {
                            strong { "Ludoteca" }
                        }
                    }
                }
                ul {
                    @if let Some(name) = user {
                        li { a href=(names::ACCOUNT_URL) { (name) } }
                    }
                    li."secondary" { (utils::VERSION) }
                }
            }
        }
    }
}

fn main(body: Markup) -> Markup {
    html! {
        main { (body) }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    page_with_user(title, body, None)
}

pub fn page_with_user(title: &str, body: Markup, user: Option<&str>) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            (css())
            (js())

            title { (format!("{title} - Ludoteca")) }
        }

        body."container" {
            (header(user))
            (main(body))
        }
    }
}

pub fn titled(title: &str, body: Markup) -> Markup {
    html! {
        title { (title) " - Ludoteca" }
        (body)
    }
}

/// Full page on a plain navigation, titled fragment on an htmx swap.
pub fn render(is_htmx: bool, title: &str, body: Markup, user: Option<&str>) -> Markup {
    if is_htmx {
        titled(title, body)
    } else {
        page_with_user(title, body, user)
    }
}
