use maud::{html, Markup};

use crate::db::models::{ActivitySummary, AuthUser};
use crate::models::{Activity, ActivityType};
use crate::names;

use super::components::nav_link;

/// Normalized list filters, already clamped by the handler.
pub struct ListQuery<'a> {
    pub category: Option<&'a str>,
    pub ty: Option<&'a str>,
    pub page: usize,
    pub total_pages: usize,
}

fn list_href(category: Option<&str>, ty: Option<&str>, page: usize) -> String {
    let mut href = format!("{}?page={page}", names::ACTIVITIES_URL);
    if let Some(category) = category {
        href.push_str(&format!("&category={category}"));
    }
    if let Some(ty) = ty {
        href.push_str(&format!("&type={ty}"));
    }
    href
}

fn type_label(ty: &str) -> &str {
    ty.parse::<ActivityType>()
        .map(ActivityType::label)
        .unwrap_or("Unknown")
}

pub fn list_page(
    items: &[ActivitySummary],
    categories: &[String],
    query: &ListQuery<'_>,
) -> Markup {
    html! {
        nav {
            ul { li { h1 { "Activities" } } }
            ul {
                li {
                    (nav_link(&names::new_activity_url("quiz"), html! { button { "New activity" } }))
                }
            }
        }

        (filters(categories, query))

        @if items.is_empty() {
            article { p { "No activities match these filters yet." } }
        } @else {
            div."card-grid" {
                @for item in items {
                    (card(item))
                }
            }
        }

        (pagination(query))
    }
}

fn filters(categories: &[String], query: &ListQuery<'_>) -> Markup {
    html! {
        form hx-get=(names::ACTIVITIES_URL)
             hx-target="main"
             hx-push-url="true"
             hx-swap="innerHTML"
             hx-trigger="change" {
            div."grid" {
                select name="category" aria-label="Category" {
                    option value="" { "All categories" }
                    @for category in categories {
                        option value=(category) selected[query.category == Some(category.as_str())] {
                            (category)
                        }
                    }
                }
                select name="type" aria-label="Type" {
                    option value="" { "All types" }
                    @for ty in ActivityType::ALL {
                        option value=(ty.as_str()) selected[query.ty == Some(ty.as_str())] {
                            (ty.label())
                        }
                    }
                }
            }
        }
    }
}

fn card(item: &ActivitySummary) -> Markup {
    html! {
        article."activity-card" {
            @if let Some(cover) = &item.cover_image {
                img src=(cover) alt="";
            }
            header {
                (nav_link(&names::activity_url(item.id), html! { strong { (item.title) } }))
            }
            p { (item.description) }
            footer {
                small { (item.category) " · " (type_label(&item.activity_type)) }
            }
        }
    }
}

fn pagination(query: &ListQuery<'_>) -> Markup {
    if query.total_pages <= 1 {
        return html! {};
    }
    html! {
        nav."pagination" {
            ul {
                @if query.page > 1 {
                    li {
                        (nav_link(
                            &list_href(query.category, query.ty, query.page - 1),
                            html! { "Previous" },
                        ))
                    }
                }
                li { small { "Page " (query.page) " of " (query.total_pages) } }
                @if query.page < query.total_pages {
                    li {
                        (nav_link(
                            &list_href(query.category, query.ty, query.page + 1),
                            html! { "Next" },
                        ))
                    }
                }
            }
        }
    }
}

/// Detail screen: metadata plus the entry point into a run. A quiz asks for
/// its presentation mode first; every other type starts directly.
pub fn detail_page(activity: &Activity, user: Option<&AuthUser>, owned: bool) -> Markup {
    html! {
        article {
            @if let Some(cover) = &activity.cover_image {
                img src=(cover) alt="";
            }
            h1 { (activity.title) }
            p { (activity.description) }
            p {
                small { (activity.category) " · " (activity.ty.label()) }
            }

            @if activity.content.item_count() == 0 {
                p { "This activity has no content yet." }
            } @else if activity.ty == ActivityType::Quiz {
                (quiz_mode_picker(activity.id))
            } @else {
                form hx-post=(names::start_play_url(activity.id))
                     hx-target="main"
                     hx-push-url="true"
                     hx-swap="innerHTML" {
                    button type="submit" { "Play" }
                }
            }

            @if user.is_some() {
                (share_section(activity.id))
            }

            @if owned {
                footer."grid" {
                    (nav_link(
                        &names::edit_activity_url(activity.id),
                        html! { button class="outline" { "Edit" } },
                    ))
                    form hx-post=(names::delete_activity_url(activity.id))
                         hx-target="main"
                         hx-swap="innerHTML"
                         hx-confirm="Delete this activity?" {
                        button type="submit" class="secondary" { "Delete" }
                    }
                }
            }
        }
    }
}

fn quiz_mode_picker(id: i64) -> Markup {
    html! {
        div."grid" {
            form hx-post=(format!("{}?mode=all", names::start_play_url(id)))
                 hx-target="main"
                 hx-push-url="true"
                 hx-swap="innerHTML" {
                button type="submit" { "All questions at once" }
            }
            form hx-post=(format!("{}?mode=interactive", names::start_play_url(id)))
                 hx-target="main"
                 hx-push-url="true"
                 hx-swap="innerHTML" {
                button type="submit" class="secondary" { "One question at a time" }
            }
        }
    }
}

fn share_section(id: i64) -> Markup {
    html! {
        details {
            summary { "Share" }
            form hx-post=(names::share_activity_url(id))
                 hx-target="this"
                 hx-swap="outerHTML" {
                button type="submit" class="outline" { "Create one-time link" }
            }
        }
    }
}

/// Shown when a stored content document does not fit its declared type.
pub fn unsupported_page() -> Markup {
    html! {
        article {
            h1 { "Unsupported activity" }
            p { "This activity's content cannot be played. It may have been created with an incompatible version." }
            (nav_link(names::ACTIVITIES_URL, html! { "Back to activities" }))
        }
    }
}

/// Replaces the share form once a link was minted.
pub fn share_link_created(base_url: &str, token: &str) -> Markup {
    let link = format!("{base_url}{}?token={token}", names::PUBLIC_ACTIVITY_URL);
    html! {
        article {
            p { "One-time link (valid for a single visit):" }
            code { (link) }
        }
    }
}
