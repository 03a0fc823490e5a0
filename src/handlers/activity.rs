use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use ulid::Ulid;

use crate::{
    authoring::{self, FieldErrors},
    extractors::{AuthGuard, IsHtmx, MaybeUser},
    models::ActivityType,
    names,
    rejections::{AppError, OptionExt, ResultExt},
    views, AppState,
};

use crate::views::activity as activity_views;
use crate::views::authoring as authoring_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities", get(list))
        .route("/activities/new/{ty}", get(new_form))
        .route("/activities/create/{ty}", post(create_post))
        .route("/activities/{id}", get(detail))
        .route("/activities/{id}/edit", get(edit_form))
        .route("/activities/{id}/update", post(update_post))
        .route("/activities/{id}/delete", post(delete_post))
}

#[derive(Deserialize)]
struct ListParams {
    category: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    page: Option<usize>,
}

async fn list(
    AuthGuard(user): AuthGuard,
    IsHtmx(is_htmx): IsHtmx,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<maud::Markup, AppError> {
    let summaries = state
        .db
        .activity_summaries()
        .await
        .reject("could not load activities")?;
    let categories = state
        .db
        .activity_categories()
        .await
        .reject("could not load categories")?;

    let category = params.category.as_deref().filter(|c| !c.is_empty());
    let ty = params.ty.as_deref().filter(|t| !t.is_empty());

    let filtered: Vec<_> = summaries
        .into_iter()
        .filter(|s| category.is_none_or(|c| s.category == c))
        .filter(|s| ty.is_none_or(|t| s.activity_type == t))
        .collect();

    let total_pages = filtered.len().div_ceil(names::PAGE_SIZE).max(1);
    let page = params.page.unwrap_or(1).clamp(1, total_pages);
    let items: Vec<_> = filtered
        .into_iter()
        .skip((page - 1) * names::PAGE_SIZE)
        .take(names::PAGE_SIZE)
        .collect();

    let query = activity_views::ListQuery {
        category,
        ty,
        page,
        total_pages,
    };

    Ok(views::render(
        is_htmx,
        "Activities",
        activity_views::list_page(&items, &categories, &query),
        Some(&user.name),
    ))
}

async fn detail(
    MaybeUser(user): MaybeUser,
    IsHtmx(is_htmx): IsHtmx,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::response::Response, AppError> {
    let row = state
        .db
        .get_activity(id)
        .await
        .reject("could not load activity")?
        .or_not_found()?;

    let user_name = user.as_ref().map(|u| u.name.as_str());
    let activity = match row.decode() {
        Ok(activity) => activity,
        Err(e) => {
            tracing::warn!("activity {id} cannot be played: {e}");
            return Ok(views::render(
                is_htmx,
                "Unsupported activity",
                activity_views::unsupported_page(),
                user_name,
            )
            .into_response());
        }
    };

    let owned = user.as_ref().is_some_and(|u| u.id == row.user_id);
    Ok(views::render(
        is_htmx,
        &activity.title,
        activity_views::detail_page(&activity, user.as_ref(), owned),
        user_name,
    )
    .into_response())
}

async fn new_form(
    AuthGuard(user): AuthGuard,
    IsHtmx(is_htmx): IsHtmx,
    Path(ty): Path<String>,
) -> Result<maud::Markup, AppError> {
    let ty: ActivityType = ty.parse().reject_input("unknown activity type")?;
    Ok(views::render(
        is_htmx,
        "New activity",
        authoring_views::create_page(
            ty,
            &authoring_views::FormValues::default(),
            &FieldErrors::default(),
            None,
        ),
        Some(&user.name),
    ))
}

async fn create_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(ty): Path<String>,
    multipart: Multipart,
) -> Result<axum::response::Response, AppError> {
    let ty: ActivityType = ty.parse().reject_input("unknown activity type")?;
    let (form, cover_image) = collect_form(multipart).await?;

    let draft = match authoring::build_draft(ty, &form) {
        Ok(draft) => draft,
        Err(errors) => {
            let values = authoring_views::submitted_values(&form);
            return Ok(views::titled(
                "New activity",
                authoring_views::create_page(ty, &values, &errors, None),
            )
            .into_response());
        }
    };

    match state
        .db
        .create_activity(user.id, ty.as_str(), &draft, cover_image.as_deref())
        .await
    {
        Ok(id) => Ok(views::titled(
            "Activity created",
            authoring_views::created_page(&draft.title, id),
        )
        .into_response()),
        Err(e) => {
            tracing::error!("could not create activity: {e}");
            let values = authoring_views::submitted_values(&form);
            Ok(views::titled(
                "New activity",
                authoring_views::create_page(
                    ty,
                    &values,
                    &FieldErrors::default(),
                    Some("Could not save the activity, try again later."),
                ),
            )
            .into_response())
        }
    }
}

async fn edit_form(
    AuthGuard(user): AuthGuard,
    IsHtmx(is_htmx): IsHtmx,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::response::Response, AppError> {
    let row = state
        .db
        .get_activity(id)
        .await
        .reject("could not load activity")?
        .or_not_found()?;
    if row.user_id != user.id {
        return Err(AppError::NotFound);
    }

    let activity = match row.decode() {
        Ok(activity) => activity,
        Err(e) => {
            tracing::warn!("activity {id} cannot be edited: {e}");
            return Ok(views::render(
                is_htmx,
                "Unsupported activity",
                activity_views::unsupported_page(),
                Some(&user.name),
            )
            .into_response());
        }
    };

    let values = authoring_views::activity_values(&activity);
    Ok(views::render(
        is_htmx,
        "Edit activity",
        authoring_views::edit_page(
            activity.id,
            activity.ty,
            &activity.title,
            &values,
            &FieldErrors::default(),
            None,
        ),
        Some(&user.name),
    )
    .into_response())
}

async fn update_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<axum::response::Response, AppError> {
    let row = state
        .db
        .get_activity(id)
        .await
        .reject("could not load activity")?
        .or_not_found()?;
    if row.user_id != user.id {
        return Err(AppError::NotFound);
    }
    let ty: ActivityType = row.activity_type.parse().reject("stored type is invalid")?;

    let (form, cover_image) = collect_form(multipart).await?;
    let draft = match authoring::build_draft(ty, &form) {
        Ok(draft) => draft,
        Err(errors) => {
            let values = authoring_views::submitted_values(&form);
            return Ok(views::titled(
                "Edit activity",
                authoring_views::edit_page(id, ty, &row.title, &values, &errors, None),
            )
            .into_response());
        }
    };

    let updated = state
        .db
        .update_activity(id, user.id, &draft, cover_image.as_deref())
        .await
        .reject("could not update activity")?;
    if !updated {
        return Err(AppError::NotFound);
    }

    Ok(([("HX-Redirect", names::activity_url(id))], "").into_response())
}

async fn delete_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::response::Response, AppError> {
    let deleted = state
        .db
        .delete_activity(id, user.id)
        .await
        .reject("could not delete activity")?;
    if !deleted {
        return Err(AppError::NotFound);
    }

    Ok(([("HX-Redirect", names::ACTIVITIES_URL)], "").into_response())
}

/// Flatten the multipart form into a string map. A non-empty cover image
/// upload is written to [`names::UPLOADS_DIR`] and comes back as its public
/// path.
async fn collect_form(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, Option<String>), AppError> {
    let mut form = HashMap::new();
    let mut cover_image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .reject_input("malformed form upload")?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "cover_image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await.reject_input("could not read upload")?;
            if file_name.is_empty() || data.is_empty() {
                continue;
            }
            let ext = match file_name.rsplit_once('.') {
                Some((_, ext)) if !ext.is_empty() => ext,
                _ => "bin",
            };
            let file = format!("{}.{ext}", Ulid::new());
            tokio::fs::create_dir_all(names::UPLOADS_DIR)
                .await
                .reject("could not store upload")?;
            tokio::fs::write(format!("{}/{file}", names::UPLOADS_DIR), &data)
                .await
                .reject("could not store upload")?;
            cover_image = Some(names::upload_url(&file));
        } else {
            let value = field.text().await.reject_input("malformed form field")?;
            form.insert(name, value);
        }
    }

    Ok((form, cover_image))
}
