use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    extractors::{AuthGuard, IsHtmx, MaybeUser},
    names,
    rejections::{AppError, OptionExt, ResultExt},
    views, AppState,
};

use crate::views::activity as activity_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities/{id}/share", post(share_post))
        .route(names::PUBLIC_ACTIVITY_URL, get(public_activity))
}

async fn share_post(
    AuthGuard(_user): AuthGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    state
        .db
        .get_activity(id)
        .await
        .reject("could not load activity")?
        .or_not_found()?;

    let token = state
        .db
        .create_share_link(id)
        .await
        .reject("could not create share link")?;

    Ok(activity_views::share_link_created(&state.base_url, &token))
}

#[derive(Deserialize)]
struct PublicParams {
    token: String,
}

/// Resolve a one-time link. The token is burned on this request: a reload
/// of the page 404s.
async fn public_activity(
    MaybeUser(user): MaybeUser,
    IsHtmx(is_htmx): IsHtmx,
    State(state): State<AppState>,
    Query(params): Query<PublicParams>,
) -> Result<axum::response::Response, AppError> {
    let id = state
        .db
        .consume_share_link(&params.token)
        .await
        .reject("could not resolve share link")?
        .or_not_found()?;

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
            tracing::warn!("shared activity {id} cannot be played: {e}");
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
