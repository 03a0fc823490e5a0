use axum::{
    extract::{Form, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    extractors::{IsHtmx, MaybeUser},
    names,
    play::quiz::QuizMode,
    play::AnyPlayer,
    rejections::{AppError, OptionExt, ResultExt},
    views, AppState,
};

use crate::views::play as play_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities/{id}/play", post(start_play))
        .route("/play/{token}", get(play_screen))
        .route("/play/{token}/begin", post(begin))
        .route("/play/{token}/clock", get(clock))
        .route("/play/{token}/action", post(action))
        .route("/play/{token}/submit", post(submit))
        .route("/play/{token}/abandon", post(abandon))
}

#[derive(Deserialize)]
struct StartParams {
    mode: Option<String>,
}

async fn start_play(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<StartParams>,
) -> Result<axum::response::Response, AppError> {
    let row = state
        .db
        .get_activity(id)
        .await
        .reject("could not load activity")?
        .or_not_found()?;
    let activity = row.decode().reject_input("this activity cannot be played")?;

    if activity.content.item_count() == 0 {
        return Err(AppError::Input("this activity has no content yet"));
    }

    let mode = params
        .mode
        .as_deref()
        .map(QuizMode::from_query)
        .unwrap_or_default();
    let token = state.plays.create(&activity, mode);
    tracing::debug!("play session {token} started for activity {id}");

    let body = state
        .plays
        .with_player(&token, |player| {
            play_views::play_page(&token, &activity.title, id, player)
        })
        .or_not_found()?;

    // let the address bar point at something refreshable
    Ok((
        [("HX-Push-Url", names::play_url(&token))],
        views::titled(&activity.title, body),
    )
        .into_response())
}

/// Title of the activity behind a play session.
async fn session_title(state: &AppState, token: &str) -> Result<(i64, String), AppError> {
    let id = state.plays.activity_id(token).or_not_found()?;
    let row = state
        .db
        .get_activity(id)
        .await
        .reject("could not load activity")?
        .or_not_found()?;
    Ok((id, row.title))
}

async fn play_screen(
    MaybeUser(user): MaybeUser,
    IsHtmx(is_htmx): IsHtmx,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<maud::Markup, AppError> {
    let (id, title) = session_title(&state, &token).await?;
    let body = state
        .plays
        .with_player(&token, |player| {
            play_views::play_page(&token, &title, id, player)
        })
        .or_not_found()?;

    Ok(views::render(
        is_htmx,
        &title,
        body,
        user.as_ref().map(|u| u.name.as_str()),
    ))
}

async fn begin(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<maud::Markup, AppError> {
    if !state.plays.start(&token) {
        return Err(AppError::NotFound);
    }
    let (id, title) = session_title(&state, &token).await?;
    let body = state
        .plays
        .with_player(&token, |player| {
            play_views::play_page(&token, &title, id, player)
        })
        .or_not_found()?;
    Ok(views::titled(&title, body))
}

async fn clock(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<maud::Markup, AppError> {
    state
        .plays
        .with_player(&token, |player| play_views::clock_fragment(&token, player))
        .or_not_found()
}

/// One board interaction. The variant-specific parameters ride in the form
/// body; an action that does not fit the session's game is ignored.
#[derive(Deserialize)]
struct ActionForm {
    action: String,
    row: Option<usize>,
    col: Option<usize>,
    index: Option<usize>,
    gap: Option<usize>,
    from: Option<usize>,
    to: Option<usize>,
    value: Option<String>,
}

async fn action(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Form(form): Form<ActionForm>,
) -> Result<maud::Markup, AppError> {
    let (id, title) = session_title(&state, &token).await?;
    let body = state
        .plays
        .with_player(&token, |player| {
            apply(player, &form);
            play_views::play_page(&token, &title, id, player)
        })
        .or_not_found()?;
    Ok(views::titled(&title, body))
}

fn apply(player: &mut AnyPlayer, form: &ActionForm) {
    let value = form.value.as_deref().unwrap_or_default();

    match (player, form.action.as_str()) {
        (AnyPlayer::WordSearch(p), "tap") => {
            if let (Some(row), Some(col)) = (form.row, form.col) {
                p.play(|g| {
                    g.tap(row, col);
                });
            }
        }
        (AnyPlayer::Crossword(p), "cell") => {
            if let (Some(row), Some(col)) = (form.row, form.col) {
                p.play(|g| g.set_cell(row, col, value));
            }
        }
        (AnyPlayer::Crossword(p), "check") => {
            p.play(|g| {
                g.check();
            });
        }
        (AnyPlayer::Quiz(p), "answer") => {
            if let Some(index) = form.index {
                p.play(|g| g.answer(index, value));
            }
        }
        (AnyPlayer::Quiz(p), "choose") => {
            p.play(|g| {
                g.choose(value);
            });
        }
        (AnyPlayer::Cloze(p), "fill") => {
            if let (Some(index), Some(gap)) = (form.index, form.gap) {
                p.play(|g| g.fill(index, gap, value));
            }
        }
        (AnyPlayer::DragDrop(p), "drop") => {
            if let Some(slot) = form.index {
                p.play(|g| {
                    if let Some(translation) =
                        g.pairs().get(slot).map(|pair| pair.translation.clone())
                    {
                        g.drop(value, &translation);
                    }
                });
            }
        }
        (AnyPlayer::DragDrop(p), "undo") => {
            p.play(|g| {
                g.undo();
            });
        }
        (AnyPlayer::MultipleChoice(p), "choose") => {
            p.play(|g| {
                g.choose(value);
            });
        }
        (AnyPlayer::SentenceOrder(p), "move") => {
            if let (Some(from), Some(to)) = (form.from, form.to) {
                p.play(|g| g.move_word(from, to));
            }
        }
        (AnyPlayer::SentenceOrder(p), "check") => {
            let elapsed = p.elapsed();
            p.play(|g| {
                g.check(elapsed);
            });
        }
        _ => {}
    }
}

async fn submit(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<maud::Markup, AppError> {
    let (id, title) = session_title(&state, &token).await?;
    state.plays.submit(&token).or_not_found()?;
    let body = state
        .plays
        .with_player(&token, |player| {
            play_views::play_page(&token, &title, id, player)
        })
        .or_not_found()?;
    Ok(views::titled(&title, body))
}

async fn abandon(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let id = state.plays.activity_id(&token).or_not_found()?;
    state.plays.remove(&token);
    Ok(([("HX-Redirect", names::activity_url(id))], "").into_response())
}
