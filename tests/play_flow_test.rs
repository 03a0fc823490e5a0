mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use ludoteca::{names, router};
use tower::ServiceExt;

async fn body_string(resp: axum::response::Response) -> String {
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

fn htmx_post(uri: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("HX-Request", "true")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .expect("request build should succeed")
}

async fn start_quiz_session(app: &axum::Router, id: i64, mode: &str) -> String {
    let resp = app
        .clone()
        .oneshot(htmx_post(
            &format!("{}?mode={mode}", names::start_play_url(id)),
            Body::empty(),
        ))
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);

    let pushed = resp
        .headers()
        .get("HX-Push-Url")
        .and_then(|v| v.to_str().ok())
        .expect("play url header")
        .to_string();
    pushed
        .rsplit('/')
        .next()
        .expect("token in play url")
        .to_string()
}

#[tokio::test]
async fn quiz_all_mode_scores_a_perfect_run() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "player@example.com").await;
    let id = common::quiz_activity(&db, user_id, "Capitals").await;
    let app = router(common::test_state(db));

    let token = start_quiz_session(&app, id, "all").await;

    // answer the only question, then grade
    let resp = app
        .clone()
        .oneshot(htmx_post(
            &names::play_action_url(&token),
            Body::from("action=answer&index=0&value=Lisboa"),
        ))
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(htmx_post(&names::play_submit_url(&token), Body::empty()))
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("100.00%"));
    assert!(body.contains("celebrate"));

    // submit is terminal: asking again renders the same outcome
    let resp = app
        .oneshot(htmx_post(&names::play_submit_url(&token), Body::empty()))
        .await
        .expect("router should respond");
    let body = body_string(resp).await;
    assert!(body.contains("100.00%"));
}

#[tokio::test]
async fn interactive_quiz_finishes_itself_on_the_last_answer() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "inter@example.com").await;
    let id = common::quiz_activity(&db, user_id, "Capitals").await;
    let app = router(common::test_state(db));

    let token = start_quiz_session(&app, id, "interactive").await;

    // a wrong pick on the only question ends the run at 0%
    let resp = app
        .oneshot(htmx_post(
            &names::play_action_url(&token),
            Body::from("action=choose&value=Porto"),
        ))
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    assert!(body.contains("0.00%"));
    assert!(!body.contains("celebrate"));
}

#[tokio::test]
async fn clock_endpoint_ticks_while_the_run_is_live() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "clock@example.com").await;
    let id = common::quiz_activity(&db, user_id, "Capitals").await;
    let app = router(common::test_state(db));

    let token = start_quiz_session(&app, id, "all").await;

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(names::play_clock_url(&token))
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_string(resp).await;
    // five minute limit, rendered mm:ss
    assert!(body.contains("05:00") || body.contains("04:5"));
}

#[tokio::test]
async fn abandon_forgets_the_session() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "quitter@example.com").await;
    let id = common::quiz_activity(&db, user_id, "Capitals").await;
    let app = router(common::test_state(db));

    let token = start_quiz_session(&app, id, "all").await;

    let resp = app
        .clone()
        .oneshot(htmx_post(&names::play_abandon_url(&token), Body::empty()))
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("HX-Redirect")
            .and_then(|v| v.to_str().ok()),
        Some(names::activity_url(id).as_str()),
    );

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(names::play_url(&token))
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
