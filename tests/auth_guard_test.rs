mod common;

use axum::{
    body::Body,
    http::{header::LOCATION, Method, Request, StatusCode},
};
use ludoteca::{names, router};
use tower::ServiceExt;

#[tokio::test]
async fn protected_pages_redirect_to_login_without_a_session() {
    let app = router(common::test_state(common::create_test_db().await));

    for uri in ["/activities", "/account", "/activities/new/quiz"] {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request build should succeed"),
            )
            .await
            .expect("router should respond");

        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "for {uri}");
        assert_eq!(
            resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
            Some(names::LOGIN_URL),
            "for {uri}",
        );
    }
}

#[tokio::test]
async fn protected_pages_accept_a_valid_session_cookie() {
    let db = common::create_test_db().await;
    let (_user_id, session) = common::signed_in_user(&db, "guard@example.com").await;
    let app = router(common::test_state(db));

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/account")
                .header(
                    "cookie",
                    format!("{}={}", names::USER_SESSION_COOKIE_NAME, session),
                )
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn state_changing_requests_without_htmx_header_are_rejected() {
    let db = common::create_test_db().await;
    let (_user_id, session) = common::signed_in_user(&db, "csrf@example.com").await;
    let app = router(common::test_state(db));

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(names::LOGOUT_URL)
                .header(
                    "cookie",
                    format!("{}={}", names::USER_SESSION_COOKIE_NAME, session),
                )
                .body(Body::empty())
                .expect("request build should succeed"),
        )
        .await
        .expect("router should respond");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
