#![allow(dead_code)]

use std::collections::HashMap;

use ludoteca::authoring;
use ludoteca::db::Db;
use ludoteca::models::ActivityType;
use ludoteca::AppState;

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("ludoteca_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("file:{}", path.display());
    Db::new(url, String::new())
        .await
        .expect("failed to create test database")
}

/// App state without email sending (dev mode) and plain http cookies.
pub fn test_state(db: Db) -> AppState {
    AppState::new(db, None, "http://localhost:1414".to_string(), false)
}

/// A verified user with a live session; returns (user_id, session token).
pub async fn signed_in_user(db: &Db, email: &str) -> (i32, String) {
    let (user_id, _token) = db
        .create_unverified_user("Test User", email, "password123")
        .await
        .expect("create user");
    let session = db
        .create_user_session(user_id)
        .await
        .expect("create session");
    (user_id, session)
}

/// A one-question quiz built through the authoring pipeline.
pub async fn quiz_activity(db: &Db, user_id: i32, title: &str) -> i64 {
    let mut form = HashMap::new();
    form.insert("title".to_string(), title.to_string());
    form.insert("category".to_string(), "geography".to_string());
    form.insert("time_limit".to_string(), "5".to_string());
    form.insert(
        "question_0".to_string(),
        "Capital of Portugal?".to_string(),
    );
    form.insert("options_0".to_string(), "Lisboa, Porto".to_string());
    form.insert("answer_0".to_string(), "Lisboa".to_string());

    let draft = authoring::build_draft(ActivityType::Quiz, &form).expect("valid quiz form");
    db.create_activity(user_id, ActivityType::Quiz.as_str(), &draft, None)
        .await
        .expect("create activity")
}
