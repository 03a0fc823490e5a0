mod common;

use std::collections::HashMap;

use ludoteca::authoring;
use ludoteca::models::{ActivityContent, ActivityType};

#[tokio::test]
async fn user_signup_verification_and_session_round_trip() {
    let db = common::create_test_db().await;

    let (user_id, token) = db
        .create_unverified_user("Ana", "ana@example.com", "password123")
        .await
        .expect("create user");

    assert!(db.email_exists("ana@example.com").await.expect("exists"));
    assert!(!db
        .is_email_verified("ana@example.com")
        .await
        .expect("verified check"));

    assert!(db.verify_email_token(&token).await.expect("verify"));
    assert!(db
        .is_email_verified("ana@example.com")
        .await
        .expect("verified check"));
    // tokens are single use
    assert!(!db.verify_email_token(&token).await.expect("verify again"));

    assert!(db
        .verify_user_password("ana@example.com", "password123")
        .await
        .expect("password check"));
    assert!(!db
        .verify_user_password("ana@example.com", "wrong")
        .await
        .expect("password check"));

    let session = db.create_user_session(user_id).await.expect("session");
    let user = db
        .get_user_by_session(&session)
        .await
        .expect("lookup")
        .expect("user behind session");
    assert_eq!(user.email, "ana@example.com");

    db.delete_user_session(&session).await.expect("logout");
    assert!(db
        .get_user_by_session(&session)
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn activity_create_update_delete_round_trip() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "author@example.com").await;

    let id = common::quiz_activity(&db, user_id, "Capitals").await;

    let row = db
        .get_activity(id)
        .await
        .expect("get")
        .expect("activity exists");
    let activity = row.decode().expect("decodable");
    assert_eq!(activity.title, "Capitals");
    assert_eq!(activity.ty, ActivityType::Quiz);
    match &activity.content {
        ActivityContent::Quiz { questions } => {
            assert_eq!(questions.len(), 1);
            assert_eq!(questions[0].correct_answer, "Lisboa");
        }
        other => panic!("wrong content arm: {other:?}"),
    }

    // update through the same validation pipeline
    let mut form = HashMap::new();
    form.insert("title".to_string(), "European capitals".to_string());
    form.insert("category".to_string(), "geography".to_string());
    form.insert("time_limit".to_string(), "3".to_string());
    form.insert("question_0".to_string(), "Capital of France?".to_string());
    form.insert("options_0".to_string(), "Paris, Lyon".to_string());
    form.insert("answer_0".to_string(), "Paris".to_string());
    let draft = authoring::build_draft(ActivityType::Quiz, &form).expect("valid form");

    assert!(db
        .update_activity(id, user_id, &draft, None)
        .await
        .expect("update"));
    let row = db.get_activity(id).await.expect("get").expect("exists");
    assert_eq!(row.title, "European capitals");

    // a different user can neither update nor delete
    let (other_id, _) = common::signed_in_user(&db, "other@example.com").await;
    assert!(!db
        .update_activity(id, other_id, &draft, None)
        .await
        .expect("update"));
    assert!(!db.delete_activity(id, other_id).await.expect("delete"));

    assert!(db.delete_activity(id, user_id).await.expect("delete"));
    assert!(db.get_activity(id).await.expect("get").is_none());
}

#[tokio::test]
async fn summaries_and_categories_cover_active_activities() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "lister@example.com").await;

    common::quiz_activity(&db, user_id, "First").await;
    common::quiz_activity(&db, user_id, "Second").await;

    let summaries = db.activity_summaries().await.expect("summaries");
    assert_eq!(summaries.len(), 2);
    // newest first
    assert_eq!(summaries[0].title, "Second");

    let categories = db.activity_categories().await.expect("categories");
    assert_eq!(categories, vec!["geography".to_string()]);
}

#[tokio::test]
async fn share_links_resolve_exactly_once() {
    let db = common::create_test_db().await;
    let (user_id, _) = common::signed_in_user(&db, "sharer@example.com").await;
    let id = common::quiz_activity(&db, user_id, "Shared").await;

    let token = db.create_share_link(id).await.expect("share link");
    assert_eq!(
        db.consume_share_link(&token).await.expect("consume"),
        Some(id)
    );
    assert_eq!(db.consume_share_link(&token).await.expect("consume"), None);
}
