//! Form repository tests: create/read round trip, ownership checks on
//! update, listing order and atomic deletion.

mod common;

use formcraft::errors::AppError;
use formcraft::models::question::QuestionType;
use formcraft::models::{form, response};
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_create_then_read_round_trip() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;

    let ids = form::create(&pool, &owner, "  Survey ", " About you ", &sample_questions())
        .await
        .expect("create form");
    assert_eq!(ids.form_id.len(), 32);
    assert_eq!(ids.share_id.len(), 20);

    let found = form::find_by_id(&pool, &ids.form_id)
        .await
        .expect("query")
        .expect("form exists");
    assert_eq!(found.owner_id, owner);
    assert_eq!(found.title, "Survey");
    assert_eq!(found.description, "About you");
    assert_eq!(found.share_id, ids.share_id);
    assert_eq!(found.questions.len(), 2);
    assert_eq!(found.questions[1].kind, QuestionType::Checkbox);
    assert_eq!(found.questions[1].options, vec!["Red", "Blue", "Green"]);

    let shared = form::find_by_share_id(&pool, &ids.share_id)
        .await
        .expect("query")
        .expect("shared form exists");
    assert_eq!(shared, found);
}

#[tokio::test]
async fn test_create_pads_choice_question_without_options() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;

    let questions = json!([{ "type": "dropdown", "text": "Pick", "options": ["", "  "] }]);
    let ids = form::create(&pool, &owner, "T", "", &questions).await.expect("create");

    let found = form::find_by_id(&pool, &ids.form_id).await.expect("query").expect("form");
    assert_eq!(found.questions[0].id, "q1");
    assert_eq!(found.questions[0].options, vec!["Option 1", "Option 2"]);
}

#[tokio::test]
async fn test_create_rejects_malformed_questions() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;

    let err = form::create(&pool, &owner, "T", "", &json!({ "not": "a list" }))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Schema(_)));

    let err = form::create(&pool, &owner, "T", "", &json!([{ "type": "rating", "text": "?" }]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Schema(_)));

    let forms = form::list_for_owner(&pool, &owner).await.expect("list");
    assert!(forms.is_empty());
}

#[tokio::test]
async fn test_create_for_missing_owner_is_not_found() {
    let pool = setup_test_db().await;

    let err = form::create(&pool, "nobody", "T", "", &sample_questions())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("User")));
}

#[tokio::test]
async fn test_update_replaces_content_and_keeps_share_id() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;
    let ids = form::create(&pool, &owner, "Old", "", &sample_questions()).await.expect("create");

    let new_questions = json!([{ "id": "q9", "type": "paragraph", "text": "Thoughts?" }]);
    let updated = form::update(&pool, &ids.form_id, &owner, "New", "Desc", &new_questions)
        .await
        .expect("update");
    assert_eq!(updated, ids);

    let found = form::find_by_id(&pool, &ids.form_id).await.expect("query").expect("form");
    assert_eq!(found.title, "New");
    assert_eq!(found.description, "Desc");
    assert_eq!(found.share_id, ids.share_id);
    assert_eq!(found.questions.len(), 1);
    assert_eq!(found.questions[0].id, "q9");
}

#[tokio::test]
async fn test_update_by_non_owner_is_denied_and_changes_nothing() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;
    let other = create_user(&pool, OTHER_EMAIL).await;
    let ids = form::create(&pool, &owner, "Mine", "", &sample_questions()).await.expect("create");
    let before = form::find_by_id(&pool, &ids.form_id).await.expect("query").expect("form");

    let err = form::update(&pool, &ids.form_id, &other, "Hijacked", "", &json!([]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccessDenied));

    let after = form::find_by_id(&pool, &ids.form_id).await.expect("query").expect("form");
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_update_missing_form_is_not_found() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;

    let err = form::update(&pool, "missing", &owner, "T", "", &json!([]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound("Form")));
}

#[tokio::test]
async fn test_list_is_newest_first_and_per_owner() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;
    let other = create_user(&pool, OTHER_EMAIL).await;

    let first = form::create(&pool, &owner, "First", "", &json!([])).await.expect("create");
    let second = form::create(&pool, &owner, "Second", "", &json!([])).await.expect("create");
    form::create(&pool, &other, "Theirs", "", &json!([])).await.expect("create");

    let forms = form::list_for_owner(&pool, &owner).await.expect("list");
    let ids: Vec<&str> = forms.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec![second.form_id.as_str(), first.form_id.as_str()]);
}

#[tokio::test]
async fn test_delete_removes_form_and_its_responses() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;
    let ids = form::create(&pool, &owner, "T", "", &sample_questions()).await.expect("create");
    let answers = json!([{ "questionId": "q1", "questionText": "Name", "value": "Ann" }]);
    response::submit(&pool, &ids.form_id, &answers, true).await.expect("submit");
    response::submit(&pool, &ids.form_id, &answers, true).await.expect("submit");

    assert!(form::delete(&pool, &ids.form_id).await.expect("delete"));

    assert!(form::find_by_id(&pool, &ids.form_id).await.expect("query").is_none());
    assert_eq!(response::count(&pool, &ids.form_id).await.expect("count"), 0);
    assert!(!form::delete(&pool, &ids.form_id).await.expect("second delete"));
}

#[tokio::test]
async fn test_failed_delete_leaves_form_and_responses_intact() {
    let pool = setup_test_db().await;
    let owner = create_user(&pool, OWNER_EMAIL).await;
    let ids = form::create(&pool, &owner, "T", "", &sample_questions()).await.expect("create");
    let answers = json!([{ "questionId": "q1", "questionText": "Name", "value": "Ann" }]);
    response::submit(&pool, &ids.form_id, &answers, true).await.expect("submit");

    // Responses go first, then the form row fails.
    sqlx::raw_sql(
        "CREATE TRIGGER block_form_delete BEFORE DELETE ON forms \
         BEGIN SELECT RAISE(ABORT, 'form delete blocked'); END;",
    )
    .execute(&pool)
    .await
    .expect("create trigger");

    let err = form::delete(&pool, &ids.form_id).await.unwrap_err();
    assert!(matches!(err, AppError::Db(_)));

    assert!(form::find_by_id(&pool, &ids.form_id).await.expect("query").is_some());
    assert_eq!(response::count(&pool, &ids.form_id).await.expect("count"), 1);
}
