use axum::http::{Method, StatusCode};
use serde_json::json;

use integration_tests::TestApp;

async fn create_question(app: &TestApp, cookie: &str) -> String {
    let response = app
        .post(
            "/question",
            json!({
                "title": "How do lifetimes work?",
                "description": "The borrow checker rejects my code",
                "tagNames": ["rust", "lifetimes", "rust"],
            }),
            cookie,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["question"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn vote_up_then_down_end_to_end() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;
    let login = app
        .request(
            Method::POST,
            "/auth/login",
            Some(json!({ "email": "alice@example.com", "password": "password123" })),
            None,
        )
        .await;
    let cookie = login.cookie.unwrap_or(cookie);
    let id = create_question(&app, &cookie).await;

    let up = app
        .post(&format!("/question/{id}/vote"), json!({ "type": "up" }), &cookie)
        .await;
    assert_eq!(up.status, StatusCode::OK);
    assert_eq!(up.body, json!({ "message": "Vote updated", "votes": 1, "up": 1, "down": 0 }));

    let detail = app.get(&format!("/question/{id}"), &cookie).await;
    assert_eq!(detail.body["question"]["votes"], 1);

    let down = app
        .post(&format!("/question/{id}/vote"), json!({ "type": "down" }), &cookie)
        .await;
    assert_eq!(down.body["votes"], -1);

    let detail = app.get(&format!("/question/{id}"), &cookie).await;
    assert_eq!(detail.body["question"]["votes"], -1);
    assert_eq!(detail.body["question"]["upvotes"], json!([]));
    assert_eq!(detail.body["question"]["downvotes"].as_array().unwrap().len(), 1);

    let tally = app.get(&format!("/question/{id}/votes"), &cookie).await;
    assert_eq!(tally.body, json!({ "up": 0, "down": 1, "net": -1 }));
}

#[tokio::test]
async fn repeated_votes_are_idempotent() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;
    let id = create_question(&app, &cookie).await;

    for _ in 0..3 {
        app.post(&format!("/question/{id}/vote"), json!({ "type": "up" }), &cookie)
            .await;
    }
    let tally = app.get(&format!("/question/{id}/votes"), &cookie).await;
    assert_eq!(tally.body["net"], 1);

    let retract = app
        .post(&format!("/question/{id}/vote"), json!({ "type": "meh" }), &cookie)
        .await;
    assert_eq!(retract.body["votes"], 0);
}

#[tokio::test]
async fn non_string_vote_type_retracts() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;
    let id = create_question(&app, &cookie).await;

    app.post(&format!("/question/{id}/vote"), json!({ "type": "up" }), &cookie)
        .await;

    for body in [json!({ "type": 1 }), json!({ "type": ["up"] }), json!({ "type": true })] {
        let response = app
            .post(&format!("/question/{id}/vote"), body.clone(), &cookie)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{body}");
        assert_eq!(response.body["votes"], 0, "{body}");
    }

    let tally = app.get(&format!("/question/{id}/votes"), &cookie).await;
    assert_eq!(tally.body, json!({ "up": 0, "down": 0, "net": 0 }));
}

#[tokio::test]
async fn question_views_resolve_tags_and_author() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;
    create_question(&app, &cookie).await;

    let list = app.get("/question", &cookie).await;
    let first = &list.body[0];
    assert_eq!(first["tags"], json!(["rust", "lifetimes"]));
    assert_eq!(first["author"], json!({ "username": "alice", "reputation": 0 }));

    let tags = app.get("/tag", &cookie).await;
    assert_eq!(tags.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn detail_nests_answers_and_comments() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let id = create_question(&app, &alice).await;

    let answer = app
        .post(&format!("/answer/question/{id}"), json!({ "content": "Read the book" }), &bob)
        .await;
    assert_eq!(answer.status, StatusCode::CREATED);
    assert_eq!(answer.body["message"], "Answer created");
    let answer_id = answer.body["answer"]["id"].as_str().unwrap().to_string();

    let comment = app
        .post(&format!("/comment/answer/{answer_id}"), json!({ "content": "Thanks!" }), &alice)
        .await;
    assert_eq!(comment.status, StatusCode::CREATED);

    let detail = app.get(&format!("/question/{id}"), &alice).await;
    let answers = detail.body["question"]["answers"].as_array().unwrap();
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0]["author"]["username"], "bob");
    assert_eq!(answers[0]["comments"][0]["content"], "Thanks!");

    let unanswered = app.get("/question/unanswered", &alice).await;
    assert_eq!(unanswered.body, json!([]));

    // Alice is told that Bob answered.
    let inbox = app.get("/notifications", &alice).await;
    assert_eq!(inbox.body[0]["type"], "answer_posted");
}

#[tokio::test]
async fn my_questions_only_lists_own() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    create_question(&app, &alice).await;

    assert_eq!(app.get("/question/my", &alice).await.body.as_array().unwrap().len(), 1);
    assert_eq!(app.get("/question/my", &bob).await.body, json!([]));
}

#[tokio::test]
async fn bad_input_is_reported_as_json() {
    let app = TestApp::new();
    let cookie = app.register("alice").await;

    let bad_id = app.get("/question/not-a-uuid", &cookie).await;
    assert_eq!(bad_id.status, StatusCode::BAD_REQUEST);
    assert!(bad_id.body["error"].is_string());

    let missing = app
        .get(&format!("/question/{}", uuid::Uuid::now_v7()), &cookie)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.error(), "Question not found");

    let blank = app.post("/question", json!({ "title": "" }), &cookie).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn answer_and_comment_votes() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let id = create_question(&app, &alice).await;
    let answer = app
        .post(&format!("/answer/question/{id}"), json!({ "content": "self answer" }), &alice)
        .await;
    let answer_id = answer.body["answer"]["id"].as_str().unwrap().to_string();
    let comment = app
        .post(&format!("/comment/answer/{answer_id}"), json!({ "content": "note" }), &alice)
        .await;
    let comment_id = comment.body["comment"]["id"].as_str().unwrap().to_string();

    let voted = app
        .post(&format!("/answer/{answer_id}/vote"), json!({ "type": "down" }), &alice)
        .await;
    assert_eq!(voted.body["down"], 1);

    let voted = app
        .post(&format!("/comment/{comment_id}/vote"), json!({ "type": "up" }), &alice)
        .await;
    assert_eq!(voted.body["up"], 1);
    let tally = app.get(&format!("/comment/{comment_id}/votes"), &alice).await;
    assert_eq!(tally.body["net"], 1);
}
