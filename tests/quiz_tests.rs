// tests/quiz_tests.rs

mod common;

use common::{arithmetic_quiz, spawn_app};
use serde_json::{Value, json};

#[tokio::test]
async fn admin_creates_quiz_with_generated_ids() {
    let app = spawn_app().await;

    let quiz = app.create_quiz(arithmetic_quiz(true)).await;

    assert!(quiz["id"].as_str().is_some());
    assert_eq!(quiz["timeLimit"], 5);
    assert_eq!(quiz["questions"][0]["points"], 1);
    let options = quiz["questions"][0]["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert!(options.iter().all(|o| o["id"].as_str().is_some()));
    assert_eq!(options[1]["isCorrect"], true);
}

#[tokio::test]
async fn defaults_apply_to_missing_points_and_time_limit() {
    let app = spawn_app().await;

    let quiz = app
        .create_quiz(json!({
            "title": "Defaults",
            "description": "No limits given",
            "questions": [{
                "question": "Pick yes",
                "options": [{ "text": "yes", "isCorrect": true }, { "text": "no" }]
            }]
        }))
        .await;

    assert_eq!(quiz["timeLimit"], 10);
    assert_eq!(quiz["isPublished"], false);
    assert_eq!(quiz["questions"][0]["points"], 1);
    assert_eq!(quiz["questions"][0]["options"][1]["isCorrect"], false);
}

#[tokio::test]
async fn only_admins_can_write_quizzes() {
    let app = spawn_app().await;
    let user = app.register("eve").await;

    let anonymous = app
        .client
        .post(app.url("/api/quiz"))
        .json(&arithmetic_quiz(true))
        .send()
        .await
        .unwrap();
    assert_eq!(anonymous.status().as_u16(), 401);

    let as_user = app
        .client
        .post(app.url("/api/quiz"))
        .bearer_auth(user["token"].as_str().unwrap())
        .json(&arithmetic_quiz(true))
        .send()
        .await
        .unwrap();
    assert_eq!(as_user.status().as_u16(), 403);
}

#[tokio::test]
async fn invalid_quiz_is_rejected() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let no_correct_option = json!({
        "title": "Broken",
        "description": "Nothing is right",
        "questions": [{
            "question": "?",
            "options": [{ "text": "a", "isCorrect": false }]
        }]
    });
    let no_questions = json!({ "title": "Empty", "description": "Nothing", "questions": [] });
    let zero_time = json!({
        "title": "Zero",
        "description": "No time",
        "timeLimit": 0,
        "questions": [{ "question": "?", "options": [{ "text": "a", "isCorrect": true }] }]
    });

    for body in [no_correct_option, no_questions, zero_time] {
        let response = app
            .client
            .post(app.url("/api/quiz"))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "body: {}", body);
    }
}

#[tokio::test]
async fn drafts_are_hidden_from_users() {
    let app = spawn_app().await;
    let published = app.create_quiz(arithmetic_quiz(true)).await;
    let draft = app.create_quiz(arithmetic_quiz(false)).await;
    let user = app.register("frank").await;

    let public_list: Vec<Value> = app
        .client
        .get(app.url("/api/quiz"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(public_list.len(), 1);
    assert_eq!(public_list[0]["id"], published["id"]);

    let admin_list: Vec<Value> = app
        .client
        .get(app.url("/api/quiz"))
        .bearer_auth(app.admin_token().await)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(admin_list.len(), 2);
    // Newest first.
    assert_eq!(admin_list[0]["id"], draft["id"]);

    let draft_url = app.url(&format!("/api/quiz/{}", draft["id"].as_str().unwrap()));
    let as_user = app
        .client
        .get(&draft_url)
        .bearer_auth(user["token"].as_str().unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(as_user.status().as_u16(), 403);

    let as_admin = app
        .client
        .get(&draft_url)
        .bearer_auth(app.admin_token().await)
        .send()
        .await
        .unwrap();
    assert_eq!(as_admin.status().as_u16(), 200);
}

#[tokio::test]
async fn answer_key_is_hidden_from_quiz_takers() {
    let app = spawn_app().await;
    let quiz = app.create_quiz(arithmetic_quiz(true)).await;
    let url = app.url(&format!("/api/quiz/{}", quiz["id"].as_str().unwrap()));

    let public: Value = app.client.get(&url).send().await.unwrap().json().await.unwrap();
    let option = &public["questions"][0]["options"][0];
    assert!(option["id"].as_str().is_some());
    assert!(option.get("isCorrect").is_none());

    let admin: Value = app
        .client
        .get(&url)
        .bearer_auth(app.admin_token().await)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(admin["questions"][0]["options"][1]["isCorrect"], true);
}

#[tokio::test]
async fn unknown_quiz_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/quiz/does-not-exist"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn update_preserves_existing_ids() {
    let app = spawn_app().await;
    let quiz = app.create_quiz(arithmetic_quiz(false)).await;
    let quiz_id = quiz["id"].as_str().unwrap();
    let question = &quiz["questions"][0];

    let mut questions = vec![question.clone()];
    questions[0]["points"] = json!(4);
    questions.push(json!({
        "question": "Is the sky blue?",
        "options": [{ "text": "yes", "isCorrect": true }, { "text": "no" }]
    }));

    let response = app
        .client
        .put(app.url(&format!("/api/quiz/{}", quiz_id)))
        .bearer_auth(app.admin_token().await)
        .json(&json!({ "isPublished": true, "questions": questions }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["isPublished"], true);
    assert_eq!(updated["title"], "Arithmetic");
    assert_eq!(updated["questions"][0]["id"], question["id"]);
    assert_eq!(updated["questions"][0]["points"], 4);
    assert_eq!(
        updated["questions"][0]["options"][1]["id"],
        question["options"][1]["id"]
    );
    assert!(updated["questions"][1]["id"].as_str().is_some());
}

#[tokio::test]
async fn update_and_delete_missing_quiz_are_not_found() {
    let app = spawn_app().await;
    let token = app.admin_token().await;

    let update = app
        .client
        .put(app.url("/api/quiz/nope"))
        .bearer_auth(&token)
        .json(&json!({ "title": "New title" }))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status().as_u16(), 404);

    let delete = app
        .client
        .delete(app.url("/api/quiz/nope"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_removes_quiz() {
    let app = spawn_app().await;
    let quiz = app.create_quiz(arithmetic_quiz(true)).await;
    let url = app.url(&format!("/api/quiz/{}", quiz["id"].as_str().unwrap()));
    let token = app.admin_token().await;

    let response = app.client.delete(&url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let after = app.client.get(&url).send().await.unwrap();
    assert_eq!(after.status().as_u16(), 404);
}
