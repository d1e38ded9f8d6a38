mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;
use yamdb_api::core::Role;

async fn title(app: &TestApp, admin: &str, name: &str, year: i32) -> i64 {
    let (status, body) = app
        .post("/api/v1/titles", Some(admin), json!({"name": name, "year": year}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn review(app: &TestApp, token: &str, title_id: i64, score: i64) -> Value {
    let (status, body) = app
        .post(
            &format!("/api/v1/titles/{}/reviews", title_id),
            Some(token),
            json!({"text": "Thoughts", "score": score}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}

#[tokio::test]
async fn test_rating_is_mean_of_scores() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let (_, bob) = app.user("bob", Role::User).await;
    let dune = title(&app, &admin, "Dune", 1965).await;

    review(&app, &alice, dune, 8).await;
    review(&app, &bob, dune, 10).await;

    let (_, body) = app.get(&format!("/api/v1/titles/{}", dune), None).await;
    assert_eq!(body["rating"], 9.0);

    let (_, list) = app.get("/api/v1/titles", None).await;
    assert_eq!(list["results"][0]["rating"], 9.0);
}

#[tokio::test]
async fn test_one_review_per_author_per_title() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let (_, bob) = app.user("bob", Role::User).await;
    let dune = title(&app, &admin, "Dune", 1965).await;

    let created = review(&app, &alice, dune, 7).await;
    assert_eq!(created["author"], "alice");
    assert_eq!(created["score"], 7);
    assert!(created["pub_date"].is_string());

    let (status, body) = app
        .post(
            &format!("/api/v1/titles/{}/reviews", dune),
            Some(&alice),
            json!({"text": "Again", "score": 9}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    review(&app, &bob, dune, 9).await;

    let other = title(&app, &admin, "Solaris", 1961).await;
    review(&app, &alice, other, 6).await;
}

#[tokio::test]
async fn test_review_input_and_missing_title() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let dune = title(&app, &admin, "Dune", 1965).await;
    let uri = format!("/api/v1/titles/{}/reviews", dune);

    let (status, _) = app.post(&uri, None, json!({"text": "Hi", "score": 5})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.post(&uri, Some(&alice), json!({"text": "Hi", "score": 11})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["score"].is_array());

    let (status, _) = app
        .post("/api/v1/titles/9999/reviews", Some(&alice), json!({"text": "Hi", "score": 5}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/api/v1/titles/9999/reviews", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, list) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_review_edit_permissions() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let (_, bob) = app.user("bob", Role::User).await;
    let (_, moderator) = app.user("moder", Role::Moderator).await;
    let dune = title(&app, &admin, "Dune", 1965).await;
    let created = review(&app, &alice, dune, 7).await;
    let uri = format!("/api/v1/titles/{}/reviews/{}", dune, created["id"]);

    let (status, _) = app.patch(&uri, None, json!({"score": 1})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.patch(&uri, Some(&bob), json!({"score": 1})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.patch(&uri, Some(&alice), json!({"score": 8})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 8);
    assert_eq!(body["text"], "Thoughts");

    let (status, body) = app
        .put(&uri, Some(&moderator), json!({"text": "Moderated", "score": 8}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Moderated");
    assert_eq!(body["author"], "alice");

    let (status, _) = app.delete(&uri, Some(&bob)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.delete(&uri, Some(&admin)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.get(&uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_review_must_belong_to_title() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let dune = title(&app, &admin, "Dune", 1965).await;
    let solaris = title(&app, &admin, "Solaris", 1961).await;
    let created = review(&app, &alice, dune, 7).await;

    let (status, _) = app
        .get(&format!("/api/v1/titles/{}/reviews/{}", solaris, created["id"]), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            &format!("/api/v1/titles/{}/reviews/{}/comments", solaris, created["id"]),
            Some(&alice),
            json!({"text": "Wrong place"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let (_, bob) = app.user("bob", Role::User).await;
    let (_, moderator) = app.user("moder", Role::Moderator).await;
    let dune = title(&app, &admin, "Dune", 1965).await;
    let created = review(&app, &alice, dune, 7).await;
    let comments_uri = format!("/api/v1/titles/{}/reviews/{}/comments", dune, created["id"]);

    let (status, _) = app.post(&comments_uri, None, json!({"text": "Anon"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, comment) = app.post(&comments_uri, Some(&bob), json!({"text": "Agreed"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(comment["author"], "bob");
    let comment_uri = format!("{}/{}", comments_uri, comment["id"]);

    let (status, _) = app.patch(&comment_uri, Some(&alice), json!({"text": "Edited"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.patch(&comment_uri, Some(&bob), json!({"text": "Edited"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], "Edited");
    let (status, _) = app.put(&comment_uri, Some(&moderator), json!({"text": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.get(&comments_uri, None).await;
    assert_eq!(list["count"], 1);

    let (status, _) = app.delete(&comment_uri, Some(&moderator)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = app.get(&comments_uri, None).await;
    assert_eq!(list["count"], 0);
}

#[tokio::test]
async fn test_deleting_review_removes_comments() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let (_, alice) = app.user("alice", Role::User).await;
    let dune = title(&app, &admin, "Dune", 1965).await;
    let created = review(&app, &alice, dune, 7).await;
    let review_id = created["id"].as_i64().unwrap();
    let comments_uri = format!("/api/v1/titles/{}/reviews/{}/comments", dune, review_id);

    let (_, comment) = app.post(&comments_uri, Some(&alice), json!({"text": "Self reply"})).await;
    let comment_id = comment["id"].as_i64().unwrap();

    app.delete(&format!("/api/v1/titles/{}/reviews/{}", dune, review_id), Some(&alice))
        .await;

    assert!(app
        .state
        .comments()
        .find(review_id, comment_id)
        .await
        .unwrap()
        .is_none());

    // Deleting the title takes its reviews with it.
    let second = review(&app, &alice, dune, 5).await;
    app.delete(&format!("/api/v1/titles/{}", dune), Some(&admin)).await;
    assert!(app
        .state
        .reviews()
        .find(dune, second["id"].as_i64().unwrap())
        .await
        .unwrap()
        .is_none());
}
