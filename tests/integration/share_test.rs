//! Integration tests for share creation and public share access.

mod helpers;

use axum::http::StatusCode;
use helpers::{TestApp, TestUser};
use serde_json::{Value, json};

async fn share(app: &TestApp, user: &TestUser, body: Value) -> helpers::TestResponse {
    app.request("POST", "/api/files/share", Some(body), Some(&user.token))
        .await
}

fn token_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap()
}

#[tokio::test]
async fn test_open_share_resolves_publicly() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "shared.txt", b"public").await;

    let response = share(&app, &user, json!({ "fileId": file["id"] })).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "success");
    let url = response.body["url"].as_str().unwrap();
    assert!(url.starts_with("http://drivebox.test/shared/"));

    let response = app
        .request(
            "GET",
            &format!("/api/files/shared/{}", token_of(url)),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["name"], "shared.txt");
    assert_eq!(response.body["itemId"], file["id"]);
    assert_eq!(response.body["isPasswordEnabled"], false);
    assert_eq!(response.body["shareableType"], "File");

    assert!(
        app.activity_actions(&user)
            .await
            .contains(&"SHARE FILE".to_string())
    );
}

#[tokio::test]
async fn test_share_requires_an_item() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = share(&app, &user, json!({ "isPasswordEnabled": false })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Missing required fileId or folderId");
}

#[tokio::test]
async fn test_share_unknown_item() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = share(&app, &user, json!({ "fileId": uuid::Uuid::new_v4() })).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Item not found");
}

#[tokio::test]
async fn test_share_folder() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(json!({ "folderName": "Team" })),
            Some(&user.token),
        )
        .await;

    let response = share(&app, &user, json!({ "folderId": folder.body["id"] })).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let url = response.body["url"].as_str().unwrap();
    let response = app
        .request(
            "GET",
            &format!("/api/files/shared/{}", token_of(url)),
            None,
            None,
        )
        .await;
    assert_eq!(response.body["shareableType"], "Folder");
    assert_eq!(response.body["name"], "Team");
}

#[tokio::test]
async fn test_password_share() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "locked.txt", b"guarded").await;

    let response = share(
        &app,
        &user,
        json!({
            "fileId": file["id"],
            "isPasswordEnabled": true,
            "password": "open sesame",
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let url = response.body["url"].as_str().unwrap().to_string();

    let view = app
        .request(
            "GET",
            &format!("/api/files/shared/{}", token_of(&url)),
            None,
            None,
        )
        .await;
    assert_eq!(view.body["isPasswordEnabled"], true);

    let response = app
        .request(
            "POST",
            "/api/files/check-password",
            Some(json!({ "fileId": file["id"], "password": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Invalid password");

    let response = app
        .request(
            "POST",
            "/api/files/check-password",
            Some(json!({ "fileId": file["id"], "password": "open sesame" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["id"], file["id"]);
}

#[tokio::test]
async fn test_check_password_missing_fields() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app
        .request(
            "POST",
            "/api/files/check-password",
            Some(json!({ "password": "only" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "Missing required password or fileId");
}

#[tokio::test]
async fn test_blank_password_leaves_share_open() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "open.txt", b"x").await;

    let response = share(
        &app,
        &user,
        json!({ "fileId": file["id"], "isPasswordEnabled": true, "password": "   " }),
    )
    .await;
    let url = response.body["url"].as_str().unwrap().to_string();

    let view = app
        .request(
            "GET",
            &format!("/api/files/shared/{}", token_of(&url)),
            None,
            None,
        )
        .await;
    assert_eq!(view.body["isPasswordEnabled"], false);
}

#[tokio::test]
async fn test_expired_share() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "stale.txt", b"x").await;

    let response = share(
        &app,
        &user,
        json!({
            "fileId": file["id"],
            "isExpirationEnabled": true,
            "expirationDate": "2020-01-01T00:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let url = response.body["url"].as_str().unwrap().to_string();

    let response = app
        .request(
            "GET",
            &format!("/api/files/shared/{}", token_of(&url)),
            None,
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "The link has expired.");
}

#[tokio::test]
async fn test_unknown_token() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app
        .request("GET", "/api/files/shared/not-a-real-token", None, None)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Item not found");
}

#[tokio::test]
async fn test_copy_link_reuses_open_share() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "linked.txt", b"x").await;
    let id = file["id"].as_str().unwrap();

    let first = app
        .request("GET", &format!("/api/files/{id}/copy-link"), None, Some(&user.token))
        .await;
    assert_eq!(first.status, StatusCode::OK, "{:?}", first.body);
    let second = app
        .request("GET", &format!("/api/files/{id}/copy-link"), None, Some(&user.token))
        .await;

    assert_eq!(first.body["url"], second.body["url"]);
}

#[tokio::test]
async fn test_shared_with_me_category() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let owner = app.create_user(1000).await;
    let recipient = app.create_user(1000).await;
    let file = app.upload_one(&owner, "for-you.txt", b"x").await;

    let response = share(
        &app,
        &owner,
        json!({ "fileId": file["id"], "sharedWith": recipient.email }),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let listed = app
        .request(
            "GET",
            "/api/files/category/shared-with-me",
            None,
            Some(&recipient.token),
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body[0]["id"], file["id"]);

    let listed = app
        .request("GET", "/api/files/category/shared", None, Some(&owner.token))
        .await;
    assert_eq!(listed.body[0]["id"], file["id"]);
}
