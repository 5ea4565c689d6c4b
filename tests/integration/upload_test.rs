//! Integration tests for the multipart upload pipeline and quota ledger.

mod helpers;

use axum::http::StatusCode;
use helpers::{Part, TestApp, exists};

#[tokio::test]
async fn test_upload_over_quota_is_rejected() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    app.upload_one(&user, "first.bin", &[1u8; 900]).await;

    let response = app
        .upload(
            &user.token,
            &[Part::File {
                name: "second.bin",
                content_type: "application/octet-stream",
                data: &[2u8; 150],
            }],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        "Storage limit exceeded. File not saved."
    );
    assert_eq!(app.file_count(&user).await, 1);
    assert!(!exists(app.user_dir(&user).join("second.bin")));
    assert!(exists(app.user_dir(&user).join("first.bin")));

    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 900);
}

#[tokio::test]
async fn test_upload_near_quota_flags_notification() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    app.upload_one(&user, "first.bin", &[1u8; 900]).await;
    let (_, percentage, notify) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(percentage, 90.0);
    assert!(!notify);

    app.upload_one(&user, "second.bin", &[2u8; 80]).await;
    let (used, percentage, notify) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 980);
    assert_eq!(percentage, 98.0);
    assert!(notify);
}

#[tokio::test]
async fn test_upload_landing_on_limit_is_allowed() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    app.upload_one(&user, "exact.bin", &[0u8; 1000]).await;

    let (used, percentage, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 1000);
    assert_eq!(percentage, 100.0);
}

#[tokio::test]
async fn test_upload_record_fields() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;

    let file = app.upload_one(&user, "notes.txt", b"hello drivebox").await;

    assert_eq!(file["name"], "notes.txt");
    assert_eq!(file["size"], 14);
    assert_eq!(file["mimeType"], "text/plain");
    assert_eq!(file["trashed"], false);
    let path = app.user_dir(&user).join("notes.txt");
    assert_eq!(file["filePath"], path.to_string_lossy().as_ref());
    assert_eq!(std::fs::read(&path).unwrap(), b"hello drivebox");
    assert!(
        file["fileUrl"]
            .as_str()
            .unwrap()
            .starts_with("http://drivebox.test/")
    );

    assert_eq!(app.activity_actions(&user).await, vec!["CREATE FILE"]);
}

#[tokio::test]
async fn test_relative_paths_reuse_folders() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;

    let response = app
        .upload(
            &user.token,
            &[
                Part::Field("relativePath", "photos/2024/a.png"),
                Part::File {
                    name: "a.png",
                    content_type: "image/png",
                    data: b"aaa",
                },
                Part::Field("relativePath", "photos/2024/b.png"),
                Part::File {
                    name: "b.png",
                    content_type: "image/png",
                    data: b"bbb",
                },
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["files"].as_array().unwrap().len(), 2);

    let dir = app.user_dir(&user).join("photos").join("2024");
    assert!(exists(dir.join("a.png")));
    assert!(exists(dir.join("b.png")));

    let folders: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE user_id = $1 AND name = '2024'")
            .bind(user.id)
            .fetch_one(&app.db_pool)
            .await
            .unwrap();
    assert_eq!(folders, 1);

    // A second request resolves to the same folders.
    let response = app
        .upload(
            &user.token,
            &[
                Part::Field("relativePath", "photos/2024/c.png"),
                Part::File {
                    name: "c.png",
                    content_type: "image/png",
                    data: b"ccc",
                },
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let folders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM folders WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();
    // root, photos, 2024
    assert_eq!(folders, 3);
}

#[tokio::test]
async fn test_upload_into_requested_folder() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;

    let response = app
        .request(
            "POST",
            "/api/folders",
            Some(serde_json::json!({ "folderName": "Docs" })),
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let folder_id = response.body["id"].as_str().unwrap().to_string();

    let response = app
        .upload(
            &user.token,
            &[
                Part::Field("folderId", &folder_id),
                Part::File {
                    name: "report.pdf",
                    content_type: "application/pdf",
                    data: b"%PDF-1.7",
                },
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["files"][0]["folderId"], folder_id.as_str());
    assert_eq!(
        response.body["files"][0]["fileType"],
        "Adobe Portable Document Format (PDF)"
    );
    assert!(exists(app.user_dir(&user).join("Docs").join("report.pdf")));
}

#[tokio::test]
async fn test_unknown_folder_id_falls_back_to_root() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;

    let response = app
        .upload(
            &user.token,
            &[
                Part::Field("folderId", "undefined"),
                Part::File {
                    name: "loose.txt",
                    content_type: "text/plain",
                    data: b"x",
                },
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(exists(app.user_dir(&user).join("loose.txt")));
}

#[tokio::test]
async fn test_upload_without_files() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = app
        .upload(&user.token, &[Part::Field("folderId", "")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "No files uploaded");
}

#[tokio::test]
async fn test_upload_requires_token() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("POST", "/api/files/upload", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "Missing Authorization header");
}

#[tokio::test]
async fn test_concurrent_uploads_never_exceed_quota() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let first = [Part::File {
        name: "left.bin",
        content_type: "application/octet-stream",
        data: &[1u8; 600],
    }];
    let second = [Part::File {
        name: "right.bin",
        content_type: "application/octet-stream",
        data: &[2u8; 600],
    }];

    let (a, b) = tokio::join!(
        app.upload(&user.token, &first),
        app.upload(&user.token, &second)
    );

    let accepted = [a.status, b.status]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert_eq!(accepted, 1, "{:?} / {:?}", a.body, b.body);
    assert_eq!(app.file_count(&user).await, 1);
    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 600);
}

#[tokio::test]
async fn test_relative_path_escaping_root_is_a_bad_request() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = app
        .upload(
            &user.token,
            &[
                Part::Field("relativePath", "../x/y.txt"),
                Part::File {
                    name: "y.txt",
                    content_type: "text/plain",
                    data: b"escape",
                },
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);
    assert_ne!(response.body["error"], "Error uploading files");
    assert_eq!(app.file_count(&user).await, 0);
    assert!(app.latest_snapshot(&user).await.is_none());
    assert!(!exists(app.storage.path().join("x").join("y.txt")));
    assert!(!exists(app.user_dir(&user).join("y.txt")));
}

#[tokio::test]
async fn test_empty_file_name_is_a_bad_request() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = app
        .upload(
            &user.token,
            &[Part::File {
                name: "",
                content_type: "application/octet-stream",
                data: b"",
            }],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", response.body);
    assert!(response.body["error"].is_string());
    assert_eq!(app.file_count(&user).await, 0);
}

#[tokio::test]
async fn test_failed_activity_write_keeps_file_and_usage() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let trigger = app.break_activity_writes(&user).await;

    let response = app
        .upload(
            &user.token,
            &[Part::File {
                name: "kept.txt",
                content_type: "text/plain",
                data: &[7u8; 120],
            }],
        )
        .await;
    app.restore_activity_writes(&trigger).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["files"][0]["name"], "kept.txt");
    assert_eq!(app.file_count(&user).await, 1);
    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 120);
    assert!(app.activity_actions(&user).await.is_empty());
    assert!(exists(app.user_dir(&user).join("kept.txt")));
}

#[tokio::test]
async fn test_interrupted_upload_leaves_no_trace() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;

    let response = app
        .upload_cut_off(&user.token, &[], "partial.bin", &[9u8; 4096])
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Error uploading files");
    assert_eq!(app.file_count(&user).await, 0);
    assert!(app.latest_snapshot(&user).await.is_none());
    assert!(!exists(app.user_dir(&user).join("partial.bin")));
}

#[tokio::test]
async fn test_interrupted_upload_keeps_earlier_files() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;

    let response = app
        .upload_cut_off(
            &user.token,
            &[Part::File {
                name: "complete.txt",
                content_type: "text/plain",
                data: b"all here",
            }],
            "partial.bin",
            &[9u8; 1024],
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.file_count(&user).await, 1);
    assert!(exists(app.user_dir(&user).join("complete.txt")));
    assert!(!exists(app.user_dir(&user).join("partial.bin")));
}
