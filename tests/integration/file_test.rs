//! Integration tests for file operations.

mod helpers;

use axum::http::{StatusCode, header};
use helpers::{Part, TestApp, exists};
use uuid::Uuid;

#[tokio::test]
async fn test_list_files_in_root() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1_000_000).await;
    app.upload_one(&user, "a.txt", b"a").await;
    app.upload_one(&user, "b.txt", b"b").await;

    let response = app.request("GET", "/api/files", None, Some(&user.token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_files_unauthenticated() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("GET", "/api/files", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_file_not_found() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = app
        .request(
            "GET",
            &format!("/api/files/{}", Uuid::new_v4()),
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "File not found");
}

#[tokio::test]
async fn test_other_users_file_is_hidden() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let owner = app.create_user(1000).await;
    let other = app.create_user(1000).await;
    let file = app.upload_one(&owner, "private.txt", b"secret").await;

    let response = app
        .request(
            "GET",
            &format!("/api/files/{}", file["id"].as_str().unwrap()),
            None,
            Some(&other.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_moves_bytes() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "draft.txt", b"v1").await;
    app.upload_one(&user, "taken.txt", b"v2").await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{id}/rename"),
            Some(serde_json::json!({ "newName": "final.txt" })),
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["name"], "final.txt");
    assert!(exists(app.user_dir(&user).join("final.txt")));
    assert!(!exists(app.user_dir(&user).join("draft.txt")));

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{id}/rename"),
            Some(serde_json::json!({ "newName": "taken.txt" })),
            Some(&user.token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        std::fs::read(app.user_dir(&user).join("taken.txt")).unwrap(),
        b"v2"
    );
}

#[tokio::test]
async fn test_move_into_folder() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "move-me.txt", b"data").await;
    let folder = app
        .request(
            "POST",
            "/api/folders",
            Some(serde_json::json!({ "folderName": "Archive" })),
            Some(&user.token),
        )
        .await;
    let folder_id = folder.body["id"].as_str().unwrap();

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{}/move", file["id"].as_str().unwrap()),
            Some(serde_json::json!({ "newFolderId": folder_id })),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "File moved successfully");
    assert_eq!(response.body["file"]["folderId"], folder_id);
    assert!(exists(app.user_dir(&user).join("Archive").join("move-me.txt")));
    assert!(!exists(app.user_dir(&user).join("move-me.txt")));
}

#[tokio::test]
async fn test_move_to_unknown_folder() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "stay.txt", b"data").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/files/{}/move", file["id"].as_str().unwrap()),
            Some(serde_json::json!({ "newFolderId": Uuid::new_v4() })),
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.body["error"],
        "Destination folder not found or you do not have permission to access it."
    );
}

#[tokio::test]
async fn test_copy_counts_against_quota() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "report.txt", &[7u8; 300]).await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request("POST", &format!("/api/files/{id}/copy"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["name"], "Copy of report.txt");
    assert!(exists(app.user_dir(&user).join("Copy of report.txt")));

    let response = app
        .request("POST", &format!("/api/files/{id}/copy"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["name"], "Copy 2 of report.txt");
    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 900);

    // A third copy would take usage to 1200.
    let response = app
        .request("POST", &format!("/api/files/{id}/copy"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.file_count(&user).await, 3);
    assert!(!exists(app.user_dir(&user).join("Copy 3 of report.txt")));
}

#[tokio::test]
async fn test_trash_and_restore() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "old.txt", b"old").await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request("PUT", &format!("/api/files/{id}/trash"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["trashed"], true);

    let listed = app.request("GET", "/api/files", None, Some(&user.token)).await;
    assert!(listed.body.as_array().unwrap().is_empty());
    let trashed = app
        .request("GET", "/api/files/category/trashed", None, Some(&user.token))
        .await;
    assert_eq!(trashed.body.as_array().unwrap().len(), 1);

    let response = app
        .request("PUT", &format!("/api/files/{id}/restore"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["file"]["trashed"], false);

    let response = app
        .request("PUT", &format!("/api/files/{id}/restore"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["error"],
        format!("File with ID {id} is not in trash.")
    );
}

#[tokio::test]
async fn test_lock_and_unlock() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "lockable.txt", b"x").await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request("PUT", &format!("/api/files/{id}/lock"), None, Some(&user.token))
        .await;
    assert_eq!(response.body["locked"], true);

    let response = app
        .request("PUT", &format!("/api/files/{id}/unlock"), None, Some(&user.token))
        .await;
    assert_eq!(response.body["locked"], false);
}

#[tokio::test]
async fn test_delete_file_releases_quota() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "gone.txt", &[1u8; 300]).await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request(
            "DELETE",
            &format!("/api/files/file/{id}"),
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(
        response.body["success"],
        format!("File with ID {id} deleted permanently.")
    );
    assert_eq!(app.file_count(&user).await, 0);
    assert!(!exists(app.user_dir(&user).join("gone.txt")));
    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 0);
    assert!(
        app.activity_actions(&user)
            .await
            .contains(&"DELETE FILE".to_string())
    );
}

#[tokio::test]
async fn test_root_folder_cannot_be_deleted() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    app.upload_one(&user, "keep.txt", b"k").await;
    let root: Uuid = sqlx::query_scalar("SELECT root_folder_id FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&app.db_pool)
        .await
        .unwrap();

    let response = app
        .request(
            "DELETE",
            &format!("/api/files/folder/{root}"),
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "The root folder cannot be deleted.");
    assert!(exists(app.user_dir(&user).join("keep.txt")));
}

#[tokio::test]
async fn test_delete_folder_removes_contents() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let response = app
        .upload(
            &user.token,
            &[
                helpers::Part::Field("relativePath", "album/one.jpg"),
                helpers::Part::File {
                    name: "one.jpg",
                    content_type: "image/jpeg",
                    data: &[9u8; 250],
                },
            ],
        )
        .await;
    let folder_id = response.body["files"][0]["folderId"].as_str().unwrap().to_string();

    let response = app
        .request(
            "DELETE",
            &format!("/api/files/folder/{folder_id}"),
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(!exists(app.user_dir(&user).join("album")));
    assert_eq!(app.file_count(&user).await, 0);
    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 0);
}

#[tokio::test]
async fn test_delete_rejects_unknown_item_type() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/files/album/{}", Uuid::new_v4()),
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_download_and_public_preview() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "résumé.txt", b"hello bytes").await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request("GET", &format!("/api/files/{id}/download"), None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.raw, b"hello bytes");
    let disposition = response.headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("filename*=UTF-8''r%C3%A9sum%C3%A9.txt"));

    let response = app
        .request("GET", &format!("/api/files/preview/{id}"), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.raw, b"hello bytes");
    assert!(
        response.headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("inline")
    );
}

#[tokio::test]
async fn test_download_missing_bytes() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "vanish.txt", b"x").await;
    std::fs::remove_file(app.user_dir(&user).join("vanish.txt")).unwrap();

    let response = app
        .request(
            "GET",
            &format!("/api/files/{}/download", file["id"].as_str().unwrap()),
            None,
            Some(&user.token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "File not found on the server");
}

#[tokio::test]
async fn test_share_link_and_usage() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;
    let file = app.upload_one(&user, "linked.txt", &[0u8; 250]).await;
    let id = file["id"].as_str().unwrap();

    let response = app
        .request("GET", &format!("/api/files/{id}/share-link"), None, Some(&user.token))
        .await;
    assert_eq!(
        response.body["link"],
        format!("http://drivebox.test/api/files/preview/{id}")
    );

    let response = app
        .request("GET", "/api/storage/usage", None, Some(&user.token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["usedStorage"], 250);
    assert_eq!(response.body["storageLimit"], 1000);
    assert_eq!(response.body["usagePercentage"], 25.0);
}

#[tokio::test]
async fn test_health() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "connected");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_delete_alongside_upload_in_same_folder() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(100_000_000).await;
    let incoming = vec![3u8; 200 * 1024];

    for round in 0..20 {
        let victim = app
            .upload_one(&user, &format!("old-{round}.bin"), &[1u8; 512])
            .await;
        let victim_id = victim["id"].as_str().unwrap().to_string();
        let new_name = format!("new-{round}.bin");
        let parts = [Part::File {
            name: new_name.as_str(),
            content_type: "application/octet-stream",
            data: &incoming,
        }];

        let delete_path = format!("/api/files/File/{victim_id}");
        let (uploaded, deleted) = tokio::join!(
            app.upload(&user.token, &parts),
            app.request(
                "DELETE",
                &delete_path,
                None,
                Some(&user.token),
            )
        );

        assert_eq!(uploaded.status, StatusCode::OK, "round {round}: {:?}", uploaded.body);
        assert_eq!(deleted.status, StatusCode::OK, "round {round}: {:?}", deleted.body);
    }

    assert_eq!(app.file_count(&user).await, 20);
    let (used, _, _) = app.latest_snapshot(&user).await.unwrap();
    assert_eq!(used, 20 * 200 * 1024);
}

#[tokio::test]
async fn test_malformed_file_id_is_a_json_bad_request() {
    let Some(app) = TestApp::try_new().await else {
        return;
    };
    let user = app.create_user(1000).await;

    let response = app
        .request("GET", "/api/files/not-a-uuid", None, Some(&user.token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(
        response.body["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("not-a-uuid")),
        "{:?}",
        String::from_utf8_lossy(&response.raw)
    );
}
