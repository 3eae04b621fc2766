use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;

use media_feed_service::configure_routes;
use media_feed_service::db::{JsonFileStore, MetadataStore};
use media_feed_service::services::{FeedService, MediaStorage};

const BOUNDARY: &str = "----media-feed-test-boundary";

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    body: &'a [u8],
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    part.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(part.body);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(parts: &[Part<'_>]) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/post")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(parts))
}

fn file_part<'a>(filename: &'a str, body: &'a [u8]) -> Part<'a> {
    Part {
        name: "file",
        filename: Some(filename),
        body,
    }
}

async fn build_state(max_upload_bytes: usize) -> (web::Data<FeedService>, JsonFileStore, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("posts_metadata.json"))
        .await
        .expect("metadata store");
    let media = MediaStorage::open(dir.path().join("uploads"))
        .await
        .expect("media storage");
    let service = FeedService::new(Arc::new(store.clone()), media)
        .with_max_upload_bytes(max_upload_bytes);
    (web::Data::new(service), store, dir)
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(configure_routes)).await
    };
}

fn upload_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path().join("uploads"))
        .expect("uploads dir")
        .count()
}

#[actix_web::test]
async fn upload_then_feed_returns_fresh_record() {
    let (state, _store, dir) = build_state(1024).await;
    let app = init_app!(state);

    let req = upload_request(&[
        file_part("Trailer.MP4", b"fake-video"),
        Part {
            name: "author",
            filename: None,
            body: b"alice",
        },
        Part {
            name: "caption",
            filename: None,
            body: b"first cut",
        },
    ])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Upload successful!");
    let id = body["id"].as_str().expect("id").to_string();
    assert!(id.chars().all(|c| c.is_ascii_digit()));

    let req = test::TestRequest::get().uri("/api/feed").to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    let posts = feed.as_array().expect("array");
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], id.as_str());
    assert_eq!(posts[0]["filename"], format!("{id}.mp4"));
    assert_eq!(posts[0]["author"], "alice");
    assert_eq!(posts[0]["caption"], "first cut");
    assert_eq!(posts[0]["is_audio"], false);
    assert_eq!(posts[0]["views"], 0);
    assert_eq!(posts[0]["likes"], 0);
    assert_eq!(upload_count(&dir), 1);
}

#[actix_web::test]
async fn upload_with_disallowed_extension_is_rejected() {
    let (state, store, dir) = build_state(1024).await;
    let app = init_app!(state);

    let req = upload_request(&[file_part("notes.txt", b"hello")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Invalid file type. Only video/audio files are allowed."
    );
    assert!(store.load().await.unwrap().is_empty());
    assert_eq!(upload_count(&dir), 0);
}

#[actix_web::test]
async fn upload_without_file_part_is_missing_file() {
    let (state, _store, _dir) = build_state(1024).await;
    let app = init_app!(state);

    let req = upload_request(&[Part {
        name: "caption",
        filename: None,
        body: b"no file here",
    }])
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part in the request.");

    let req = test::TestRequest::post()
        .uri("/api/post")
        .set_json(serde_json::json!({"file": "nope"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No file part in the request.");
}

#[actix_web::test]
async fn upload_with_empty_filename_is_missing_file() {
    let (state, _store, _dir) = build_state(1024).await;
    let app = init_app!(state);

    let req = upload_request(&[file_part("", b"")]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No selected file.");
}

#[actix_web::test]
async fn oversized_upload_is_rejected_without_side_effects() {
    let (state, store, dir) = build_state(8).await;
    let app = init_app!(state);

    let req = upload_request(&[file_part("big.mov", &[0u8; 64])]).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.load().await.unwrap().is_empty());
    assert_eq!(upload_count(&dir), 0);
}

#[actix_web::test]
async fn fetching_a_post_counts_views() {
    let (state, _store, _dir) = build_state(1024).await;
    let app = init_app!(state);
    let id = state
        .create_post(media_feed_service::models::UploadForm {
            filename: Some("tune.mp3".into()),
            data: b"ID3".to_vec(),
            author: None,
            caption: None,
        })
        .await
        .unwrap();

    for expected in 1..=3u64 {
        let req = test::TestRequest::get()
            .uri(&format!("/api/post/{id}"))
            .to_request();
        let post: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(post["views"], expected);
        assert_eq!(post["is_audio"], true);
        assert_eq!(post["author"], "Anonymous");
        assert_eq!(post["caption"], "(no caption)");
    }

    let req = test::TestRequest::get()
        .uri("/api/post/does-not-exist")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post not found.");
}

#[actix_web::test]
async fn liking_twice_counts_two_and_unknown_id_is_404() {
    let (state, store, _dir) = build_state(1024).await;
    let app = init_app!(state);
    let req = upload_request(&[file_part("clip.webm", b"webm")]).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["id"].as_str().unwrap().to_string();

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/api/like/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Like registered successfully.");
    }

    let before = store.load().await.unwrap();
    assert_eq!(before[0].likes, 2);

    let req = test::TestRequest::post().uri("/api/like/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.load().await.unwrap(), before);
}

#[actix_web::test]
async fn comment_is_attached_to_post() {
    let (state, store, _dir) = build_state(1024).await;
    let app = init_app!(state);
    let req = upload_request(&[file_part("clip.mov", b"mov")]).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/comment/{id}"))
        .set_json(serde_json::json!({"author": "bob", "text": "great"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/comment/{id}"))
        .set_json(serde_json::json!({"text": ""}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let records = store.load().await.unwrap();
    assert_eq!(records[0].comments.len(), 1);
    assert_eq!(records[0].comments[0].author, "bob");
}

#[actix_web::test]
async fn media_is_streamed_with_content_type() {
    let (state, _store, _dir) = build_state(1024).await;
    let app = init_app!(state);
    let req = upload_request(&[file_part("voice.wav", b"RIFF-data")]).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/media/{id}.wav"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("audio/"), "got {content_type}");
    assert_eq!(test::read_body(resp).await.as_ref(), b"RIFF-data");

    let req = test::TestRequest::get()
        .uri("/api/media/missing.mp4")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Media file not found.");
}

#[actix_web::test]
async fn traversal_names_are_not_served() {
    let (state, _store, dir) = build_state(1024).await;
    let app = init_app!(state);
    std::fs::write(dir.path().join("posts_secret.json"), "{}").unwrap();

    let req = test::TestRequest::get()
        .uri("/api/media/..%2Fposts_secret.json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn metadata_file_survives_restart() {
    let (state, _store, dir) = build_state(1024).await;
    let app = init_app!(state);
    let req = upload_request(&[file_part("a.mp4", b"1")]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let reopened = JsonFileStore::open(dir.path().join("posts_metadata.json"))
        .await
        .unwrap();
    let records = reopened.load().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].views, 0);
}

#[actix_web::test]
async fn unknown_record_fields_are_kept_through_reads_and_rewrites() {
    let (state, _store, dir) = build_state(1024).await;
    let metadata = dir.path().join("posts_metadata.json");
    std::fs::write(
        &metadata,
        r#"[{"id": "1", "filename": "1.mp4", "author": "a", "caption": "c",
            "is_audio": false, "timestamp": "2024-01-01T00:00:00", "media_url": "/x"}]"#,
    )
    .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/feed").to_request();
    let feed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(feed[0]["media_url"], "/x");

    let req = test::TestRequest::post().uri("/api/like/1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let on_disk: Value = serde_json::from_slice(&std::fs::read(&metadata).unwrap()).unwrap();
    assert_eq!(on_disk[0]["media_url"], "/x");
    assert_eq!(on_disk[0]["likes"], 1);
}

#[actix_web::test]
async fn health_reports_ok() {
    let (state, _store, _dir) = build_state(1024).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}
