//! Uploads, file serving, category listings and the progress chart.

mod common;

use axum::http::StatusCode;
use common::TestApp;
use reelcoach::store::{ProgressStore, UserStore, VideoStore};
use reelcoach::types::Role;
use reelcoach::uploads::UploadNaming;

#[tokio::test]
async fn test_anonymous_upload_stores_nothing() {
    let app = TestApp::new().await;
    let mut client = app.client();

    let res = client.upload("Fades", "Cutting", "x.mp4", b"data").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location.as_deref(), Some("/login?next=%2Fupload"));

    assert!(app.state.store.list_videos().unwrap().is_empty());
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_employee_upload_stores_nothing() {
    let app = TestApp::new().await;
    let mut employee = app.signed_in("erin", Role::Employee).await;

    let res = employee.upload("Fades", "Cutting", "x.mp4", b"data").await;
    assert_eq!(res.location.as_deref(), Some("/"));

    assert!(app.state.store.list_videos().unwrap().is_empty());
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_owner_upload_records_video() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner.upload("Fades", "Cutting", "fade.mp4", b"frames").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.location.as_deref(), Some("/owner"));

    let videos = app.state.store.list_videos().unwrap();
    assert_eq!(videos.len(), 1);
    let video = &videos[0];
    assert_eq!(video.title, "Fades");
    assert_eq!(video.description, "Watch closely");
    assert_eq!(video.category, "Cutting");
    assert!(video.filename.ends_with("-fade.mp4"));
    assert_eq!(app.upload_files(), vec![video.filename.clone()]);

    let page = owner.get("/owner").await;
    let html = page.text();
    assert!(html.contains("Video uploaded."));
    assert!(html.contains("Fades"));
    assert!(html.contains(&video.filename));
}

#[tokio::test]
async fn test_verbatim_reupload_replaces_file_and_record() {
    let app = TestApp::with_naming(UploadNaming::Verbatim).await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    owner.upload("First take", "Cutting", "x.mp4", b"first").await;
    owner.upload("Second take", "Colour", "x.mp4", b"second").await;

    let videos = app.state.store.list_videos().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].filename, "x.mp4");
    assert_eq!(videos[0].title, "Second take");
    assert_eq!(videos[0].category, "Colour");

    let res = owner.get("/uploads/x.mp4").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, b"second");
}

#[tokio::test]
async fn test_unique_naming_keeps_both_uploads() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    owner.upload("First take", "Cutting", "x.mp4", b"first").await;
    owner.upload("Second take", "Cutting", "x.mp4", b"second").await;

    let videos = app.state.store.list_videos().unwrap();
    assert_eq!(videos.len(), 2);
    assert_ne!(videos[0].filename, videos[1].filename);
    assert_eq!(app.upload_files().len(), 2);
}

#[tokio::test]
async fn test_upload_name_cannot_escape_upload_dir() {
    let app = TestApp::with_naming(UploadNaming::Verbatim).await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner
        .upload("Sneaky", "Cutting", "../../escape.mp4", b"data")
        .await;
    assert_eq!(res.location.as_deref(), Some("/owner"));

    assert_eq!(app.upload_files(), vec!["escape.mp4".to_string()]);
    assert!(!app.temp_dir.path().join("escape.mp4").exists());
}

#[tokio::test]
async fn test_upload_without_file_rerenders_form() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner
        .post_multipart(
            "/upload",
            &[
                ("title", "Fades"),
                ("description", ""),
                ("category", "Cutting"),
            ],
            Some(("", b"".as_slice())),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text().contains("No file selected."));

    assert!(app.state.store.list_videos().unwrap().is_empty());
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_upload_missing_title_is_bad_request() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner
        .post_multipart(
            "/upload",
            &[("category", "Cutting")],
            Some(("x.mp4", b"data".as_slice())),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_upload_missing_description_is_bad_request() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner
        .post_multipart(
            "/upload",
            &[("title", "Fades"), ("category", "Cutting")],
            Some(("x.mp4", b"data".as_slice())),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.text().contains("description"));
    assert!(app.state.store.list_videos().unwrap().is_empty());
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_upload_with_empty_description_is_recorded() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner
        .post_multipart(
            "/upload",
            &[
                ("title", "Fades"),
                ("description", ""),
                ("category", "Cutting"),
            ],
            Some(("x.mp4", b"data".as_slice())),
        )
        .await;
    assert_eq!(res.location.as_deref(), Some("/owner"));

    let videos = app.state.store.list_videos().unwrap();
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].description, "");
}

#[tokio::test]
async fn test_upload_over_size_cap_is_rejected() {
    let app = TestApp::with_max_upload_bytes(256).await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let res = owner
        .upload("Too long", "Cutting", "big.mp4", &[0u8; 4096])
        .await;
    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);

    assert!(app.state.store.list_videos().unwrap().is_empty());
    assert!(app.upload_files().is_empty());
}

#[tokio::test]
async fn test_category_is_stored_and_listed_verbatim() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;
    owner.upload("Fades", " Cutting ", "fade.mp4", b"1").await;

    let videos = app.state.store.list_videos().unwrap();
    assert_eq!(videos[0].category, " Cutting ");
    assert_eq!(
        app.state
            .store
            .list_videos_by_category(" Cutting ")
            .unwrap()
            .len(),
        1
    );
    assert!(
        app.state
            .store
            .list_videos_by_category("Cutting")
            .unwrap()
            .is_empty()
    );

    let page = app.client().get("/videos/%20Cutting%20").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("Fades"));

    let page = app.client().get("/videos/Cutting").await;
    assert!(!page.text().contains("Fades"));
}

#[tokio::test]
async fn test_serving_files_requires_login() {
    let app = TestApp::with_naming(UploadNaming::Verbatim).await;
    let mut owner = app.signed_in("olga", Role::Owner).await;
    owner.upload("Fades", "Cutting", "fade.mp4", b"frames").await;

    let res = app.client().get("/uploads/fade.mp4").await;
    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(
        res.location.as_deref(),
        Some("/login?next=%2Fuploads%2Ffade.mp4")
    );

    let mut employee = app.signed_in("erin", Role::Employee).await;
    let res = employee.get("/uploads/fade.mp4").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type.as_deref(), Some("video/mp4"));
    assert_eq!(res.body, b"frames");
}

#[tokio::test]
async fn test_serving_unknown_or_unsafe_names_is_not_found() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    for path in [
        "/uploads/missing.mp4",
        "/uploads/..%2Freelcoach.db",
        "/uploads/.incoming",
    ] {
        let res = owner.get(path).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_employee_browses_categories() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;
    owner.upload("Fades", "Hair cut", "fade.mp4", b"1").await;
    owner.upload("Blends", "Colour", "blend.mp4", b"2").await;
    owner.upload("Tapers", "Hair cut", "taper.mp4", b"3").await;

    let mut employee = app.signed_in("erin", Role::Employee).await;
    let page = employee.get("/employee").await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.text();
    assert!(html.contains("href=\"/videos/Hair%20cut\""));
    assert!(html.contains("href=\"/videos/Colour\""));
    assert_eq!(html.matches("href=\"/videos/Hair%20cut\"").count(), 1);

    let page = employee.get("/videos/Hair%20cut").await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.text();
    assert!(html.contains("Fades"));
    assert!(html.contains("Tapers"));
    assert!(!html.contains("Blends"));
}

#[tokio::test]
async fn test_category_listing_is_public() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;
    owner.upload("Fades", "Cutting", "fade.mp4", b"1").await;

    let page = app.client().get("/videos/Cutting").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("Fades"));

    let empty = app.client().get("/videos/Nothing").await;
    assert_eq!(empty.status, StatusCode::OK);
    assert!(empty.text().contains("No videos in this category."));
}

#[tokio::test]
async fn test_mark_watched_records_progress() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;
    owner.upload("Fades", "Cutting", "fade.mp4", b"1").await;
    let video = app.state.store.list_videos().unwrap().remove(0);

    let mut employee = app.signed_in("erin", Role::Employee).await;
    let path = format!("/progress/{}", video.id);
    let res = employee.post_form(&path, &[]).await;
    assert_eq!(res.location.as_deref(), Some("/videos/Cutting"));

    // marking twice keeps a single row
    employee.post_form(&path, &[]).await;

    let erin = app
        .state
        .store
        .get_user_by_username("erin")
        .unwrap()
        .unwrap();
    let progress = app.state.store.list_user_progress(&erin.id).unwrap();
    assert_eq!(progress.len(), 1);
    assert!(progress[0].watched);

    let page = employee.get("/videos/Cutting").await;
    assert!(page.text().contains("(watched)"));

    let res = employee.post_form("/progress/no-such-video", &[]).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_progress_page_renders_chart() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;
    owner.upload("Fades", "Cutting", "fade.mp4", b"1").await;
    owner.upload("Blends", "Colour", "blend.mp4", b"2").await;

    let mut employee = app.signed_in("erin", Role::Employee).await;
    let page = employee.get("/progress").await;
    assert_eq!(page.status, StatusCode::OK);

    let html = page.text();
    assert!(html.contains("Video Progress"));
    assert!(html.contains("Number of videos"));
    assert!(html.contains("data:image/png;base64,"));
    assert!(html.contains("<td>Watched</td><td>2</td>"));
    assert!(html.contains("<td>Not Watched</td><td>0</td>"));
}

#[tokio::test]
async fn test_progress_page_with_empty_catalog() {
    let app = TestApp::new().await;
    let mut owner = app.signed_in("olga", Role::Owner).await;

    let page = owner.get("/progress").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.text().contains("<td>Watched</td><td>0</td>"));
}
