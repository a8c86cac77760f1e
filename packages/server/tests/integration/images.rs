use crate::common::{PLACEHOLDER, TestApp, image_name_for, routes};

#[tokio::test]
async fn uploaded_image_is_served_as_jpeg() {
    let app = TestApp::spawn().await;
    let image = b"\xFF\xD8 pretend jpeg \xFF\xD9".to_vec();
    app.add_item("camera", "electronics", &image).await;

    let res = app.get_bytes(&routes::image(&image_name_for(&image))).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(res.bytes, image);
}

#[tokio::test]
async fn missing_image_falls_back_to_placeholder() {
    let app = TestApp::spawn().await;
    let name = image_name_for(b"never uploaded");

    let res = app.get_bytes(&routes::image(&name)).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(res.bytes, PLACEHOLDER);
}

#[tokio::test]
async fn wrong_suffix_is_rejected_even_if_file_exists() {
    let app = TestApp::spawn().await;
    std::fs::write(app.images_dir.join("photo.png"), b"png bytes").unwrap();

    for name in ["photo.png", "photo.jpeg", "photo"] {
        let res = app.get(&routes::image(name)).await;
        assert_eq!(res.status, 400, "expected 400 for {name}");
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn padded_suffix_does_not_reach_placeholder() {
    let app = TestApp::spawn().await;

    for name in ["default.jpg%20", "%20default.jpg", "default.jpg%09"] {
        let res = app.get_bytes(&routes::image(name)).await;
        assert_eq!(res.status, 400, "expected 400 for {name}");
        assert_ne!(res.bytes, PLACEHOLDER);
    }
}

#[tokio::test]
async fn traversal_outside_image_directory_is_rejected() {
    let app = TestApp::spawn().await;

    // Percent-encoded so the client sends the separator inside the segment.
    let res = app.get(&routes::image("..%2Fsecret.jpg")).await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn singular_alias_serves_same_content() {
    let app = TestApp::spawn().await;
    let image = b"alias bytes".to_vec();
    app.add_item("lamp", "home", &image).await;

    let res = app
        .get_bytes(&routes::image_alias(&image_name_for(&image)))
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.bytes, image);
}
