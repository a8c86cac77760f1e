use crate::common::{TestApp, routes};

async fn seeded_app() -> TestApp {
    let app = TestApp::spawn().await;
    app.add_item("blue jacket", "fashion", b"blue").await;
    app.add_item("red jacket", "fashion", b"red").await;
    app.add_item("camera", "electronics", b"camera").await;
    app.add_item("50% off mug", "kitchen", b"mug").await;
    app
}

#[tokio::test]
async fn returns_items_containing_keyword() {
    let app = seeded_app().await;

    let res = app.get(&routes::search("jacket")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.names(), vec!["blue jacket", "red jacket"]);

    let res = app.get(&routes::search("came")).await;
    assert_eq!(res.names(), vec!["camera"]);
}

#[tokio::test]
async fn empty_keyword_returns_everything() {
    let app = seeded_app().await;

    let res = app.get(&routes::search("")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.items().len(), 4);
}

#[tokio::test]
async fn unmatched_keyword_returns_empty_envelope() {
    let app = seeded_app().await;

    let res = app.get(&routes::search("sofa")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, serde_json::json!({ "items": [] }));
}

#[tokio::test]
async fn wildcards_in_keyword_match_literally() {
    let app = seeded_app().await;

    // "%25" is a literal percent sign once decoded.
    let res = app.get(&routes::search("0%25")).await;
    assert_eq!(res.names(), vec!["50% off mug"]);

    let res = app.get(&routes::search("_")).await;
    assert!(res.items().is_empty());
}

#[tokio::test]
async fn missing_keyword_is_client_error() {
    let app = seeded_app().await;

    let res = app.get("/search").await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}
