use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use ::common::storage::{DEFAULT_IMAGE, FilesystemImageStore};
use reqwest::Client;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tempfile::TempDir;

use listing_server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig};
use listing_server::state::AppState;

/// Origin allowed by the test CORS policy.
pub const FRONT_URL: &str = "http://localhost:3000";

/// Bytes written as `default.jpg` in every test image directory.
pub const PLACEHOLDER: &[u8] = b"placeholder image bytes";

pub mod routes {
    pub const ROOT: &str = "/";
    pub const ITEMS: &str = "/items";

    pub fn item(id: impl std::fmt::Display) -> String {
        format!("/items/{id}")
    }

    pub fn image(name: &str) -> String {
        format!("/images/{name}")
    }

    pub fn image_alias(name: &str) -> String {
        format!("/image/{name}")
    }

    pub fn search(keyword: &str) -> String {
        format!("/search?keyword={keyword}")
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub images_dir: PathBuf,
    _dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Raw HTTP response for binary endpoints.
pub struct BytesResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Expected stored name for an upload: SHA-256 hex plus `.jpg`.
pub fn image_name_for(bytes: &[u8]) -> String {
    format!("{}.jpg", hex::encode(Sha256::digest(bytes)))
}

impl TestApp {
    /// Spawn a server backed by a fresh SQLite file.
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("db/items.sqlite3").display()
        );
        Self::spawn_with(dir, db_url).await
    }

    /// Spawn a server backed by the given database URL.
    pub async fn spawn_with_url(db_url: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        Self::spawn_with(dir, db_url.to_string()).await
    }

    async fn spawn_with(dir: TempDir, db_url: String) -> Self {
        let images_dir = dir.path().join("images");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                log_level: "debug".to_string(),
                cors: CorsConfig {
                    allow_origins: vec![FRONT_URL.to_string()],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: db_url,
                max_connections: 5,
            },
            storage: StorageConfig {
                images_dir: images_dir.clone(),
                max_image_size: 1024 * 1024,
            },
        };

        let images = FilesystemImageStore::new(images_dir.clone(), app_config.storage.max_image_size)
            .await
            .expect("Failed to create image store");
        std::fs::write(images_dir.join(DEFAULT_IMAGE), PLACEHOLDER)
            .expect("Failed to write placeholder image");

        let items = listing_server::repository::connect(&app_config.database)
            .await
            .expect("Failed to connect item repository");

        let state = AppState {
            config: Arc::new(app_config),
            items,
            images: Arc::new(images),
        };

        let app = listing_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            images_dir,
            _dir: dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_bytes(&self, path: &str) -> BytesResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.bytes().await.unwrap_or_default().to_vec();
        BytesResponse {
            status,
            content_type,
            bytes,
        }
    }

    /// POST a multipart item form. `None` fields are omitted from the form.
    pub async fn post_item(
        &self,
        name: Option<&str>,
        category: Option<&str>,
        image: Option<Vec<u8>>,
    ) -> TestResponse {
        let mut form = reqwest::multipart::Form::new();
        if let Some(name) = name {
            form = form.text("name", name.to_string());
        }
        if let Some(category) = category {
            form = form.text("category", category.to_string());
        }
        if let Some(image) = image {
            let part = reqwest::multipart::Part::bytes(image)
                .file_name("upload.jpg")
                .mime_str("image/jpeg")
                .expect("Failed to set MIME type");
            form = form.part("image", part);
        }

        let res = self
            .client
            .post(self.url(routes::ITEMS))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Create an item and assert success.
    pub async fn add_item(&self, name: &str, category: &str, image: &[u8]) {
        let res = self
            .post_item(Some(name), Some(category), Some(image.to_vec()))
            .await;
        assert_eq!(res.status, 200, "add_item failed: {}", res.text);
    }

    /// All items currently listed.
    pub async fn items(&self) -> Vec<Value> {
        let res = self.get(routes::ITEMS).await;
        assert_eq!(res.status, 200, "list items failed: {}", res.text);
        res.items()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn items(&self) -> Vec<Value> {
        self.body["items"]
            .as_array()
            .expect("response body should contain an 'items' array")
            .clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.items()
            .iter()
            .map(|i| i["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }
}
