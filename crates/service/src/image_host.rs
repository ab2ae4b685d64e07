//! Client for an ImgBB-compatible image host.
//!
//! Each file is posted as multipart field `image` to `{url}?key={api_key}`;
//! the host answers `{ success, data: { url }, error: { message } }`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use configs::ImageHostConfig;
use crate::errors::ServiceError;

/// One uploaded file buffered in memory.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload every file and return hosted URLs in input order.
    async fn upload(&self, files: Vec<ImageFile>) -> Result<Vec<String>, ServiceError>;
}

#[derive(Debug, Deserialize)]
struct HostResponse {
    #[serde(default)]
    success: bool,
    data: Option<HostData>,
    error: Option<HostError>,
}

#[derive(Debug, Deserialize)]
struct HostData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct HostError {
    message: String,
}

pub struct ImgBbClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl ImgBbClient {
    pub fn new(cfg: &ImageHostConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Internal(format!("image host client: {}", e)))?;
        Ok(Self { http, url: cfg.url.clone(), api_key: cfg.api_key.clone() })
    }

    async fn upload_one(&self, file: ImageFile) -> Result<String, ServiceError> {
        let name = file.file_name.clone();
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(ct) = &file.content_type {
            part = part.mime_str(ct).map_err(|e| ServiceError::Validation(format!("bad content type {}: {}", ct, e)))?;
        }
        let form = Form::new().part("image", part);

        let resp = self
            .http
            .post(&self.url)
            .query(&[("key", self.api_key.as_str())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Upstream(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| ServiceError::Upstream(e.to_string()))?;
        let parsed: Option<HostResponse> = serde_json::from_str(&text).ok();

        match parsed {
            Some(HostResponse { success: true, data: Some(data), .. }) if status.is_success() => {
                info!(file = %name, "image_uploaded");
                Ok(data.url)
            }
            Some(HostResponse { error: Some(err), .. }) => {
                warn!(file = %name, status = %status, error = %err.message, "image_upload_failed");
                Err(ServiceError::Upstream(err.message))
            }
            _ => {
                warn!(file = %name, status = %status, "image_upload_failed");
                Err(ServiceError::Upstream(format!("image host responded with {}", status)))
            }
        }
    }
}

#[async_trait]
impl ImageHost for ImgBbClient {
    async fn upload(&self, files: Vec<ImageFile>) -> Result<Vec<String>, ServiceError> {
        if files.is_empty() {
            return Err(ServiceError::Validation("no images to upload".into()));
        }
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            urls.push(self.upload_one(file).await?);
        }
        Ok(urls)
    }
}

/// Offline host returning deterministic URLs; counts uploaded files.
#[derive(Default)]
pub struct StubImageHost {
    uploaded: AtomicUsize,
}

impl StubImageHost {
    pub fn uploaded(&self) -> usize { self.uploaded.load(Ordering::SeqCst) }
}

#[async_trait]
impl ImageHost for StubImageHost {
    async fn upload(&self, files: Vec<ImageFile>) -> Result<Vec<String>, ServiceError> {
        if files.is_empty() {
            return Err(ServiceError::Validation("no images to upload".into()));
        }
        Ok(files
            .into_iter()
            .map(|f| {
                let n = self.uploaded.fetch_add(1, Ordering::SeqCst);
                format!("https://images.invalid/{}/{}", n, f.file_name)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use axum::{extract::{Multipart, Query}, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn fake_upload(Query(q): Query<HashMap<String, String>>, mut mp: Multipart) -> (StatusCode, Json<Value>) {
        if q.get("key").map(String::as_str) != Some("test-key") {
            return (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "error": { "message": "Invalid API v1 key." } })));
        }
        while let Ok(Some(field)) = mp.next_field().await {
            if field.name() == Some("image") {
                let name = field.file_name().unwrap_or("unnamed").to_string();
                let bytes = field.bytes().await.unwrap_or_default();
                if bytes.is_empty() {
                    break;
                }
                return (StatusCode::OK, Json(json!({ "success": true, "data": { "url": format!("https://i.ibb.test/{}", name) } })));
            }
        }
        (StatusCode::BAD_REQUEST, Json(json!({ "success": false, "error": { "message": "Empty upload source." } })))
    }

    async fn spawn_fake_host() -> String {
        let app = Router::new().route("/upload", post(fake_upload));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{}/upload", addr)
    }

    fn client(url: String, key: &str) -> ImgBbClient {
        ImgBbClient::new(&ImageHostConfig { url, api_key: key.into(), timeout_secs: 5 }).unwrap()
    }

    fn png(name: &str) -> ImageFile {
        ImageFile { file_name: name.into(), content_type: Some("image/png".into()), bytes: vec![0x89, b'P', b'N', b'G'] }
    }

    #[tokio::test]
    async fn uploads_in_order() {
        let url = spawn_fake_host().await;
        let urls = client(url, "test-key").upload(vec![png("a.png"), png("b.png")]).await.unwrap();
        assert_eq!(urls, vec!["https://i.ibb.test/a.png", "https://i.ibb.test/b.png"]);
    }

    #[tokio::test]
    async fn host_error_message_is_carried() {
        let url = spawn_fake_host().await;
        let err = client(url, "wrong").upload(vec![png("a.png")]).await.unwrap_err();
        match err {
            ServiceError::Upstream(msg) => assert_eq!(msg, "Invalid API v1 key."),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_input_is_validation_error() {
        let err = client("http://127.0.0.1:9/upload".into(), "k").upload(vec![]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn stub_counts_uploads() {
        let stub = StubImageHost::default();
        let urls = stub.upload(vec![png("x.png"), png("y.png")]).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[1].ends_with("/1/y.png"));
        assert_eq!(stub.uploaded(), 2);
    }
}
