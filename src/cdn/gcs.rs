//! Google Cloud Storage JSON API client.

use std::fs::File;
use std::path::Path;

use reqwest::StatusCode;
use reqwest::blocking::{Body, Client};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use tracing::debug;

use crate::cdn::auth;
use crate::cdn::credentials::ServiceAccountKey;
use crate::cdn::store::{ObjectStore, PutOutcome, RemoteObject};
use crate::error::{ModkitError, Result};

pub const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com";
pub const DEFAULT_BUCKET: &str = "apps-cdn-bucket-cognitedata-production";

const CLIENT_AGENT: &str = "modkit";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<ObjectResource>,
    #[serde(rename = "nextPageToken", default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResource {
    name: String,
    // The JSON API encodes uint64 as a string.
    #[serde(default)]
    size: Option<String>,
}

/// Guess a content type from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("txt" | "md") => "text/plain",
        Some("csv") => "text/csv",
        Some("yaml" | "yml") => "application/yaml",
        Some("toml") => "application/toml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

pub struct GcsClient {
    http: Client,
    endpoint: String,
    bucket: String,
    token: String,
}

impl std::fmt::Debug for GcsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsClient")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl GcsClient {
    /// Authenticate with `key` and return a client bound to `bucket`.
    pub fn connect(key: &ServiceAccountKey, endpoint: &str, bucket: &str) -> Result<Self> {
        let http = Client::new();
        let token = auth::fetch_access_token(&http, key)?;
        debug!(client_email = %key.client_email, "authenticated with service account");
        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            token: token.access_token,
        })
    }

    /// Client with a pre-issued bearer token.
    pub fn with_token(endpoint: &str, bucket: &str, token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.to_string(),
            token: token.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(key)
        )
    }

    fn upload_url(&self, key: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o?uploadType=media&ifGenerationMatch=0&name={}",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(key)
        )
    }

    fn list_url(&self, prefix: &str, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/storage/v1/b/{}/o?prefix={}&fields=items(name,size),nextPageToken",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            urlencoding::encode(prefix)
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&urlencoding::encode(token));
        }
        url
    }
}

impl ObjectStore for GcsClient {
    fn exists(&self, key: &str) -> Result<bool> {
        let url = format!("{}?fields=name", self.object_url(key));
        debug!(%url, "GET object metadata");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(USER_AGENT, CLIENT_AGENT)
            .send()?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ModkitError::Transport {
                operation: format!("check {key}"),
                status: status.as_u16(),
            }),
        }
    }

    fn upload_file(&self, key: &str, path: &Path) -> Result<PutOutcome> {
        let file = File::open(path).map_err(ModkitError::fs("open", path))?;
        let len = file.metadata().map_err(ModkitError::fs("stat", path))?.len();

        let url = self.upload_url(key);
        debug!(%url, bytes = len, "POST object upload");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(USER_AGENT, CLIENT_AGENT)
            .header(CONTENT_TYPE, content_type_for(path))
            .body(Body::sized(file, len))
            .send()?;

        let status = response.status();
        if status == StatusCode::PRECONDITION_FAILED {
            return Ok(PutOutcome::AlreadyExists);
        }
        if !status.is_success() {
            return Err(ModkitError::Transport {
                operation: format!("upload {key}"),
                status: status.as_u16(),
            });
        }
        Ok(PutOutcome::Created)
    }

    fn list(&self, prefix: &str) -> Result<Vec<RemoteObject>> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let url = self.list_url(prefix, page_token.as_deref());
            debug!(%url, "GET object listing");
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .header(USER_AGENT, CLIENT_AGENT)
                .send()?;

            let status = response.status();
            if !status.is_success() {
                return Err(ModkitError::Transport {
                    operation: format!("list {prefix}"),
                    status: status.as_u16(),
                });
            }

            let page: ListResponse = response.json()?;
            objects.extend(page.items.into_iter().map(|item| RemoteObject {
                size: item
                    .size
                    .as_deref()
                    .and_then(|size| size.parse().ok())
                    .unwrap_or(0),
                name: item.name,
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        objects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(objects)
    }
}
