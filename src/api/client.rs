use super::models::{Post, User};
use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Read-mostly client for the remote posts API.
///
/// No auth and no server-side pagination: callers get the whole collection
/// and slice it themselves.
#[derive(Debug, Clone)]
pub struct PostsClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: impl Into<String>) -> StoreResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("todo-store/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(StoreError::transport)?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get_posts(&self) -> StoreResult<Vec<Post>> {
        self.get_json("posts").await
    }

    pub async fn get_post(&self, id: u64) -> StoreResult<Post> {
        self.get_json(&format!("posts/{id}")).await
    }

    pub async fn get_users(&self) -> StoreResult<Vec<User>> {
        self.get_json("users").await
    }

    pub async fn get_user(&self, id: u64) -> StoreResult<User> {
        self.get_json(&format!("users/{id}")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(StoreError::transport)?;
        response.json::<T>().await.map_err(StoreError::transport)
    }
}
