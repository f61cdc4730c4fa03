use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Errors surfaced by the row store. `Conflict` is load-bearing: the
/// `bookings` table carries partial unique indexes over active rows, so a
/// booking insert that loses a race comes back as HTTP 409 and must stay
/// distinguishable from other failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("authentication rejected by store: {0}")]
    Auth(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
}

pub struct StoreClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None)
            .await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth(error_text),
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                StatusCode::CONFLICT => StoreError::Conflict(error_text),
                _ => StoreError::Api {
                    status: status.as_u16(),
                    message: error_text,
                },
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Insert one row and read it back (`Prefer: return=representation`).
    /// The store assigns `id` and timestamp defaults.
    pub async fn insert_returning<T>(
        &self,
        collection: &str,
        record: Value,
        auth_token: &str,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let path = format!("/rest/v1/{}", collection);
        let mut rows: Vec<T> = self
            .request_with_headers(Method::POST, &path, Some(auth_token), Some(record), Some(headers))
            .await?;

        if rows.is_empty() {
            return Err(StoreError::Api {
                status: 200,
                message: format!("insert into {} returned no representation", collection),
            });
        }
        Ok(rows.remove(0))
    }

    /// Patch one row by id and read the updated row back.
    pub async fn update_returning<T>(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
        auth_token: &str,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        let path = format!("/rest/v1/{}?id=eq.{}", collection, id);
        let mut rows: Vec<T> = self
            .request_with_headers(Method::PATCH, &path, Some(auth_token), Some(patch), Some(headers))
            .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!(
                "no row with id {} in {}",
                id, collection
            )));
        }
        Ok(rows.remove(0))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
