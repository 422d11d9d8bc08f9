use super::error::{ApiError, ApiResult};
use crate::storage::TokenStore;
use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// JSON-over-HTTP client bound to one base URL.
///
/// Every request carries `Content-Type: application/json` and, when the
/// shared [`TokenStore`] holds a token, `Authorization: Bearer <token>`.
/// There are no retries and no timeouts: a failure is final for the caller.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: TokenStore) -> Self {
        Self::with_http(reqwest::Client::new(), base_url, tokens)
    }

    /// Shares an existing connection pool.
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>, tokens: TokenStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    /// Sends a request and decodes the body. `204 No Content` yields `None`
    /// without reading the body.
    pub async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> ApiResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint);
        debug!(%method, %url, "api request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            debug!(%method, %url, status = status.as_u16(), "api request failed");
            return Err(ApiError::from_error_body(status.as_u16(), &body_text));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Like [`ApiClient::request`] for endpoints that always answer with a body.
    pub async fn request_json<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(method, endpoint, body)
            .await?
            .ok_or(ApiError::EmptyBody)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.request_json::<T, ()>(Method::GET, endpoint, None).await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(Method::POST, endpoint, Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_base_and_endpoint() {
        let client = ApiClient::new("http://localhost:8000/api/", TokenStore::in_memory());
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/"), "http://localhost:8000/api/");
        assert_eq!(client.url("/42/complete"), "http://localhost:8000/api/42/complete");
        assert_eq!(client.url("me"), "http://localhost:8000/api/me");
    }
}
