//! Shared HTTP client.
//!
//! Every backend call goes through one [`ApiClient`]. Before each request it reads the
//! current credential from the session and, when present, sends it verbatim in the
//! `Authorization` header. Responses are decoded from the JSON envelope; a 401 becomes
//! [`ApiError::Unauthorized`] and is left to the caller.

use crate::{ApiError, ApiResult};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use rx_core::{ClientConfig, SessionContext};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
    session: SessionContext,
}

impl ApiClient {
    /// Build the client from startup configuration and the session it reads the token from.
    pub fn new(config: Arc<ClientConfig>, session: SessionContext) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            session,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn endpoint(&self, route: &str) -> ApiResult<Url> {
        Ok(self.config.endpoint(route)?)
    }

    pub fn endpoint_with_segments(&self, route: &str, segments: &[&str]) -> ApiResult<Url> {
        Ok(self.config.endpoint_with_segments(route, segments)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let request = self.http.get(url.clone());
        self.send(request, &url).await
    }

    pub async fn get_with_query<Q, T>(&self, url: Url, query: &Q) -> ApiResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.get(url.clone()).query(query);
        self.send(request, &url).await
    }

    pub async fn post<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(url.clone()).json(body);
        self.send(request, &url).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> ApiResult<T> {
        let request = self.authorize(request)?;
        tracing::debug!("request {}", url);

        let response = request.send().await.map_err(|e| {
            tracing::warn!("request to {} failed: {}", url, e);
            ApiError::Transport(e)
        })?;

        handle_response(url, response).await
    }

    fn authorize(&self, request: RequestBuilder) -> ApiResult<RequestBuilder> {
        let Some(token) = self.session.token() else {
            return Ok(request);
        };
        let mut value = HeaderValue::from_str(&token).map_err(|_| ApiError::InvalidCredential)?;
        value.set_sensitive(true);
        Ok(request.header(AUTHORIZATION, value))
    }
}

async fn handle_response<T: DeserializeOwned>(url: &Url, response: Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await?;

    match status {
        status if status.is_success() => {
            serde_json::from_str(&body).map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
        }
        StatusCode::UNAUTHORIZED => {
            tracing::warn!("{} answered 401", url);
            Err(ApiError::Unauthorized(error_message(&body)))
        }
        status => {
            tracing::warn!("{} answered {}", url, status);
            Err(ApiError::Status {
                url: url.to_string(),
                status,
                body,
            })
        }
    }
}

// envelope message if the body is one, otherwise the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| body.to_string())
}
