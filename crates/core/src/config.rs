//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the API client and
//! storage. Nothing below reads environment variables while requests are in flight; the
//! binary reads the environment and hands the raw values to [`ClientConfig::from_env_values`].

use crate::constants::{
    API_PREFIX, DEFAULT_BACKEND_URI, DEFAULT_DATA_DIR, DEFAULT_HTTP_TIMEOUT_SECS,
    STORAGE_FILE_NAME,
};
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    backend_uri: Url,
    api_base: Url,
    data_dir: PathBuf,
    http_timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// `backend_uri` must be an absolute `http`/`https` URL. A trailing slash is added if
    /// missing so the API prefix joins underneath it rather than replacing the last segment.
    pub fn new(backend_uri: &str, data_dir: PathBuf, http_timeout: Duration) -> CoreResult<Self> {
        let trimmed = backend_uri.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidUrl("backend URI cannot be empty".into()));
        }

        let mut backend_uri = Url::parse(trimmed)
            .map_err(|e| CoreError::InvalidUrl(format!("'{trimmed}': {e}")))?;

        if !matches!(backend_uri.scheme(), "http" | "https") {
            return Err(CoreError::InvalidUrl(format!(
                "backend URI must use http or https, got: {}",
                backend_uri.scheme()
            )));
        }

        if !backend_uri.path().ends_with('/') {
            let path = format!("{}/", backend_uri.path());
            backend_uri.set_path(&path);
        }

        let api_base = backend_uri
            .join(API_PREFIX)
            .map_err(|e| CoreError::InvalidUrl(e.to_string()))?;

        if http_timeout.is_zero() {
            return Err(CoreError::InvalidInput(
                "HTTP timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            backend_uri,
            api_base,
            data_dir,
            http_timeout,
        })
    }

    /// Build a config from optional raw environment values.
    ///
    /// `None`, empty or whitespace-only values fall back to the defaults in
    /// [`crate::constants`].
    pub fn from_env_values(
        backend_uri: Option<String>,
        data_dir: Option<String>,
        http_timeout_secs: Option<String>,
    ) -> CoreResult<Self> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let backend_uri = non_blank(backend_uri).unwrap_or_else(|| DEFAULT_BACKEND_URI.into());
        let data_dir = non_blank(data_dir).unwrap_or_else(|| DEFAULT_DATA_DIR.into());
        let timeout_secs = match non_blank(http_timeout_secs) {
            Some(v) => v.parse::<u64>().map_err(|_| {
                CoreError::InvalidInput(format!("RX_HTTP_TIMEOUT_SECS is not a number: {v}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Self::new(
            &backend_uri,
            PathBuf::from(data_dir),
            Duration::from_secs(timeout_secs),
        )
    }

    pub fn backend_uri(&self) -> &Url {
        &self.backend_uri
    }

    /// Base URL every API route is resolved against (`<backend>/api/v1/`).
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the persistent storage document.
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE_NAME)
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Resolve a static route such as `prescriptions/medicines` against the API base.
    pub fn endpoint(&self, route: &str) -> CoreResult<Url> {
        self.api_base
            .join(route)
            .map_err(|e| CoreError::InvalidUrl(format!("route '{route}': {e}")))
    }

    /// Resolve a route with trailing dynamic segments.
    ///
    /// Each segment is percent-encoded as a single path segment, so an id containing `/`
    /// or `?` cannot escape into another route.
    pub fn endpoint_with_segments(&self, route: &str, segments: &[&str]) -> CoreResult<Url> {
        let mut url = self.endpoint(route)?;
        url.path_segments_mut()
            .map_err(|_| CoreError::InvalidUrl("API base cannot have path segments".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
