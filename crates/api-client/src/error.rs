use reqwest::StatusCode;

/// Errors returned by the API client and services.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401. The session is no longer accepted.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend answered with another non-success status.
    #[error("request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response whose body did not match the expected shape.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The operation has no backend route. Retrying will never help.
    #[error("{0} endpoint not implemented")]
    NotImplemented(&'static str),

    /// The backend reported `success: false`.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Stored credential cannot be sent as a header value.
    #[error("stored credential is not a valid header value")]
    InvalidCredential,

    #[error("invalid input: {0}")]
    Validation(#[from] rx_core::ValidationErrors),

    #[error("client error: {0}")]
    Core(#[from] rx_core::CoreError),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ApiError::NotImplemented(_))
    }

    /// Whether repeating the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            ApiError::Unauthorized(_)
            | ApiError::Decode { .. }
            | ApiError::NotImplemented(_)
            | ApiError::Rejected(_)
            | ApiError::InvalidCredential
            | ApiError::Validation(_)
            | ApiError::Core(_) => false,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
