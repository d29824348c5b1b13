#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("unknown status code: {0}")]
    UnknownStatus(String),
    #[error("unknown delivery type: {0}")]
    UnknownDeliveryType(String),
    #[error("storage error: {0}")]
    Storage(#[from] rx_storage::StorageError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
