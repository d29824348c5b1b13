//! Constants used throughout the prescription client crates.
//!
//! Route fragments, storage keys and defaults live here so the client, the views and the
//! stub backend agree on them.

/// Backend address used when `RX_BACKEND_URI` is not set.
pub const DEFAULT_BACKEND_URI: &str = "http://localhost:8000/";

/// Path prefix of the versioned API under the backend address.
pub const API_PREFIX: &str = "api/v1/";

/// Default directory for client-side persistent state.
pub const DEFAULT_DATA_DIR: &str = "rx_data";

/// Filename of the persistent storage document inside the data directory.
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Persistent storage key for the credential token.
pub const TOKEN_KEY: &str = "token";

/// Storage key for the signed-in user profile.
pub const USER_KEY: &str = "user";

/// Client-side route of the login screen.
pub const LOGIN_ROUTE: &str = "/login";

/// Client-side route of the dashboard.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Default page size for `get_prescriptions`.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Page size the history view requests.
pub const HISTORY_PAGE_LIMIT: u32 = 50;

/// Backend API routes, relative to the API base.
pub mod routes {
    pub const LOGIN: &str = "auth/login";
    pub const PRESCRIPTIONS: &str = "prescriptions";
    pub const MEDICINES: &str = "prescriptions/medicines";
    pub const MOCK_PATIENT: &str = "prescriptions/patient/mock";
    pub const ISSUE: &str = "prescriptions/issue";
}
