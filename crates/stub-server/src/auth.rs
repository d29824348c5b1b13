//! Token minting and the per-handler credential check.

use crate::state::StubState;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rx_core::{ApiResponse, UserProfile};

/// Error response in the backend's envelope shape.
pub type Rejection = (StatusCode, Json<ApiResponse<()>>);

pub fn reject(status: StatusCode, message: impl Into<String>) -> Rejection {
    (status, Json(ApiResponse::failure(message)))
}

/// Mint an unsigned JWT-shaped token carrying `sub` and `exp`.
pub fn issue_token(user: &UserProfile, ttl: chrono::Duration) -> String {
    let header = serde_json::json!({"alg": "none", "typ": "JWT"});
    let claims = serde_json::json!({
        "sub": user.id.to_string(),
        "exp": (chrono::Utc::now() + ttl).timestamp(),
        "jti": uuid::Uuid::new_v4().to_string(),
    });
    format!(
        "{}.{}.stub",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// The `Authorization` header must carry a token this server issued, sent as-is.
pub fn require_token(state: &StubState, headers: &HeaderMap) -> Result<(), Rejection> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Missing authorization token"))?;

    if state.is_known_token(token) {
        Ok(())
    } else {
        tracing::warn!("refused unknown token");
        Err(reject(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StubConfig;
    use axum::http::HeaderValue;

    #[test]
    fn token_has_three_segments_and_future_expiry() {
        let config = StubConfig::default();
        let token = issue_token(&config.user, chrono::Duration::hours(1));
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(parts[1]).unwrap()).unwrap();
        assert_eq!(claims["sub"], "1");
        assert!(claims["exp"].as_i64().unwrap() > chrono::Utc::now().timestamp());
    }

    #[test]
    fn require_token_checks_header() {
        let state = StubState::new(StubConfig::default());
        let mut headers = HeaderMap::new();
        let (status, _) = require_token(&state, &headers).unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("made-up"));
        assert!(require_token(&state, &headers).is_err());

        let login = state
            .login(&rx_core::LoginRequest {
                email: state.config().email.clone(),
                password: state.config().password.clone(),
            })
            .unwrap();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&login.token).unwrap());
        assert!(require_token(&state, &headers).is_ok());
    }
}
