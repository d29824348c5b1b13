//! Login and logout.

use crate::{ApiClient, ApiError, ApiResult};
use rx_core::constants::routes;
use rx_core::{validate_login, ApiResponse, LoginData, LoginForm, UserProfile};

#[derive(Debug, Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Validate the form, exchange the credentials for a token and store the session.
    ///
    /// On any failure the stored session is left untouched.
    pub async fn login(&self, form: &LoginForm) -> ApiResult<UserProfile> {
        let request = validate_login(form)?;
        let url = self.client.endpoint(routes::LOGIN)?;

        let response: ApiResponse<LoginData> = match self.client.post(url, &request).await {
            Ok(response) => response,
            // the backend answers 401 for bad credentials
            Err(ApiError::Unauthorized(message)) => return Err(ApiError::Rejected(message)),
            Err(e) => return Err(e),
        };

        let message = response.message.clone();
        let Some(data) = response.into_success() else {
            tracing::warn!("login rejected for {}", request.email);
            return Err(ApiError::Rejected(message));
        };

        self.client.session().sign_in(&data.token, &data.user)?;
        Ok(data.user)
    }

    /// Drop the credential and every other locally stored value.
    pub fn logout(&self) -> ApiResult<()> {
        self.client.session().sign_out()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_core::{ClientConfig, SessionContext};
    use rx_storage::Storage;
    use rx_stub::{StubConfig, StubServer};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    async fn setup() -> (StubServer, AuthService, SessionContext) {
        let server = rx_stub::spawn(StubConfig::default()).await.unwrap();
        let config = ClientConfig::new(
            &server.base_uri(),
            PathBuf::from("unused"),
            Duration::from_secs(5),
        )
        .unwrap();
        let session = SessionContext::new(Arc::new(Storage::in_memory()));
        let client = ApiClient::new(Arc::new(config), session.clone()).unwrap();
        (server, AuthService::new(client), session)
    }

    fn credentials() -> LoginForm {
        let defaults = StubConfig::default();
        LoginForm {
            email: defaults.email,
            password: defaults.password,
        }
    }

    #[tokio::test]
    async fn login_stores_token_and_profile() {
        let (_server, auth, session) = setup().await;

        let user = auth.login(&credentials()).await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(user));
        let claims = session.token_claims().expect("stub issues JWT-shaped tokens");
        assert!(claims.exp.is_some());
        assert!(!session.is_token_expired(chrono::Utc::now()));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_and_stores_nothing() {
        let (_server, auth, session) = setup().await;
        let mut form = credentials();
        form.password = "not-the-password".into();

        let err = auth.login(&form).await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let (_server, auth, _session) = setup().await;
        let err = auth
            .login(&LoginForm {
                email: "nobody".into(),
                password: "x".into(),
            })
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let (_server, auth, session) = setup().await;
        auth.login(&credentials()).await.unwrap();

        auth.logout().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
    }
}
