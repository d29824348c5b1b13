//! Application shell: route protection, header profile, logout, and the 401 redirect.
//!
//! The API client reports authorization failure as [`ApiError::Unauthorized`] and does
//! nothing else. Views pass their results through [`AppShell::guard`], which moves the
//! front end to the login screen once per failed call and hands the error back
//! unchanged so the view can still show its own failure state.

use crate::{Navigator, Notice, Notifier, Route};
use chrono::{DateTime, Utc};
use rx_api::{ApiError, ApiResult};
use rx_core::{SessionContext, UserProfile};
use std::sync::Arc;

pub const LOGGED_OUT_MESSAGE: &str = "Logged out successfully";
pub const LOGOUT_FAILED_MESSAGE: &str = "Error during logout";
/// Shown in the header while no profile is stored.
pub const PROFILE_PLACEHOLDER: &str = "Loading...";

#[derive(Clone)]
pub struct AppShell {
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

impl AppShell {
    pub fn new(
        session: SessionContext,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            navigator,
            notifier,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    /// Pass a result through, redirecting to login if it is an authorization failure.
    pub fn guard<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(ApiError::Unauthorized(message)) = &result {
            tracing::warn!("session rejected by backend ({}), redirecting to login", message);
            self.navigator.navigate(Route::Login);
        }
        result
    }

    /// Where a protected screen should go: the dashboard with a live token, login otherwise.
    ///
    /// A token whose `exp` lies before `now` is discarded along with the rest of the
    /// stored state.
    pub fn entry_route(&self, now: DateTime<Utc>) -> Route {
        if !self.session.is_authenticated() {
            return Route::Login;
        }
        if self.session.is_token_expired(now) {
            tracing::info!("stored token has expired");
            if let Err(e) = self.session.sign_out() {
                tracing::warn!("failed to clear expired session: {}", e);
            }
            return Route::Login;
        }
        Route::Dashboard
    }

    /// Profile for the header. A malformed stored profile is discarded.
    pub fn header_profile(&self) -> Option<UserProfile> {
        self.session.user()
    }

    pub fn header_name(&self) -> String {
        self.header_profile()
            .map(|user| user.name)
            .unwrap_or_else(|| PROFILE_PLACEHOLDER.to_string())
    }

    /// Leave the dashboard and forget the session.
    pub fn logout(&self) {
        self.navigator.navigate(Route::Login);
        match self.session.sign_out() {
            Ok(()) => self.notifier.notify(Notice::success(LOGGED_OUT_MESSAGE)),
            Err(e) => {
                tracing::error!("logout failed: {}", e);
                self.notifier.notify(Notice::error(LOGOUT_FAILED_MESSAGE));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;
    use crate::NoticeLevel;
    use chrono::Duration;
    use rx_core::constants::USER_KEY;
    use rx_storage::Scope;

    fn profile() -> UserProfile {
        UserProfile {
            id: 7,
            name: "Dr. Ada Smith".into(),
            email: "ada@clinic.example".into(),
            role: "Prescriber".into(),
            department: "General Practice".into(),
        }
    }

    #[test]
    fn unauthorized_redirects_once_and_keeps_error() {
        let f = fixture();
        let result: ApiResult<()> = Err(ApiError::Unauthorized("expired".into()));

        let returned = f.shell.guard(result);

        assert!(returned.unwrap_err().is_unauthorized());
        assert_eq!(f.navigator.taken(), vec![Route::Login]);
    }

    #[test]
    fn other_results_pass_untouched() {
        let f = fixture();
        assert_eq!(f.shell.guard(Ok(5)).unwrap(), 5);
        let err = f
            .shell
            .guard::<()>(Err(ApiError::NotImplemented("Delete prescription")))
            .unwrap_err();
        assert!(err.is_not_implemented());
        assert!(f.navigator.taken().is_empty());
    }

    #[test]
    fn entry_route_follows_token() {
        let f = fixture();
        let now = Utc::now();
        assert_eq!(f.shell.entry_route(now), Route::Login);

        f.session.sign_in("opaque", &profile()).unwrap();
        assert_eq!(f.shell.entry_route(now), Route::Dashboard);
    }

    #[test]
    fn expired_token_is_cleared() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let f = fixture();
        let now = Utc::now();
        let exp = (now - Duration::minutes(5)).timestamp();
        let token = format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#))
        );
        f.session.sign_in(&token, &profile()).unwrap();

        assert_eq!(f.shell.entry_route(now), Route::Login);
        assert!(!f.session.is_authenticated());
        assert_eq!(f.session.user(), None);
    }

    #[test]
    fn header_shows_profile_or_placeholder() {
        let f = fixture();
        assert_eq!(f.shell.header_name(), PROFILE_PLACEHOLDER);

        f.session.sign_in("t", &profile()).unwrap();
        assert_eq!(f.shell.header_name(), "Dr. Ada Smith");

        f.session
            .storage()
            .set(Scope::Persistent, USER_KEY, "not a profile")
            .unwrap();
        assert_eq!(f.shell.header_profile(), None);
        assert_eq!(f.shell.header_name(), PROFILE_PLACEHOLDER);
    }

    #[test]
    fn logout_clears_notifies_and_navigates() {
        let f = fixture();
        f.session.sign_in("t", &profile()).unwrap();

        f.shell.logout();

        assert!(!f.session.is_authenticated());
        assert_eq!(f.navigator.taken(), vec![Route::Login]);
        assert_eq!(
            f.notifier.messages(NoticeLevel::Success),
            vec![LOGGED_OUT_MESSAGE.to_string()]
        );
    }
}
