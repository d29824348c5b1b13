use rx_core::constants::{DASHBOARD_ROUTE, LOGIN_ROUTE};

/// Client-side screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => LOGIN_ROUTE,
            Route::Dashboard => DASHBOARD_ROUTE,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Moves the front end to another screen.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
