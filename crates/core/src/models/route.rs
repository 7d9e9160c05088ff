use serde::{Deserialize, Serialize};

/// Every view the client can be asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Login,
    Register,
    Onboarding,
    /// Standard user dashboard, served at `/`
    Dashboard,
    Portfolio,
    StockDetail(String),
    AdminDashboard,
    /// Any path not listed above; treated as protected
    Unknown(String),
}

impl Route {
    /// Parse a request path. Query strings, fragments and trailing
    /// slashes are ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/onboarding" => Route::Onboarding,
            "/portfolio" => Route::Portfolio,
            "/admin" => Route::AdminDashboard,
            other => match other.strip_prefix("/stocks/") {
                Some(symbol) if !symbol.is_empty() && !symbol.contains('/') => {
                    Route::StockDetail(symbol.to_uppercase())
                }
                _ => Route::Unknown(path.to_string()),
            },
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Onboarding => "/onboarding".into(),
            Route::Dashboard => "/".into(),
            Route::Portfolio => "/portfolio".into(),
            Route::StockDetail(symbol) => format!("/stocks/{symbol}"),
            Route::AdminDashboard => "/admin".into(),
            Route::Unknown(path) => path.clone(),
        }
    }

    /// Login and register are the only areas open to anonymous users.
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Session is still settling; show a loading indicator.
    Loading,
    Allow(Route),
    Redirect(Route),
}

impl Decision {
    /// The route that should end up on screen, if any.
    #[must_use]
    pub fn destination(&self) -> Option<&Route> {
        match self {
            Decision::Loading => None,
            Decision::Allow(route) | Decision::Redirect(route) => Some(route),
        }
    }
}
