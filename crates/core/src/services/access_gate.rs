use crate::models::identity::Role;
use crate::models::route::{Decision, Route};
use crate::models::session::{Session, SessionState};

/// Decides which view a session may see.
///
/// Pure: the same `(state, route)` always yields the same decision and
/// nothing is read or written besides the arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate;

impl AccessGate {
    pub fn new() -> Self {
        Self
    }

    /// Rules are checked in order; the first match wins.
    #[must_use]
    pub fn decide(&self, state: &SessionState, route: &Route) -> Decision {
        match state {
            SessionState::Uninitialized | SessionState::Loading => Decision::Loading,

            SessionState::Anonymous => {
                if route.is_public() {
                    Decision::Allow(route.clone())
                } else {
                    Decision::Redirect(Route::Login)
                }
            }

            SessionState::Authenticated(session) => {
                let home = Self::home(session);
                if route.is_public() {
                    return Decision::Redirect(home);
                }
                match session.identity.role {
                    Role::Admin => match route {
                        Route::AdminDashboard => Decision::Allow(Route::AdminDashboard),
                        _ => Decision::Redirect(home),
                    },
                    Role::Standard if !session.onboarding_completed() => match route {
                        Route::Onboarding => Decision::Allow(Route::Onboarding),
                        _ => Decision::Redirect(home),
                    },
                    Role::Standard => match route {
                        Route::Dashboard | Route::Portfolio | Route::StockDetail(_) => {
                            Decision::Allow(route.clone())
                        }
                        _ => Decision::Redirect(home),
                    },
                }
            }
        }
    }

    /// Convenience over [`decide`](Self::decide) for raw request paths.
    #[must_use]
    pub fn decide_path(&self, state: &SessionState, path: &str) -> Decision {
        self.decide(state, &Route::from_path(path))
    }

    /// Landing view of an authenticated session.
    #[must_use]
    pub fn home(session: &Session) -> Route {
        match session.identity.role {
            Role::Admin => Route::AdminDashboard,
            Role::Standard if !session.onboarding_completed() => Route::Onboarding,
            Role::Standard => Route::Dashboard,
        }
    }
}
