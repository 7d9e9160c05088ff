use super::identity::{Identity, Role, Token};
use super::preferences::Preferences;

/// Everything known about an authenticated user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub identity: Identity,

    /// `None` only when the best-effort fetch after login failed.
    pub preferences: Option<Preferences>,

    pub token: Token,
}

impl Session {
    /// Onboarding counts as incomplete while preferences are unknown.
    #[must_use]
    pub fn onboarding_completed(&self) -> bool {
        self.preferences
            .as_ref()
            .is_some_and(|p| p.onboarding_completed)
    }
}

/// The single session of this client instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// Process just started; `initialize` has not run.
    #[default]
    Uninitialized,
    /// A stored token is being re-validated.
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    /// `true` while the state has not settled yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Uninitialized | SessionState::Loading)
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.session().map(|s| &s.identity)
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.identity().map(|i| i.role)
    }

    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        self.session().map(|s| &s.token)
    }
}
