use std::sync::{Arc, Mutex};

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::api::traits::RemoteApi;
use crate::errors::CoreError;
use crate::models::identity::{Identity, Token};
use crate::models::preferences::Preferences;
use crate::models::session::{Session, SessionState};
use crate::storage::traits::TokenStore;

/// Single source of truth for who is logged in and with what preferences.
///
/// The store is also the only reader/writer of the persisted token.
/// State changes are published through a `watch` channel, so any number
/// of consumers can [`subscribe`](Self::subscribe) and re-run the access
/// gate whenever the session settles.
///
/// `initialize`, `login` and `logout` are ordered by when they were
/// *started*: each one takes a new epoch, and a result whose epoch is no
/// longer current is dropped instead of overwriting newer state.
pub struct SessionStore {
    api: Arc<dyn RemoteApi>,
    tokens: Arc<dyn TokenStore>,
    token_key: String,
    state: watch::Sender<SessionState>,
    epoch: Mutex<u64>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("token_key", &self.token_key)
            .field("state", &*self.state.borrow())
            .finish()
    }
}

impl SessionStore {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        tokens: Arc<dyn TokenStore>,
        token_key: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Uninitialized);
        Self {
            api,
            tokens,
            token_key: token_key.into(),
            state,
            epoch: Mutex::new(0),
        }
    }

    // ── Observation ─────────────────────────────────────────────────

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Wait until the state is neither `Uninitialized` nor `Loading`.
    ///
    /// Only returns once something drives the store (normally
    /// [`initialize`](Self::initialize)).
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = rx
            .wait_for(|s| !s.is_pending())
            .await
            .map(|state| state.clone());
        // The sender lives in `self`, so it cannot be dropped here.
        settled.unwrap_or_else(|_| self.state())
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.state.borrow().session().cloned()
    }

    /// The current session, or `Unauthorized` when there is none.
    pub fn require_session(&self) -> Result<Session, CoreError> {
        self.session().ok_or(CoreError::Unauthorized)
    }

    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.state.borrow().token().cloned()
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Restore a session from the persisted token.
    ///
    /// Without a token the store settles to `Anonymous`. Otherwise it
    /// moves to `Loading`, fetches identity and preferences concurrently
    /// and settles to `Authenticated` only if both succeed. Any failure
    /// discards the token and settles to `Anonymous`; nothing is
    /// surfaced to the caller. Returns the state after settling, which
    /// may belong to a newer operation if this one was superseded.
    pub async fn initialize(&self) -> SessionState {
        let epoch = self.begin();

        let stored = match self.tokens.get(&self.token_key) {
            Ok(stored) => stored,
            Err(e) => {
                warn!("[Session] Could not read stored token: {e}");
                None
            }
        };

        let Some(raw) = stored else {
            debug!("[Session] No stored token");
            let _ = self.commit(epoch, |store| {
                store.publish(SessionState::Anonymous);
                Ok(())
            });
            return self.state();
        };

        if self
            .commit(epoch, |store| {
                store.publish(SessionState::Loading);
                Ok(())
            })
            .is_err()
        {
            return self.state();
        }

        let token = Token::new(raw);
        let (identity, preferences) = tokio::join!(
            self.api.me(&token),
            self.api.get_preferences(&token)
        );

        let outcome = self.commit(epoch, |store| match (identity, preferences) {
            (Ok(identity), Ok(preferences)) => {
                info!("[Session] Restored session for user {}", identity.id);
                store.publish(SessionState::Authenticated(Session {
                    identity,
                    preferences: Some(preferences),
                    token,
                }));
                Ok(())
            }
            (identity, preferences) => {
                if let Some(e) = identity.err().or(preferences.err()) {
                    warn!("[Session] Stored token rejected: {e}");
                }
                store.discard_token();
                store.publish(SessionState::Anonymous);
                Ok(())
            }
        });
        if outcome.is_err() {
            debug!("[Session] Initialization superseded");
        }

        self.state()
    }

    /// Authenticate with the remote service.
    ///
    /// On success the token is persisted and the session becomes
    /// `Authenticated`. Preferences are fetched before the new state is
    /// published; if that fetch fails the session is still authenticated
    /// with `preferences: None`.
    ///
    /// A rejected login leaves a settled state and the stored token
    /// untouched. If it superseded a restore that was still `Loading`,
    /// the unvalidated token is discarded and the store settles to
    /// `Anonymous`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, CoreError> {
        let epoch = self.begin();
        debug!("[Session] Login attempt");

        let response = match self.api.login(email, password).await {
            Ok(response) => response,
            Err(e) => {
                let _ = self.commit(epoch, |store| {
                    store.settle_pending();
                    Ok(())
                });
                return Err(e);
            }
        };

        if !self.is_current(epoch) {
            debug!("[Session] Login superseded before preferences fetch");
            return Err(CoreError::Superseded);
        }

        let preferences = match self.api.get_preferences(&response.token).await {
            Ok(preferences) => Some(preferences),
            Err(e) => {
                warn!("[Session] Preferences unavailable after login: {e}");
                None
            }
        };

        let identity = response.user;
        let token = response.token;
        self.commit(epoch, |store| {
            if let Err(e) = store.tokens.set(&store.token_key, token.as_str()) {
                store.settle_pending();
                return Err(e);
            }
            info!("[Session] Logged in as user {}", identity.id);
            store.publish(SessionState::Authenticated(Session {
                identity: identity.clone(),
                preferences,
                token,
            }));
            Ok(identity)
        })
    }

    /// Create an account. Does not log in.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), CoreError> {
        match self.api.register(email, password).await {
            Ok(()) => {
                info!("[Session] Registered new account");
                Ok(())
            }
            Err(e @ (CoreError::EmailAlreadyExists
            | CoreError::RegistrationFailed(_)
            | CoreError::NetworkUnavailable(_))) => Err(e),
            Err(e) => Err(CoreError::RegistrationFailed(e.to_string())),
        }
    }

    /// Drop the session. Never fails and supersedes anything in flight.
    pub fn logout(&self) {
        let mut epoch = self.epoch.lock().unwrap_or_else(|e| e.into_inner());
        *epoch += 1;
        self.discard_token();
        self.publish(SessionState::Anonymous);
        info!("[Session] Logged out");
    }

    /// Replace the session's preferences on the server and, once it
    /// accepts them, locally. The only way `onboarding_completed` changes.
    ///
    /// Requires an authenticated session (`Unauthorized` otherwise).
    /// Remote failures other than 401 become `PreferencesUpdateFailed`.
    pub async fn update_preferences(&self, preferences: Preferences) -> Result<(), CoreError> {
        let session = self.require_session()?;

        match self
            .api
            .update_preferences(&session.token, &preferences)
            .await
        {
            Ok(()) => {}
            Err(e @ (CoreError::Unauthorized | CoreError::PreferencesUpdateFailed(_))) => {
                return Err(e)
            }
            Err(e) => return Err(CoreError::PreferencesUpdateFailed(e.to_string())),
        }

        // Hold the epoch lock so a concurrent logout cannot interleave.
        let _epoch = self.epoch.lock().unwrap_or_else(|e| e.into_inner());
        let applied = self.state.send_if_modified(|state| match state {
            SessionState::Authenticated(current)
                if current.token == session.token
                    && current.identity == session.identity =>
            {
                current.preferences = Some(preferences);
                true
            }
            _ => false,
        });

        if applied {
            info!("[Session] Preferences updated");
            Ok(())
        } else {
            debug!("[Session] Session changed while preferences were being saved");
            Err(CoreError::Superseded)
        }
    }

    // ── Internal ────────────────────────────────────────────────────

    fn begin(&self) -> u64 {
        let mut epoch = self.epoch.lock().unwrap_or_else(|e| e.into_inner());
        *epoch += 1;
        *epoch
    }

    fn is_current(&self, epoch: u64) -> bool {
        *self.epoch.lock().unwrap_or_else(|e| e.into_inner()) == epoch
    }

    /// Run `apply` only if `epoch` is still the newest operation.
    /// The epoch lock is held for the duration, which makes the check
    /// and the state change one step.
    fn commit<T>(
        &self,
        epoch: u64,
        apply: impl FnOnce(&Self) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let current = self.epoch.lock().unwrap_or_else(|e| e.into_inner());
        if *current != epoch {
            return Err(CoreError::Superseded);
        }
        let result = apply(self);
        drop(current);
        result
    }

    fn publish(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    /// Settle a restore that a failed operation superseded. Call with
    /// the epoch lock held.
    fn settle_pending(&self) {
        let pending = self.state.borrow().is_pending();
        if pending {
            debug!("[Session] Dropping unvalidated token after failed login");
            self.discard_token();
            self.publish(SessionState::Anonymous);
        }
    }

    fn discard_token(&self) {
        if let Err(e) = self.tokens.clear(&self.token_key) {
            warn!("[Session] Could not clear stored token: {e}");
        }
    }
}
