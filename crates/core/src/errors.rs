use thiserror::Error;

/// Unified error type for the entire stock-portfolio-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication / Session ────────────────────────────────────
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Failed to update preferences: {0}")]
    PreferencesUpdateFailed(String),

    /// A later login/logout/initialize was started before this one finished.
    #[error("Session operation superseded by a newer one")]
    Superseded,

    // ── API / Network ───────────────────────────────────────────────
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Credential storage ──────────────────────────────────────────
    #[error("Token storage error: {0}")]
    Storage(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep query strings out of messages.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::NetworkUnavailable(sanitized)
    }
}
