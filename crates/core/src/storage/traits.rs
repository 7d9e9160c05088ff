use crate::errors::CoreError;

/// Narrow key-value capability for the persisted bearer token.
///
/// The session store is the only caller. Backends decide where the
/// value lives (memory, a file, a browser's local storage, ...).
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Removing a key that is not present succeeds.
    fn clear(&self, key: &str) -> Result<(), CoreError>;
}
