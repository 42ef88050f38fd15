//! Persistent Credential Store
//!
//! Key-value storage for the session token and account address so a session
//! survives reloads. The two values are written and cleared together by the
//! session manager; everything else only reads them.
//!
//! - [`FileCredentialStore`]: JSON file in the client data directory
//! - [`MemoryCredentialStore`]: process-local map, for ephemeral sessions

mod file;
mod memory;

pub use file::FileCredentialStore;
pub use memory::MemoryCredentialStore;

use thiserror::Error;

/// Key of the persisted session token
pub const TOKEN_KEY: &str = "token";

/// Key of the persisted account address
pub const ADDRESS_KEY: &str = "address";

/// String key-value storage surviving across page loads
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing a missing key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Errors from the credential store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
