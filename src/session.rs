//! Session Manager
//!
//! Owns the authentication state. The in-memory [`Session`] and the two
//! persisted credential entries are always written together: a transition
//! either leaves both populated (`LoggedIn`) or both empty (`LoggedOut`).

use std::sync::Arc;

use crate::api::{BalanceResponse, LedgerApi};
use crate::error::{AppError, Operation};
use crate::model::{Amount, Session};
use crate::store::{CredentialStore, StoreResult, ADDRESS_KEY, TOKEN_KEY};

/// Authentication state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
}

/// Account read returned by a successful restore or balance refresh
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub address: String,
    pub balance: Amount,
}

pub struct SessionManager {
    api: Arc<dyn LedgerApi>,
    store: Arc<dyn CredentialStore>,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn LedgerApi>, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            api,
            store,
            session: None,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.session.is_some() {
            AuthState::LoggedIn
        } else {
            AuthState::LoggedOut
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(Session::token)
    }

    pub fn address(&self) -> Option<&str> {
        self.session.as_ref().map(Session::address)
    }

    /// Re-establish a persisted session
    ///
    /// Validates the stored token with a balance read. Any failure clears the
    /// persisted credentials and leaves the manager logged out; it is logged,
    /// never returned.
    pub async fn restore(&mut self) -> Option<AccountSnapshot> {
        let (token, stored_address) = match self.read_credentials() {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                tracing::debug!("No persisted session");
                self.session = None;
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable credential store, clearing credentials");
                self.clear();
                return None;
            }
        };

        match self.api.balance(&token).await {
            Ok(BalanceResponse { address, balance }) => {
                let address = if address.is_empty() {
                    stored_address
                } else {
                    if address != stored_address {
                        tracing::info!(stored = %stored_address, server = %address, "Server returned a different address");
                        self.persist(ADDRESS_KEY, &address);
                    }
                    address
                };

                tracing::info!(address = %address, "Session restored");
                self.session = Some(Session::new(address.clone(), token));
                Some(AccountSnapshot { address, balance })
            }
            Err(e) => {
                let error = AppError::from_token_check(e);
                tracing::warn!(
                    operation = %Operation::SessionRestore,
                    error = %error,
                    "Stored session rejected, clearing credentials"
                );
                self.clear();
                None
            }
        }
    }

    /// Exchange credentials for a session token
    pub async fn login(&mut self, address: &str, private_key: &str) -> Result<&Session, AppError> {
        let response = self.api.login(address, private_key).await?;

        // Prefer the server's canonical address
        let address = if response.address.is_empty() {
            address.to_string()
        } else {
            response.address
        };

        self.persist(TOKEN_KEY, &response.token);
        self.persist(ADDRESS_KEY, &address);

        tracing::info!(address = %address, "Logged in");
        Ok(&*self.session.insert(Session::new(address, response.token)))
    }

    /// Best-effort server invalidation, then unconditional local clear
    pub async fn logout(&mut self) {
        if let Some(session) = self.session.as_ref() {
            if let Err(e) = self.api.logout(session.token()).await {
                tracing::debug!(error = %e, "Server logout failed, clearing locally anyway");
            }
            tracing::info!(address = %session.address(), "Logged out");
        }
        self.clear();
    }

    /// Read the current balance with the session token
    pub async fn fetch_balance(&self) -> Result<AccountSnapshot, AppError> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| AppError::validation("Please log in to view your balance"))?;

        let response = self.api.balance(session.token()).await?;
        Ok(AccountSnapshot {
            address: session.address().to_string(),
            balance: response.balance,
        })
    }

    fn read_credentials(&self) -> StoreResult<Option<(String, String)>> {
        let read = |key: &str| -> StoreResult<Option<String>> {
            Ok(self.store.get(key)?.filter(|v| !v.is_empty()))
        };

        Ok(read(TOKEN_KEY)?.zip(read(ADDRESS_KEY)?))
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "Failed to persist credential, session will not survive a reload");
        }
    }

    fn clear(&mut self) {
        self.session = None;
        for key in [TOKEN_KEY, ADDRESS_KEY] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear credential");
            }
        }
    }
}
