//! Application error model
//!
//! Every failure the controller surfaces is one of four kinds, and each kind
//! has exactly one rendering rule. Call sites pick the [`Operation`] that
//! failed; they never build message strings themselves.

use std::fmt;
use thiserror::Error;

use crate::api::ApiError;

/// User-triggered or background operation that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    Logout,
    Register,
    Upload,
    Mine,
    Transfer,
    BalanceRefresh,
    LoadMemories,
    LoadTransactions,
    LoadLedger,
    SessionRestore,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Login => "Login",
            Operation::Logout => "Logout",
            Operation::Register => "Wallet creation",
            Operation::Upload => "Upload",
            Operation::Mine => "Mining",
            Operation::Transfer => "Transfer",
            Operation::BalanceRefresh => "Balance refresh",
            Operation::LoadMemories => "Loading memories",
            Operation::LoadTransactions => "Loading transactions",
            Operation::LoadLedger => "Loading blockchain data",
            Operation::SessionRestore => "Session restore",
        };
        f.write_str(name)
    }
}

/// Failure kinds surfaced by the controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The request could not complete
    #[error("transport failure: {0}")]
    Transport(String),

    /// The request completed with a non-success status
    #[error("rejected with status {status}")]
    Rejection { status: u16, detail: Option<String> },

    /// Caught locally before any request was issued
    #[error("validation failed: {0}")]
    Validation(String),

    /// The stored session token was refused
    #[error("session expired")]
    AuthExpired,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Map a failed token validation: refusals become `AuthExpired`
    pub fn from_token_check(err: ApiError) -> Self {
        if err.is_unauthorized() {
            AppError::AuthExpired
        } else {
            err.into()
        }
    }

    /// Text shown to the user when `operation` fails with this error
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            AppError::Transport(_) => format!("{} failed. Please try again.", operation),
            AppError::Rejection {
                detail: Some(detail),
                ..
            } => format!("{} failed: {}", operation, detail),
            AppError::Rejection {
                status,
                detail: None,
            } => format!("{} failed with status {}", operation, status),
            AppError::Validation(message) => message.clone(),
            AppError::AuthExpired => "Your session has expired. Please log in again.".to_string(),
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Transport(message) => AppError::Transport(message),
            ApiError::Decode(message) => AppError::Transport(format!("unreadable response: {}", message)),
            ApiError::Rejected { status, detail } => AppError::Rejection { status, detail },
        }
    }
}
