//! Data Synchronization Pipelines
//!
//! Three independent fetch-render cycles: account memories, account
//! transactions and the ledger explorer. Each pipeline is split into an async
//! `fetch` that borrows only the API (and a token) and a pure `apply` that
//! projects the outcome into view rows. A failed fetch renders a fixed
//! message in place of the list and is logged; there is no retry.

pub mod explorer;
pub mod memories;
pub mod transactions;

use chrono::{TimeZone, Utc};
use std::fmt;

use crate::error::{AppError, Operation};

/// Calendar date of a memory
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date-time of transactions and blocks
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Identifies one pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pipeline {
    Memories,
    Transactions,
    Ledger,
}

impl Pipeline {
    pub fn operation(self) -> Operation {
        match self {
            Pipeline::Memories => Operation::LoadMemories,
            Pipeline::Transactions => Operation::LoadTransactions,
            Pipeline::Ledger => Operation::LoadLedger,
        }
    }

    /// Whether the pipeline needs a session token
    pub fn requires_session(self) -> bool {
        !matches!(self, Pipeline::Ledger)
    }

    pub fn messages(self) -> ListMessages {
        match self {
            Pipeline::Memories => memories::MESSAGES,
            Pipeline::Transactions => transactions::MESSAGES,
            Pipeline::Ledger => explorer::MESSAGES,
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pipeline::Memories => write!(f, "memories"),
            Pipeline::Transactions => write!(f, "transactions"),
            Pipeline::Ledger => write!(f, "ledger"),
        }
    }
}

/// Fixed texts shown in place of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMessages {
    pub empty: &'static str,
    pub error: &'static str,
}

/// Rendered state of one list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<T> {
    /// Loaded, nothing to show
    Empty { message: &'static str },
    /// Last load failed
    Failed { message: &'static str },
    Rows(Vec<T>),
}

impl<T> ListView<T> {
    pub fn empty(messages: ListMessages) -> Self {
        ListView::Empty {
            message: messages.empty,
        }
    }

    /// Project a fetch outcome, replacing whatever was shown before
    pub fn project<R>(
        pipeline: Pipeline,
        result: Result<Vec<R>, AppError>,
        row: impl FnMut(&R) -> T,
    ) -> Self {
        let messages = pipeline.messages();
        match result {
            Ok(records) if records.is_empty() => ListView::empty(messages),
            Ok(records) => {
                tracing::debug!(pipeline = %pipeline, count = records.len(), "Pipeline loaded");
                ListView::Rows(records.iter().map(row).collect())
            }
            Err(e) => {
                tracing::warn!(
                    pipeline = %pipeline,
                    operation = %pipeline.operation(),
                    error = %e,
                    "Pipeline failed"
                );
                ListView::Failed {
                    message: messages.error,
                }
            }
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ListView::Rows(rows) => rows,
            ListView::Empty { .. } | ListView::Failed { .. } => &[],
        }
    }

    /// Text shown instead of rows, if any
    pub fn message(&self) -> Option<&'static str> {
        match self {
            ListView::Empty { message } | ListView::Failed { message } => Some(message),
            ListView::Rows(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ListView::Failed { .. })
    }
}

/// Format unix seconds as UTC; out-of-range values fall back to the raw number
pub fn format_timestamp(seconds: i64, format: &str) -> String {
    match Utc.timestamp_opt(seconds, 0).single() {
        Some(time) => time.format(format).to_string(),
        None => seconds.to_string(),
    }
}
