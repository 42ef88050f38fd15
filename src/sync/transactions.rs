//! Account transactions pipeline

use super::{format_timestamp, ListMessages, ListView, Pipeline, DATE_TIME_FORMAT};
use crate::api::LedgerApi;
use crate::error::AppError;
use crate::model::{Direction, TransactionLabel, TransactionRecord};

pub const MESSAGES: ListMessages = ListMessages {
    empty: "No transactions yet.",
    error: "Error loading transactions. Please try again.",
};

/// Counterpart shown for rewards with no sender
const SYSTEM_SENDER: &str = "Blockchain";

/// Display-ready transaction, as seen from one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub label: TransactionLabel,
    pub direction: Direction,
    /// `From: <sender>` or `To: <recipient>`
    pub counterpart: String,
    /// Two decimals, signed by direction
    pub amount: String,
    pub timestamp: String,
}

impl TransactionRow {
    pub fn project(record: &TransactionRecord, account: &str) -> Self {
        let direction = record.direction(account);
        let (counterpart, amount) = match direction {
            Direction::Incoming => (
                format!(
                    "From: {}",
                    record.from_address.as_deref().unwrap_or(SYSTEM_SENDER)
                ),
                format!("+{}", record.amount.abs()),
            ),
            Direction::Outgoing => (
                format!("To: {}", record.to_address),
                format!("-{}", record.amount.abs()),
            ),
        };

        Self {
            label: record.label(),
            direction,
            counterpart,
            amount,
            timestamp: format_timestamp(record.timestamp, DATE_TIME_FORMAT),
        }
    }
}

pub async fn fetch(api: &dyn LedgerApi, token: &str) -> Result<Vec<TransactionRecord>, AppError> {
    Ok(api.transactions(token).await?)
}

/// Project for `account`, the current session address
pub fn apply(
    result: Result<Vec<TransactionRecord>, AppError>,
    account: &str,
) -> ListView<TransactionRow> {
    ListView::project(Pipeline::Transactions, result, |record| {
        TransactionRow::project(record, account)
    })
}
