//! Account memories pipeline

use super::{format_timestamp, ListMessages, ListView, Pipeline, DATE_FORMAT};
use crate::api::LedgerApi;
use crate::error::AppError;
use crate::model::MemoryRecord;

pub const MESSAGES: ListMessages = ListMessages {
    empty: "No memories uploaded yet.",
    error: "Error loading memories. Please try again.",
};

/// Display-ready memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub icon: &'static str,
    pub kind: String,
    pub description: String,
    pub date: String,
}

impl MemoryRow {
    pub fn project(record: &MemoryRecord) -> Self {
        Self {
            icon: record.memory_type.icon(),
            kind: record.memory_type.to_string(),
            description: record.description.clone(),
            date: format_timestamp(record.timestamp, DATE_FORMAT),
        }
    }
}

pub async fn fetch(api: &dyn LedgerApi, token: &str) -> Result<Vec<MemoryRecord>, AppError> {
    Ok(api.memories(token).await?)
}

pub fn apply(result: Result<Vec<MemoryRecord>, AppError>) -> ListView<MemoryRow> {
    ListView::project(Pipeline::Memories, result, MemoryRow::project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoryType;

    fn record(memory_type: MemoryType, description: &str) -> MemoryRecord {
        MemoryRecord {
            memory_type,
            description: description.to_string(),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_rows_carry_icon_and_date() {
        let view = apply(Ok(vec![
            record(MemoryType::Image, "beach"),
            record(MemoryType::Other("TEXT".to_string()), "notes"),
        ]));

        let rows = view.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].icon, "🖼️");
        assert_eq!(rows[0].kind, "IMAGE");
        assert_eq!(rows[0].date, "2023-11-14");
        assert_eq!(rows[1].icon, "📄");
        assert_eq!(rows[1].description, "notes");
    }

    #[test]
    fn test_rerun_with_same_records_is_identical() {
        let records = vec![record(MemoryType::Meme, "cat"), record(MemoryType::Video, "clip")];
        assert_eq!(apply(Ok(records.clone())), apply(Ok(records)));
    }

    #[test]
    fn test_failure_message() {
        let view = apply(Err(AppError::Rejection {
            status: 500,
            detail: None,
        }));
        assert_eq!(view.message(), Some(MESSAGES.error));
    }
}
