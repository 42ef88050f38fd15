//! Data Transfer Objects
//!
//! Request and response bodies of the ledger API. Field names follow the
//! server's camelCase JSON.

use serde::{Deserialize, Serialize};

use crate::model::{Amount, Block, MemoryRecord, TransactionRecord};

// ============================================
// ACCOUNT DTOs
// ============================================

/// Validate/balance response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub address: String,
    pub balance: Amount,
}

/// Credential exchange request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub address: String,
    pub private_key: String,
}

/// Credential exchange response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub address: String,
}

/// Newly issued wallet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub address: String,
    pub private_key: String,
}

/// Response of mine and transfer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BalanceUpdate {
    pub balance: Amount,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================
// COLLECTION DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct MemoriesResponse {
    #[serde(default)]
    pub memories: Vec<MemoryRecord>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

/// Ledger snapshot for the explorer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    #[serde(default)]
    pub chain: Vec<Block>,
    #[serde(default)]
    pub pending_transactions: Vec<TransactionRecord>,
}

// ============================================
// WRITE DTOs
// ============================================

/// Memory upload body; `file_data` is standard base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(rename = "type")]
    pub memory_type: String,
    pub description: String,
    pub file_data: String,
    pub file_name: String,
    pub file_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub proof_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub to_address: String,
    pub amount: Amount,
}

// ============================================
// ERROR DTOs
// ============================================

/// Error body of a rejected request
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// `details` if present, else `error`; blank strings count as absent
    pub fn into_detail(self) -> Option<String> {
        let present = |field: Option<String>| field.filter(|s| !s.trim().is_empty());
        present(self.details).or_else(|| present(self.error))
    }

    /// Parse a raw error body; `None` when it is not the expected JSON
    pub fn parse_detail(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(ErrorBody::into_detail)
    }
}
