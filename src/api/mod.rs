//! Ledger API
//!
//! The collaborator API the controller consumes. `LedgerApi` names the ten
//! operations; `HttpLedgerApi` is the production adapter over `reqwest`.
//!
//! ## Operations
//!
//! | Operation | Endpoint | Auth |
//! |---|---|---|
//! | validate/balance | `GET /api/balance` | token |
//! | login | `POST /api/login` | none |
//! | register | `POST /api/register` | none |
//! | logout | `POST /api/logout` | token |
//! | list memories | `GET /api/memories` | token |
//! | list transactions | `GET /api/transactions` | token |
//! | ledger snapshot | `GET /api/blockchain` | none |
//! | upload memory | `POST /api/upload` | token |
//! | mine | `POST /api/mine` | token |
//! | transfer | `POST /api/transfer` | token |

mod client;
pub mod dto;
mod error;

pub use client::HttpLedgerApi;
pub use dto::{
    BalanceResponse, BalanceUpdate, ChainSnapshot, LoginResponse, RegisterResponse,
    TransferRequest, UploadRequest, UploadResponse,
};
pub use error::{ApiError, ApiResult};

use async_trait::async_trait;

use crate::model::{MemoryRecord, TransactionRecord};

/// Request/response contract of the ledger server
///
/// Token-bearing operations take the opaque session token; how it is framed
/// on the wire is the adapter's business.
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Validate a token and read the account balance
    async fn balance(&self, token: &str) -> ApiResult<BalanceResponse>;

    /// Exchange an address and private key for a session token
    async fn login(&self, address: &str, private_key: &str) -> ApiResult<LoginResponse>;

    /// Create a new wallet
    async fn register(&self) -> ApiResult<RegisterResponse>;

    /// Invalidate a token
    async fn logout(&self, token: &str) -> ApiResult<()>;

    async fn memories(&self, token: &str) -> ApiResult<Vec<MemoryRecord>>;

    async fn transactions(&self, token: &str) -> ApiResult<Vec<TransactionRecord>>;

    /// Full ledger for the explorer
    async fn chain(&self) -> ApiResult<ChainSnapshot>;

    async fn upload(&self, token: &str, request: &UploadRequest) -> ApiResult<UploadResponse>;

    async fn mine(&self, token: &str) -> ApiResult<BalanceUpdate>;

    async fn transfer(&self, token: &str, request: &TransferRequest) -> ApiResult<BalanceUpdate>;
}
