//! Scripted ledger API for tests
//!
//! `FakeApi` records every call and answers from a [`Script`] the test can
//! edit at any point.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::api::{
    ApiResult, BalanceResponse, BalanceUpdate, ChainSnapshot, LedgerApi, LoginResponse,
    RegisterResponse, TransferRequest, UploadRequest, UploadResponse,
};
use crate::model::{Amount, MemoryRecord, TransactionRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Balance(String),
    Login { address: String, private_key: String },
    Register,
    Logout(String),
    Memories(String),
    Transactions(String),
    Chain,
    Upload { token: String, request: UploadRequest },
    Mine(String),
    Transfer { token: String, to_address: String, amount: Amount },
}

/// Canned answers, one per operation
pub struct Script {
    pub balance: ApiResult<BalanceResponse>,
    pub login: ApiResult<LoginResponse>,
    pub register: ApiResult<RegisterResponse>,
    pub logout: ApiResult<()>,
    pub memories: ApiResult<Vec<MemoryRecord>>,
    pub transactions: ApiResult<Vec<TransactionRecord>>,
    pub chain: ApiResult<ChainSnapshot>,
    pub upload: ApiResult<UploadResponse>,
    pub mine: ApiResult<BalanceUpdate>,
    pub transfer: ApiResult<BalanceUpdate>,
}

impl Default for Script {
    /// Account `A1` holding 100 AHM, token `T1`
    fn default() -> Self {
        Self {
            balance: Ok(BalanceResponse {
                address: "A1".to_string(),
                balance: Amount::from_coins(100),
            }),
            login: Ok(LoginResponse {
                token: "T1".to_string(),
                address: "A1".to_string(),
            }),
            register: Ok(RegisterResponse {
                address: "N1".to_string(),
                private_key: "K1".to_string(),
            }),
            logout: Ok(()),
            memories: Ok(Vec::new()),
            transactions: Ok(Vec::new()),
            chain: Ok(ChainSnapshot::default()),
            upload: Ok(UploadResponse::default()),
            mine: Ok(BalanceUpdate {
                balance: Amount::from_coins(150),
                message: None,
            }),
            transfer: Ok(BalanceUpdate {
                balance: Amount::from_units(49_500_000),
                message: None,
            }),
        }
    }
}

#[derive(Default)]
pub struct FakeApi {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, edit: impl FnOnce(&mut Script)) {
        edit(&mut lock(&self.script));
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn answer<T: Clone>(&self, call: Call, pick: impl FnOnce(&Script) -> &ApiResult<T>) -> ApiResult<T> {
        lock(&self.calls).push(call);
        pick(&lock(&self.script)).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl LedgerApi for FakeApi {
    async fn balance(&self, token: &str) -> ApiResult<BalanceResponse> {
        self.answer(Call::Balance(token.to_string()), |s| &s.balance)
    }

    async fn login(&self, address: &str, private_key: &str) -> ApiResult<LoginResponse> {
        self.answer(
            Call::Login {
                address: address.to_string(),
                private_key: private_key.to_string(),
            },
            |s| &s.login,
        )
    }

    async fn register(&self) -> ApiResult<RegisterResponse> {
        self.answer(Call::Register, |s| &s.register)
    }

    async fn logout(&self, token: &str) -> ApiResult<()> {
        self.answer(Call::Logout(token.to_string()), |s| &s.logout)
    }

    async fn memories(&self, token: &str) -> ApiResult<Vec<MemoryRecord>> {
        self.answer(Call::Memories(token.to_string()), |s| &s.memories)
    }

    async fn transactions(&self, token: &str) -> ApiResult<Vec<TransactionRecord>> {
        self.answer(Call::Transactions(token.to_string()), |s| &s.transactions)
    }

    async fn chain(&self) -> ApiResult<ChainSnapshot> {
        self.answer(Call::Chain, |s| &s.chain)
    }

    async fn upload(&self, token: &str, request: &UploadRequest) -> ApiResult<UploadResponse> {
        self.answer(
            Call::Upload {
                token: token.to_string(),
                request: request.clone(),
            },
            |s| &s.upload,
        )
    }

    async fn mine(&self, token: &str) -> ApiResult<BalanceUpdate> {
        self.answer(Call::Mine(token.to_string()), |s| &s.mine)
    }

    async fn transfer(&self, token: &str, request: &TransferRequest) -> ApiResult<BalanceUpdate> {
        self.answer(
            Call::Transfer {
                token: token.to_string(),
                to_address: request.to_address.clone(),
                amount: request.amount,
            },
            |s| &s.transfer,
        )
    }
}
