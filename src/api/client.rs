//! Ledger REST API Client
//!
//! HTTP adapter for the ledger server's `/api` routes.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;
use uuid::Uuid;

use super::dto::{
    BalanceResponse, BalanceUpdate, ChainSnapshot, ErrorBody, LoginRequest, LoginResponse,
    MemoriesResponse, RegisterResponse, TransactionsResponse, TransferRequest, UploadRequest,
    UploadResponse,
};
use super::{ApiError, ApiResult, LedgerApi};
use crate::config::ApiConfig;
use crate::model::{MemoryRecord, TransactionRecord};

/// Header carrying the per-request correlation id
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ledger API over HTTP
pub struct HttpLedgerApi {
    client: Client,
    base_url: String,
}

impl HttpLedgerApi {
    /// Create a client for the configured server
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Send a request and decode a success body, mapping non-success
    /// statuses to `ApiError::Rejected` with the server's detail if any
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(request_id = %request_id, operation, "Sending ledger API request");

        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(request_id = %request_id, operation, error = %e, "Ledger API unreachable");
                ApiError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = ErrorBody::parse_detail(&body);
            tracing::warn!(
                request_id = %request_id,
                operation,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "Ledger API rejected request"
            );
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        tracing::debug!(request_id = %request_id, operation, status = status.as_u16(), "Ledger API request completed");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl LedgerApi for HttpLedgerApi {
    async fn balance(&self, token: &str) -> ApiResult<BalanceResponse> {
        let request = self
            .client
            .get(self.url("balance"))
            .header(AUTHORIZATION, token);
        self.send("balance", request).await
    }

    async fn login(&self, address: &str, private_key: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            address: address.to_string(),
            private_key: private_key.to_string(),
        };
        let request = self.client.post(self.url("login")).json(&body);
        self.send("login", request).await
    }

    async fn register(&self) -> ApiResult<RegisterResponse> {
        let request = self.client.post(self.url("register"));
        self.send("register", request).await
    }

    async fn logout(&self, token: &str) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url("logout"))
            .header(AUTHORIZATION, token);
        self.send::<IgnoredAny>("logout", request).await?;
        Ok(())
    }

    async fn memories(&self, token: &str) -> ApiResult<Vec<MemoryRecord>> {
        let request = self
            .client
            .get(self.url("memories"))
            .header(AUTHORIZATION, token);
        let response: MemoriesResponse = self.send("memories", request).await?;
        Ok(response.memories)
    }

    async fn transactions(&self, token: &str) -> ApiResult<Vec<TransactionRecord>> {
        let request = self
            .client
            .get(self.url("transactions"))
            .header(AUTHORIZATION, token);
        let response: TransactionsResponse = self.send("transactions", request).await?;
        Ok(response.transactions)
    }

    async fn chain(&self) -> ApiResult<ChainSnapshot> {
        let request = self.client.get(self.url("blockchain"));
        self.send("blockchain", request).await
    }

    async fn upload(&self, token: &str, body: &UploadRequest) -> ApiResult<UploadResponse> {
        let request = self
            .client
            .post(self.url("upload"))
            .header(AUTHORIZATION, token.trim())
            .json(body);
        self.send("upload", request).await
    }

    async fn mine(&self, token: &str) -> ApiResult<BalanceUpdate> {
        let request = self
            .client
            .post(self.url("mine"))
            .header(AUTHORIZATION, token);
        self.send("mine", request).await
    }

    async fn transfer(&self, token: &str, body: &TransferRequest) -> ApiResult<BalanceUpdate> {
        let request = self
            .client
            .post(self.url("transfer"))
            .header(AUTHORIZATION, token)
            .json(body);
        self.send("transfer", request).await
    }
}
