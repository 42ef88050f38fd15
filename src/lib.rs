//! # Ahmiyat
//!
//! Client controller for the Ahmiyat memory chain: a wallet-style account,
//! a ledger explorer, and uploads of user content ("memories") rewarded in
//! AHM.
//!
//! The crate tracks authentication state, gates which views are reachable,
//! talks to the ledger server, and reconciles responses into a renderable
//! [`ViewState`].
//!
//! ## Modules
//!
//! - [`app`]: the controller composing everything below
//! - [`session`]: login, logout and session restore
//! - [`router`]: single-active-section navigation
//! - [`sync`]: memories, transactions and explorer pipelines
//! - [`upload`]: file preview and memory submission
//! - [`api`]: ledger API port and its HTTP adapter
//! - [`store`]: persisted session credentials
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ahmiyat::{App, Config, FileCredentialStore, HttpLedgerApi, Section};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let api = HttpLedgerApi::new(&config.api)?;
//!     let store = FileCredentialStore::new(config.storage.credentials_path());
//!
//!     let mut app = App::new(Arc::new(api), Arc::new(store));
//!     app.start().await;
//!     app.navigate(Section::BlockchainExplorer).await;
//!
//!     print!("{}", ahmiyat::render(app.view()));
//!     Ok(())
//! }
//! ```

mod actions;
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod render;
pub mod router;
pub mod session;
pub mod store;
pub mod sync;
pub mod upload;
pub mod view;

#[cfg(test)]
mod testing;

pub use api::{ApiError, ApiResult, HttpLedgerApi, LedgerApi};
pub use app::{App, Renderer};
pub use config::{generate_default_config, ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig};
pub use error::{AppError, Operation};
pub use model::{
    Amount, AmountParseError, Block, Direction, MemoryRecord, MemoryType, Session,
    TransactionLabel, TransactionRecord, TransactionType,
};
pub use render::render;
pub use router::{NavLink, Overlay, Router, Section, SectionParseError};
pub use session::{AccountSnapshot, AuthState, SessionManager};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError};
pub use sync::{ListView, Pipeline};
pub use upload::{guess_mime, Preview, SelectedFile, UploadDraft};
pub use view::{Notice, NoticeKind, ViewState};
