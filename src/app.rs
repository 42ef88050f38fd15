//! Application controller
//!
//! `App` composes the session manager, router, pipelines and upload draft,
//! and owns the single [`ViewState`]. Each public async method is one user
//! event; when it finishes the view reflects the outcome and the renderer
//! hook (if any) has been called.

use std::sync::Arc;

use crate::api::LedgerApi;
use crate::error::{AppError, Operation};
use crate::router::{Overlay, Router, Section};
use crate::session::{AccountSnapshot, SessionManager};
use crate::store::CredentialStore;
use crate::sync::{explorer, memories, transactions, Pipeline};
use crate::upload::UploadDraft;
use crate::view::{Notice, RegistrationView, ViewState, WalletView};

/// Called with the view after every state change
pub type Renderer = Box<dyn FnMut(&ViewState) + Send>;

pub struct App {
    pub(crate) api: Arc<dyn LedgerApi>,
    pub(crate) session: SessionManager,
    pub(crate) router: Router,
    pub(crate) draft: UploadDraft,
    pub(crate) view: ViewState,
    renderer: Option<Renderer>,
}

impl App {
    pub fn new(api: Arc<dyn LedgerApi>, store: Arc<dyn CredentialStore>) -> Self {
        let session = SessionManager::new(Arc::clone(&api), store);
        let mut app = Self {
            api,
            session,
            router: Router::new(),
            draft: UploadDraft::default(),
            view: ViewState::default(),
            renderer: None,
        };
        app.refresh_chrome();
        app
    }

    pub fn with_renderer(mut self, renderer: impl FnMut(&ViewState) + Send + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Page load: restore any persisted session, then load the explorer
    pub async fn start(&mut self) {
        match self.session.restore().await {
            Some(account) => {
                self.enter_logged_in(account);
                self.sync(&[Pipeline::Memories, Pipeline::Transactions, Pipeline::Ledger])
                    .await;
            }
            None => {
                self.view.reset_account();
                self.sync(&[Pipeline::Ledger]).await;
            }
        }
        self.publish();
    }

    /// Activate a section and refresh its pipelines
    ///
    /// Returns `false` when the section is protected and there is no session.
    pub async fn navigate(&mut self, section: Section) -> bool {
        if !self.router.navigate(section, self.is_authenticated()) {
            self.publish();
            return false;
        }
        self.sync(section.pipelines()).await;
        self.publish();
        true
    }

    pub async fn login(&mut self, address: &str, private_key: &str) {
        self.view.notice = None;

        let account = match self.session.login(address, private_key).await {
            Ok(session) => session.address().to_string(),
            Err(e) => return self.fail(Operation::Login, e),
        };

        self.view.wallet.address = Some(account);
        self.router.close_overlay();
        self.router.navigate(Section::Dashboard, true);
        self.sync(Section::Dashboard.pipelines()).await;
        self.refresh_balance().await;
        self.publish();
    }

    /// Always ends logged out, whatever the server says
    pub async fn logout(&mut self) {
        self.session.logout().await;
        self.draft = UploadDraft::default();
        self.view.reset_account();
        self.view.notice = None;
        self.router.on_logged_out();
        self.publish();
    }

    /// Re-read the balance; failures are logged only
    pub async fn refresh_balance(&mut self) {
        match self.session.fetch_balance().await {
            Ok(account) => self.view.wallet.balance = account.balance,
            Err(e) => tracing::warn!(
                operation = %Operation::BalanceRefresh,
                error = %e,
                "Balance refresh failed"
            ),
        }
        self.publish();
    }

    /// Dashboard with a session, registration without
    pub async fn get_started(&mut self) {
        if self.is_authenticated() {
            self.navigate(Section::Dashboard).await;
        } else {
            self.open_overlay(Overlay::Register);
        }
    }

    pub async fn learn_more(&mut self) {
        self.navigate(Section::About).await;
    }

    /// Show an overlay, replacing any other
    pub fn open_overlay(&mut self, overlay: Overlay) {
        if self.router.overlay() == Overlay::Register && overlay != Overlay::Register {
            self.view.registration = RegistrationView::default();
        }
        self.router.open(overlay);
        self.publish();
    }

    /// Close the overlay; a closed registration forgets the issued wallet
    pub fn close_overlay(&mut self) {
        if self.router.overlay() == Overlay::Register {
            self.view.registration = RegistrationView::default();
        }
        self.router.close_overlay();
        self.publish();
    }

    pub fn dismiss_notice(&mut self) {
        self.view.notice = None;
        self.publish();
    }

    fn enter_logged_in(&mut self, account: AccountSnapshot) {
        self.view.wallet = WalletView {
            address: Some(account.address),
            balance: account.balance,
        };
        self.router.on_logged_in();
    }

    /// Run `pipelines` concurrently and apply results as one update
    pub(crate) async fn sync(&mut self, pipelines: &[Pipeline]) {
        let wants = |pipeline: Pipeline| pipelines.contains(&pipeline);
        let token = self.session.token().map(str::to_owned);
        let account = self.session.address().map(str::to_owned);

        if token.is_none() {
            for pipeline in pipelines.iter().filter(|p| p.requires_session()) {
                tracing::debug!(pipeline = %pipeline, "Skipping account pipeline without a session");
            }
        }

        let api = self.api.as_ref();
        let (memories_result, transactions_result, ledger_result) = tokio::join!(
            async {
                match token.as_deref() {
                    Some(token) if wants(Pipeline::Memories) => Some(memories::fetch(api, token).await),
                    _ => None,
                }
            },
            async {
                match token.as_deref() {
                    Some(token) if wants(Pipeline::Transactions) => {
                        Some(transactions::fetch(api, token).await)
                    }
                    _ => None,
                }
            },
            async {
                if wants(Pipeline::Ledger) {
                    Some(explorer::fetch(api).await)
                } else {
                    None
                }
            },
        );

        if let Some(result) = memories_result {
            self.view.memories = memories::apply(result);
        }
        if let (Some(result), Some(account)) = (transactions_result, account.as_deref()) {
            self.view.transactions = transactions::apply(result, account);
        }
        if let Some(result) = ledger_result {
            explorer::apply(&mut self.view.explorer, result);
        }
    }

    /// Surface a failed operation as an error notice
    pub(crate) fn fail(&mut self, operation: Operation, error: AppError) {
        match &error {
            AppError::Validation(message) => {
                tracing::debug!(operation = %operation, message = %message, "Rejected before request")
            }
            _ => tracing::warn!(operation = %operation, error = %error, "Operation failed"),
        }
        self.view.notice = Some(Notice::error(error.user_message(operation)));
        self.publish();
    }

    pub(crate) fn publish(&mut self) {
        self.refresh_chrome();
        if let Some(render) = self.renderer.as_mut() {
            render(&self.view);
        }
    }

    fn refresh_chrome(&mut self) {
        let authenticated = self.is_authenticated();
        self.view.section = self.router.active();
        self.view.overlay = self.router.overlay();
        self.view.nav = self.router.links(authenticated);
        self.view.wallet.address = self.session.address().map(str::to_owned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ChainSnapshot};
    use crate::model::{Amount, Block, TransactionRecord, TransactionType};
    use crate::session::AuthState;
    use crate::store::{MemoryCredentialStore, ADDRESS_KEY, TOKEN_KEY};
    use crate::testing::{Call, FakeApi};

    fn app_with(api: &Arc<FakeApi>, store: &MemoryCredentialStore) -> App {
        App::new(api.clone(), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn test_login_scenario() {
        let api = Arc::new(FakeApi::new());
        let store = MemoryCredentialStore::new();
        let mut app = app_with(&api, &store);

        app.login("A1", "k").await;

        let view = app.view();
        assert_eq!(view.section, Section::Dashboard);
        assert_eq!(view.wallet.address_label(), "A1");
        assert_eq!(view.wallet.balance_label(), "100.00");
        assert!(view.nav.iter().all(|link| link.enabled));

        let calls = api.calls();
        assert!(calls.contains(&Call::Balance("T1".to_string())));
        assert!(calls.contains(&Call::Memories("T1".to_string())));
        assert!(calls.contains(&Call::Transactions("T1".to_string())));
        assert_eq!(store.get(TOKEN_KEY).unwrap(), Some("T1".to_string()));
    }

    #[tokio::test]
    async fn test_failed_login_shows_notice() {
        let api = Arc::new(FakeApi::new());
        api.script(|s| {
            s.login = Err(ApiError::Rejected {
                status: 401,
                detail: None,
            })
        });
        let store = MemoryCredentialStore::new();
        let mut app = app_with(&api, &store);
        app.open_overlay(Overlay::Login);

        app.login("A1", "bad").await;

        let view = app.view();
        assert_eq!(view.section, Section::Home);
        assert_eq!(view.overlay, Overlay::Login);
        assert_eq!(
            view.notice,
            Some(Notice::error("Login failed with status 401"))
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_login_then_logout_round_trip() {
        let api = Arc::new(FakeApi::new());
        let store = MemoryCredentialStore::new();
        let mut app = app_with(&api, &store);
        let before = app.view().clone();

        app.login("A1", "k").await;
        app.navigate(Section::Upload).await;
        app.logout().await;

        assert_eq!(app.view(), &before);
        assert_eq!(app.session().state(), AuthState::LoggedOut);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_start_restores_session() {
        let api = Arc::new(FakeApi::new());
        let store = MemoryCredentialStore::with_credentials("T1", "A1");
        let mut app = app_with(&api, &store);

        app.start().await;

        assert!(app.is_authenticated());
        assert_eq!(app.view().section, Section::Dashboard);
        assert_eq!(app.view().wallet.balance_label(), "100.00");
        let calls = api.calls();
        assert_eq!(calls[0], Call::Balance("T1".to_string()));
        assert!(calls.contains(&Call::Chain));
        assert!(calls.contains(&Call::Memories("T1".to_string())));
    }

    #[tokio::test]
    async fn test_start_with_rejected_token() {
        let api = Arc::new(FakeApi::new());
        api.script(|s| {
            s.balance = Err(ApiError::Rejected {
                status: 401,
                detail: None,
            })
        });
        let store = MemoryCredentialStore::with_credentials("T1", "A1");
        let mut app = app_with(&api, &store);

        app.start().await;

        assert!(!app.is_authenticated());
        assert!(store.is_empty());
        assert_eq!(app.view().section, Section::Home);
        assert_eq!(app.view().wallet.address_label(), "Not logged in");
        // Never fatal, never shown
        assert_eq!(app.view().notice, None);
        assert_eq!(api.calls(), vec![Call::Balance("T1".to_string()), Call::Chain]);
    }

    #[tokio::test]
    async fn test_protected_navigation_without_session() {
        let api = Arc::new(FakeApi::new());
        let mut app = app_with(&api, &MemoryCredentialStore::new());
        app.navigate(Section::About).await;

        assert!(!app.navigate(Section::Dashboard).await);
        assert!(!app.navigate(Section::Upload).await);
        assert_eq!(app.view().section, Section::About);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_explorer_visit_refreshes_totals() {
        let tx = |tx_type| TransactionRecord {
            from_address: Some("A1".to_string()),
            to_address: "B2".to_string(),
            amount: Amount::from_coins(1),
            tx_type,
            timestamp: 0,
        };
        let block = |index, transactions| Block {
            index,
            timestamp: 0,
            hash: format!("h{}", index),
            previous_hash: "0".to_string(),
            miner_address: Some("M1".to_string()),
            nonce: 0,
            transactions,
        };

        let api = Arc::new(FakeApi::new());
        api.script(|s| {
            s.chain = Ok(ChainSnapshot {
                chain: vec![
                    block(
                        1,
                        vec![
                            tx(TransactionType::Transfer),
                            tx(TransactionType::MemoryReward),
                            tx(TransactionType::Transfer),
                        ],
                    ),
                    block(2, Vec::new()),
                ],
                pending_transactions: Vec::new(),
            })
        });
        let mut app = app_with(&api, &MemoryCredentialStore::new());

        assert!(app.navigate(Section::BlockchainExplorer).await);
        let stats = app.view().explorer.stats;
        assert_eq!((stats.blocks, stats.transactions, stats.memories), (2, 3, 1));

        // Fresh data on every visit
        app.navigate(Section::Home).await;
        app.navigate(Section::BlockchainExplorer).await;
        assert_eq!(
            api.calls().iter().filter(|call| **call == Call::Chain).count(),
            2
        );
    }

    #[tokio::test]
    async fn test_dashboard_pipeline_is_idempotent() {
        let api = Arc::new(FakeApi::new());
        api.script(|s| {
            s.transactions = Ok(vec![TransactionRecord {
                from_address: None,
                to_address: "A1".to_string(),
                amount: Amount::from_coins(10),
                tx_type: TransactionType::MemoryReward,
                timestamp: 1_700_000_000,
            }])
        });
        let mut app = app_with(&api, &MemoryCredentialStore::new());
        app.login("A1", "k").await;
        let first = app.view().transactions.clone();

        app.navigate(Section::Dashboard).await;
        assert_eq!(app.view().transactions, first);
        assert_eq!(first.rows()[0].amount, "+10.00");
    }

    #[tokio::test]
    async fn test_pipeline_failure_renders_message() {
        let api = Arc::new(FakeApi::new());
        api.script(|s| s.memories = Err(ApiError::Transport("down".to_string())));
        let mut app = app_with(&api, &MemoryCredentialStore::new());

        app.login("A1", "k").await;

        assert_eq!(
            app.view().memories.message(),
            Some("Error loading memories. Please try again.")
        );
        assert_eq!(app.view().transactions.message(), Some("No transactions yet."));
    }

    #[tokio::test]
    async fn test_get_started_and_learn_more() {
        let api = Arc::new(FakeApi::new());
        let mut app = app_with(&api, &MemoryCredentialStore::new());

        app.get_started().await;
        assert_eq!(app.view().overlay, Overlay::Register);
        assert_eq!(app.view().section, Section::Home);

        app.learn_more().await;
        assert_eq!(app.view().section, Section::About);

        app.close_overlay();
        app.login("A1", "k").await;
        app.navigate(Section::Home).await;
        app.get_started().await;
        assert_eq!(app.view().section, Section::Dashboard);
    }

    #[tokio::test]
    async fn test_logout_from_public_section_stays() {
        let api = Arc::new(FakeApi::new());
        let store = MemoryCredentialStore::with_credentials("T1", "A1");
        let mut app = app_with(&api, &store);
        app.start().await;
        app.navigate(Section::BlockchainExplorer).await;

        app.logout().await;
        assert_eq!(app.view().section, Section::BlockchainExplorer);
        assert_eq!(store.get(ADDRESS_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_renderer_sees_every_publish() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let api = Arc::new(FakeApi::new());
        let mut app = app_with(&api, &MemoryCredentialStore::new())
            .with_renderer(move |view| sink.lock().unwrap().push(view.section));

        app.navigate(Section::About).await;
        app.navigate(Section::Upload).await;

        assert_eq!(*seen.lock().unwrap(), vec![Section::About, Section::About]);
    }
}
