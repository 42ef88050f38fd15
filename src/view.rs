//! View state
//!
//! Everything a renderer needs, in display-ready form. Handlers write here;
//! the renderer only reads.

use crate::model::{Amount, MemoryType};
use crate::router::{NavLink, Overlay, Section};
use crate::sync::explorer::ExplorerView;
use crate::sync::memories::{self, MemoryRow};
use crate::sync::transactions::{self, TransactionRow};
use crate::sync::ListView;
use crate::upload::Preview;

/// Address text shown without a session
pub const LOGGED_OUT_ADDRESS: &str = "Not logged in";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot message from the last user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Account header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletView {
    pub address: Option<String>,
    pub balance: Amount,
}

impl WalletView {
    pub fn address_label(&self) -> &str {
        self.address.as_deref().unwrap_or(LOGGED_OUT_ADDRESS)
    }

    pub fn balance_label(&self) -> String {
        self.balance.to_string()
    }
}

/// Wallet issued by a successful registration
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedWallet {
    pub address: String,
    pub private_key: String,
}

impl std::fmt::Debug for IssuedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedWallet")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Registration overlay; once a wallet is issued the form is gone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationView {
    pub issued: Option<IssuedWallet>,
}

impl RegistrationView {
    pub fn form_visible(&self) -> bool {
        self.issued.is_none()
    }
}

/// Upload form as last rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadView {
    pub memory_type: MemoryType,
    pub description: String,
    pub file_name: Option<String>,
    pub preview: Preview,
}

impl Default for UploadView {
    fn default() -> Self {
        Self {
            memory_type: MemoryType::default(),
            description: String::new(),
            file_name: None,
            preview: Preview::Placeholder,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub section: Section,
    pub overlay: Overlay,
    pub nav: Vec<NavLink>,
    pub wallet: WalletView,
    pub memories: ListView<MemoryRow>,
    pub transactions: ListView<TransactionRow>,
    pub explorer: ExplorerView,
    pub upload: UploadView,
    pub registration: RegistrationView,
    /// A mine request is in flight
    pub mining: bool,
    pub transfer_to: String,
    pub transfer_amount: String,
    pub notice: Option<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            section: Section::Home,
            overlay: Overlay::None,
            nav: Vec::new(),
            wallet: WalletView::default(),
            memories: ListView::empty(memories::MESSAGES),
            transactions: ListView::empty(transactions::MESSAGES),
            explorer: ExplorerView::default(),
            upload: UploadView::default(),
            registration: RegistrationView::default(),
            mining: false,
            transfer_to: String::new(),
            transfer_amount: String::new(),
            notice: None,
        }
    }
}

impl ViewState {
    /// Drop everything tied to the account
    pub fn reset_account(&mut self) {
        self.wallet = WalletView::default();
        self.memories = ListView::empty(memories::MESSAGES);
        self.transactions = ListView::empty(transactions::MESSAGES);
        self.upload = UploadView::default();
        self.transfer_to.clear();
        self.transfer_amount.clear();
        self.mining = false;
    }

    pub fn mine_label(&self) -> &'static str {
        if self.mining {
            "Mining..."
        } else {
            "Mine Blocks"
        }
    }

    pub fn has_error(&self) -> bool {
        self.notice.as_ref().is_some_and(Notice::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logged_out_defaults() {
        let view = ViewState::default();
        assert_eq!(view.wallet.address_label(), "Not logged in");
        assert_eq!(view.wallet.balance_label(), "0.00");
        assert_eq!(view.memories.message(), Some("No memories uploaded yet."));
        assert_eq!(view.transactions.message(), Some("No transactions yet."));
        assert_eq!(view.mine_label(), "Mine Blocks");
        assert!(view.registration.form_visible());
    }

    #[test]
    fn test_reset_account() {
        let mut view = ViewState::default();
        view.wallet = WalletView {
            address: Some("A1".to_string()),
            balance: Amount::from_coins(3),
        };
        view.transfer_to = "B2".to_string();
        view.mining = true;

        view.reset_account();
        assert_eq!(view, ViewState::default());
    }

    #[test]
    fn test_issued_wallet_debug_hides_key() {
        let wallet = IssuedWallet {
            address: "N1".to_string(),
            private_key: "K1-secret".to_string(),
        };
        assert!(!format!("{:?}", wallet).contains("K1-secret"));
    }
}
