//! Action handlers: register, mine, transfer
//!
//! Each handler performs one request/response cycle. Local validation runs
//! first and, when it fails, no request is issued and no state changes
//! beyond the error notice.

use crate::api::TransferRequest;
use crate::app::App;
use crate::error::{AppError, Operation};
use crate::model::Amount;
use crate::sync::Pipeline;
use crate::view::{IssuedWallet, Notice};

impl App {
    /// Create a wallet; a success reveals its address and private key
    ///
    /// The reveal is one-way: while a wallet is shown, further calls issue no
    /// request.
    pub async fn register(&mut self) {
        if self.view.registration.issued.is_some() {
            tracing::debug!("Wallet already revealed, ignoring register");
            return;
        }
        self.view.notice = None;

        match self.api.register().await {
            Ok(wallet) => {
                tracing::info!(address = %wallet.address, "Wallet created");
                self.view.registration.issued = Some(IssuedWallet {
                    address: wallet.address,
                    private_key: wallet.private_key,
                });
                self.publish();
            }
            Err(e) => self.fail(Operation::Register, e.into()),
        }
    }

    /// Mine pending transactions for the current account
    ///
    /// The control shows `Mining...` while the request is in flight.
    pub async fn mine(&mut self) {
        self.view.notice = None;

        let Some(token) = self.session.token().map(str::to_owned) else {
            return self.fail(
                Operation::Mine,
                AppError::validation("Please log in to mine blocks"),
            );
        };

        self.view.mining = true;
        self.publish();
        let result = self.api.mine(&token).await;
        self.view.mining = false;

        match result {
            Ok(update) => {
                tracing::info!(balance = %update.balance, "Mined block");
                self.view.wallet.balance = update.balance;
                self.view.notice = Some(Notice::success(format!(
                    "Mining successful! New balance: {} AHM",
                    update.balance
                )));
                self.sync(&[Pipeline::Transactions]).await;
                self.publish();
            }
            Err(e) => self.fail(Operation::Mine, e.into()),
        }
    }

    /// Set the transfer form inputs as typed
    pub fn set_transfer_inputs(&mut self, to_address: impl Into<String>, amount: impl Into<String>) {
        self.view.transfer_to = to_address.into();
        self.view.transfer_amount = amount.into();
    }

    /// Send coins using the transfer form inputs
    ///
    /// On success both inputs are cleared; on failure they are kept.
    pub async fn transfer(&mut self) {
        self.view.notice = None;

        let Some(token) = self.session.token().map(str::to_owned) else {
            return self.fail(
                Operation::Transfer,
                AppError::validation("Please log in to transfer coins"),
            );
        };

        let to_address = self.view.transfer_to.trim().to_string();
        let amount = self
            .view
            .transfer_amount
            .trim()
            .parse::<Amount>()
            .ok()
            .filter(|amount| amount.is_positive());

        let request = match amount {
            Some(amount) if !to_address.is_empty() => TransferRequest { to_address, amount },
            _ => {
                return self.fail(
                    Operation::Transfer,
                    AppError::validation("Please enter a valid address and amount"),
                )
            }
        };

        tracing::info!(to = %request.to_address, amount = %request.amount, "Transferring coins");
        match self.api.transfer(&token, &request).await {
            Ok(update) => {
                self.view.wallet.balance = update.balance;
                self.view.transfer_to.clear();
                self.view.transfer_amount.clear();
                self.view.notice = Some(Notice::success(format!(
                    "Transfer successful! New balance: {} AHM",
                    update.balance
                )));
                self.sync(&[Pipeline::Transactions]).await;
                self.publish();
            }
            Err(e) => self.fail(Operation::Transfer, e.into()),
        }
    }
}
