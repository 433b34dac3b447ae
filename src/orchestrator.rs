// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Transfer orchestration.
//!
//! The [`TransferOrchestrator`] executes one transfer request end to end
//! against three collaborators: an [`AccountStore`], an [`Authorizer`] and a
//! [`Notifier`].
//!
//! # Stages
//!
//! | Stage | Behavior |
//! |-------|----------|
//! | Resolve | Loads sender and recipient from the store |
//! | Authorize | Checks the sender could be debited, then asks the authorizer |
//! | Debit | Takes the value from the sender |
//! | Validate | Builds the transfer record and validates it |
//! | Credit | Adds the value to the recipient |
//! | Persist | Saves the record, obtaining its id |
//!
//! Any failing stage ends the transfer as rejected. Stages after the debit
//! compensate before rejecting, so a rejected transfer leaves both balances
//! as they were. A settled transfer then notifies the recipient; delivery
//! failures are logged and never change the outcome.
//!
//! # Thread Safety
//!
//! Each transfer holds the transfer locks of its two accounts (see
//! [`AccountLocks`]) from Resolve through Persist. Transfers over disjoint
//! account pairs run concurrently.

use crate::TransferError;
use crate::account::Account;
use crate::base::TransferId;
use crate::collaborators::{AccountStore, Authorizer, Notifier};
use crate::config::OrchestratorConfig;
use crate::locks::AccountLocks;
use crate::transfer::{TransferOutcome, TransferRecord, TransferRequest};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Resolve,
    Authorize,
    Debit,
    Validate,
    Credit,
    Persist,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Resolve => "resolve",
            Stage::Authorize => "authorize",
            Stage::Debit => "debit",
            Stage::Validate => "validate",
            Stage::Credit => "credit",
            Stage::Persist => "persist",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct Rejection {
    stage: Stage,
    error: TransferError,
}

impl Rejection {
    fn new(stage: Stage, error: impl Into<TransferError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

struct Settled {
    id: TransferId,
    recipient: Arc<Account>,
}

/// Executes peer-to-peer transfers.
///
/// # Invariants
///
/// - The authorizer is consulted before the sender is debited.
/// - A record is persisted only for a transfer that settles.
/// - A rejected transfer carries no id and leaves no balance change behind,
///   unless a compensation itself fails (logged at error level).
pub struct TransferOrchestrator {
    store: Arc<dyn AccountStore>,
    authorizer: Arc<dyn Authorizer>,
    notifier: Arc<dyn Notifier>,
    config: OrchestratorConfig,
    locks: AccountLocks,
}

impl TransferOrchestrator {
    /// Creates an orchestrator with the default configuration.
    pub fn new(
        store: Arc<dyn AccountStore>,
        authorizer: Arc<dyn Authorizer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_config(store, authorizer, notifier, OrchestratorConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn AccountStore>,
        authorizer: Arc<dyn Authorizer>,
        notifier: Arc<dyn Notifier>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            store,
            authorizer,
            notifier,
            config,
            locks: AccountLocks::new(),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Executes one transfer request.
    ///
    /// Always returns a terminal outcome: success with the persisted id, or
    /// rejected with the error of the stage that failed.
    ///
    /// # Rejections
    ///
    /// - [`TransferError::Store`] - An account could not be loaded or the
    ///   record could not be saved, surfaced as the store reported it.
    /// - [`TransferError::InsufficientBalance`] - Sender cannot cover the value.
    /// - [`TransferError::AuthorizationDenied`] - Authorizer said no.
    /// - [`TransferError::Authorizer`] - Authorizer could not answer.
    /// - [`TransferError::DebitNotAllowed`] - Sender is a merchant.
    /// - [`TransferError::InvalidAmount`] - Value is zero or negative.
    /// - Any record validation error.
    pub fn execute(&self, request: &TransferRequest) -> TransferOutcome {
        let settled = self
            .locks
            .with_pair(request.sender, request.recipient, || self.settle(request));

        match settled {
            Ok(settled) => {
                info!(
                    transfer_id = %settled.id,
                    sender = %request.sender,
                    recipient = %request.recipient,
                    value = request.value,
                    requested_at = %request.date,
                    "Transfer settled"
                );
                self.notify(&settled);
                TransferOutcome::success(settled.id)
            }
            Err(rejection) => {
                warn!(
                    sender = %request.sender,
                    recipient = %request.recipient,
                    value = request.value,
                    requested_at = %request.date,
                    stage = %rejection.stage,
                    error = %rejection.error,
                    "Transfer rejected"
                );
                TransferOutcome::rejected(rejection.error)
            }
        }
    }

    /// Runs every stage up to and including persistence. Called with both
    /// transfer locks held.
    fn settle(&self, request: &TransferRequest) -> Result<Settled, Rejection> {
        let value = request.value;

        let sender = self
            .store
            .load_account(request.sender)
            .map_err(|e| Rejection::new(Stage::Resolve, e))?;
        let recipient = self
            .store
            .load_account(request.recipient)
            .map_err(|e| Rejection::new(Stage::Resolve, e))?;

        // Merchants, non-positive values and underfunded senders never reach
        // the authorizer.
        sender
            .check_transferable(value)
            .map_err(|e| Rejection::new(Stage::Debit, e))?;

        let authorized = self
            .authorizer
            .is_authorized(&self.config.authorization_key)
            .map_err(|e| Rejection::new(Stage::Authorize, e))?;
        if !authorized {
            return Err(Rejection::new(
                Stage::Authorize,
                TransferError::AuthorizationDenied,
            ));
        }

        sender
            .debit(value)
            .map_err(|e| Rejection::new(Stage::Debit, e))?;
        debug!(sender = %sender.id(), value, "Sender debited");

        let mut record = TransferRecord::new();
        record.sender = sender.id();
        record.recipient = recipient.id();
        record.value = value;
        record.date = Some(Utc::now());

        if let Err(error) = record.is_valid() {
            self.refund(&sender, value);
            return Err(Rejection::new(Stage::Validate, error));
        }

        if let Err(error) = recipient.deposit(value) {
            self.refund(&sender, value);
            return Err(Rejection::new(Stage::Credit, error));
        }
        debug!(recipient = %recipient.id(), value, "Recipient credited");

        match self.store.save(&record) {
            Ok(id) => Ok(Settled { id, recipient }),
            Err(error) => {
                self.reverse_credit(&recipient, value);
                self.refund(&sender, value);
                Err(Rejection::new(Stage::Persist, error))
            }
        }
    }

    fn refund(&self, sender: &Account, value: i64) {
        if let Err(error) = sender.deposit(value) {
            error!(sender = %sender.id(), value, error = %error, "Failed to refund sender");
        }
    }

    fn reverse_credit(&self, recipient: &Account, value: i64) {
        if let Err(error) = recipient.reverse_deposit(value) {
            error!(
                recipient = %recipient.id(),
                value,
                error = %error,
                "Failed to reverse recipient credit"
            );
        }
    }

    fn notify(&self, settled: &Settled) {
        if let Err(error) = self
            .notifier
            .send(settled.recipient.email(), &self.config.notification_message)
        {
            error!(
                transfer_id = %settled.id,
                recipient = %settled.recipient.id(),
                error = %error,
                "Failed to send transfer notification"
            );
        }
    }
}
