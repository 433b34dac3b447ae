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

//! # P2P Transfer
//!
//! This library provides the core of a peer-to-peer payments backend: it moves
//! funds between two accounts, enforcing balance and business rules before
//! committing a transfer record.
//!
//! ## Core Components
//!
//! - [`Account`]: Balance holder with lock-guarded debit and deposit
//! - [`TransferRecord`]: Validated artifact of one transfer
//! - [`TransferOrchestrator`]: Runs a transfer through load, authorization,
//!   debit, persistence and notification
//! - [`AccountStore`], [`Authorizer`], [`Notifier`]: Collaborators the
//!   orchestrator consumes
//! - [`TransferError`]: Error types for rejected transfers
//!
//! ## Example
//!
//! ```
//! use p2p_transfer_rs::{
//!     Account, AccountId, AccountKind, LogNotifier, MemoryStore, OrchestratorConfig,
//!     StaticAuthorizer, TransferOrchestrator, TransferRequest,
//! };
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryStore::new());
//! store.insert_account(Account::new(AccountId(1), AccountKind::Common, 10_000)).unwrap();
//! store.insert_account(Account::new(AccountId(2), AccountKind::Merchant, 0)).unwrap();
//!
//! let config = OrchestratorConfig::default();
//! let authorizer = Arc::new(StaticAuthorizer::new(config.authorization_key.clone()));
//! let orchestrator =
//!     TransferOrchestrator::with_config(store.clone(), authorizer, Arc::new(LogNotifier), config);
//!
//! let outcome = orchestrator.execute(&TransferRequest::new(AccountId(1), AccountId(2), 5_000));
//! assert!(outcome.is_success());
//! assert_eq!(store.account(AccountId(1)).unwrap().balance(), 5_000);
//! assert_eq!(store.account(AccountId(2)).unwrap().balance(), 5_000);
//! ```
//!
//! ## Thread Safety
//!
//! Each account serializes its own balance operations. The orchestrator locks
//! the two accounts of a transfer in ascending id order, so transfers over
//! unrelated accounts proceed in parallel.

pub mod account;
pub mod adapters;
mod base;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod locks;
pub mod logging;
mod orchestrator;
pub mod store;
mod transfer;

pub use account::{Account, AccountKind, AccountProfile};
pub use adapters::{LogNotifier, StaticAuthorizer};
pub use base::{AccountId, TransferId};
pub use collaborators::{AccountStore, Authorizer, Notifier};
pub use config::OrchestratorConfig;
pub use error::{AuthorizerError, NotifierError, StoreError, TransferError};
pub use orchestrator::TransferOrchestrator;
pub use store::MemoryStore;
pub use transfer::{TransferOutcome, TransferRecord, TransferRequest, TransferStatus};
