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

//! Interfaces the orchestrator consumes.
//!
//! All calls block the calling thread until they return. Implementations are
//! shared across worker threads behind an `Arc`, hence `Send + Sync`.

use crate::account::Account;
use crate::base::{AccountId, TransferId};
use crate::error::{AuthorizerError, NotifierError, StoreError};
use crate::transfer::TransferRecord;
use std::sync::Arc;

/// Source of accounts and sink of transfer records.
pub trait AccountStore: Send + Sync {
    /// Resolves a live account handle. Balance changes made through the
    /// handle are visible to every other holder of it.
    fn load_account(&self, id: AccountId) -> Result<Arc<Account>, StoreError>;

    /// Persists a validated record and returns its generated id.
    fn save(&self, record: &TransferRecord) -> Result<TransferId, StoreError>;
}

/// External service granting or denying permission for a transfer.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self, key: &str) -> Result<bool, AuthorizerError>;
}

/// Best-effort message delivery to a transfer recipient.
pub trait Notifier: Send + Sync {
    fn send(&self, recipient_email: &str, message: &str) -> Result<(), NotifierError>;
}
