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

//! Thread-safe in-memory account store.
//!
//! Holds provisioned accounts and the log of saved transfer records. Record
//! ids are allocated from a monotonic counter starting at 1.

use crate::account::Account;
use crate::base::{AccountId, TransferId};
use crate::collaborators::AccountStore;
use crate::error::StoreError;
use crate::transfer::TransferRecord;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory [`AccountStore`].
#[derive(Debug)]
pub struct MemoryStore {
    accounts: DashMap<AccountId, Arc<Account>>,
    transfers: DashMap<TransferId, TransferRecord>,
    next_transfer_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            transfers: DashMap::new(),
            next_transfer_id: AtomicI64::new(1),
        }
    }

    /// Provisions an account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateAccount`] if an account with the same
    /// id already exists.
    pub fn insert_account(&self, account: Account) -> Result<Arc<Account>, StoreError> {
        // Entry API keeps check-and-insert atomic.
        match self.accounts.entry(account.id()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateAccount(account.id())),
            Entry::Vacant(entry) => {
                let account = Arc::new(account);
                entry.insert(Arc::clone(&account));
                Ok(account)
            }
        }
    }

    pub fn account(&self, id: AccountId) -> Option<Arc<Account>> {
        self.accounts.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// All accounts, ordered by id.
    pub fn accounts(&self) -> Vec<Arc<Account>> {
        let mut accounts: Vec<_> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        accounts.sort_by_key(|account| account.id());
        accounts
    }

    pub fn transfer(&self, id: TransferId) -> Option<TransferRecord> {
        self.transfers.get(&id).map(|entry| entry.value().clone())
    }

    /// All saved records, ordered by id.
    pub fn transfers(&self) -> Vec<TransferRecord> {
        let mut records: Vec<_> = self
            .transfers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        records
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for MemoryStore {
    fn load_account(&self, id: AccountId) -> Result<Arc<Account>, StoreError> {
        self.account(id).ok_or(StoreError::AccountNotFound(id))
    }

    fn save(&self, record: &TransferRecord) -> Result<TransferId, StoreError> {
        let id = TransferId(self.next_transfer_id.fetch_add(1, Ordering::SeqCst));
        let mut stored = record.clone();
        stored.id = Some(id);
        stored.updated_at = Utc::now();
        self.transfers.insert(id, stored);
        Ok(id)
    }
}
