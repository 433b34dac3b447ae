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

//! Account management.
//!
//! An [`Account`] owns its balance. Every balance read or mutation takes the
//! account's own lock for the duration of that single call, so operations on
//! one account are linearized. Nothing here spans two accounts.
//!
//! # Example
//!
//! ```
//! use p2p_transfer_rs::{Account, AccountId, AccountKind};
//!
//! let account = Account::new(AccountId(1), AccountKind::Common, 10_000);
//! account.debit(2_500).unwrap();
//! assert_eq!(account.balance(), 7_500);
//! ```

use crate::TransferError;
use crate::base::AccountId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use std::fmt;

/// Account type. Merchants can receive funds but never send them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Common,
    Merchant,
}

/// Display and contact fields set at provisioning time.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountProfile {
    pub full_name: String,
    pub document: String,
    pub email: String,
    pub credential: String,
}

impl fmt::Debug for AccountProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountProfile")
            .field("full_name", &self.full_name)
            .field("document", &self.document)
            .field("email", &self.email)
            .field("credential", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
struct AccountData {
    /// Balance in the smallest currency unit.
    balance: i64,
    updated_at: DateTime<Utc>,
}

impl AccountData {
    fn new(balance: i64, now: DateTime<Utc>) -> Self {
        Self {
            balance,
            updated_at: now,
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.balance >= 0,
            "Invariant violated: balance went negative: {}",
            self.balance
        );
    }

    /// Balance left after taking `amount`, if it stays non-negative.
    fn remaining_after(&self, amount: i64) -> Result<i64, TransferError> {
        self.balance
            .checked_sub(amount)
            .filter(|remaining| *remaining >= 0)
            .ok_or(TransferError::InsufficientBalance)
    }

    /// Balance left after a withdrawal of `amount`, rejecting non-positive
    /// amounts.
    fn withdrawable(&self, amount: i64) -> Result<i64, TransferError> {
        if amount <= 0 {
            return Err(TransferError::InvalidAmount);
        }
        self.remaining_after(amount)
    }

    /// Decreases the balance.
    fn withdraw(&mut self, amount: i64) -> Result<(), TransferError> {
        self.balance = self.withdrawable(amount)?;
        self.updated_at = Utc::now();
        self.assert_invariants();
        Ok(())
    }

    /// Increases the balance.
    fn credit(&mut self, amount: i64) -> Result<(), TransferError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow)?;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Ledger account.
///
/// Identity, type and profile are fixed at provisioning. The balance lives
/// behind the account's lock.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    kind: Option<AccountKind>,
    profile: AccountProfile,
    created_at: DateTime<Utc>,
    inner: Mutex<AccountData>,
}

impl Account {
    pub fn new(id: AccountId, kind: AccountKind, balance: i64) -> Self {
        Self::provision(id, Some(kind), balance)
    }

    /// Creates an account whose type was never set. Such an account fails
    /// [`Account::is_valid`].
    pub fn untyped(id: AccountId, balance: i64) -> Self {
        Self::provision(id, None, balance)
    }

    fn provision(id: AccountId, kind: Option<AccountKind>, balance: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            kind,
            profile: AccountProfile::default(),
            created_at: now,
            inner: Mutex::new(AccountData::new(balance, now)),
        }
    }

    pub fn with_profile(mut self, profile: AccountProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn kind(&self) -> Option<AccountKind> {
        self.kind
    }

    pub fn profile(&self) -> &AccountProfile {
        &self.profile
    }

    pub fn email(&self) -> &str {
        &self.profile.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.inner.lock().updated_at
    }

    /// Point-in-time snapshot of the balance.
    pub fn balance(&self) -> i64 {
        self.inner.lock().balance
    }

    /// Checks that `amount` could be taken without going negative. Never
    /// mutates.
    pub fn check_debit(&self, amount: i64) -> Result<(), TransferError> {
        self.inner.lock().remaining_after(amount).map(|_| ())
    }

    /// Runs every check [`Account::debit`] would run, in the same order,
    /// without taking anything.
    pub(crate) fn check_transferable(&self, amount: i64) -> Result<(), TransferError> {
        if self.kind == Some(AccountKind::Merchant) {
            return Err(TransferError::DebitNotAllowed);
        }
        self.inner.lock().withdrawable(amount).map(|_| ())
    }

    /// Takes `amount` from the balance.
    ///
    /// # Errors
    ///
    /// - [`TransferError::DebitNotAllowed`] - Account is a merchant.
    /// - [`TransferError::InvalidAmount`] - `amount` is zero or negative.
    /// - [`TransferError::InsufficientBalance`] - Balance would go negative.
    pub fn debit(&self, amount: i64) -> Result<(), TransferError> {
        if self.kind == Some(AccountKind::Merchant) {
            return Err(TransferError::DebitNotAllowed);
        }
        self.inner.lock().withdraw(amount)
    }

    /// Adds `amount` to the balance. Non-positive amounts are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::BalanceOverflow`] if the balance cannot hold
    /// the sum.
    pub fn deposit(&self, amount: i64) -> Result<(), TransferError> {
        if amount <= 0 {
            return Ok(());
        }
        self.inner.lock().credit(amount)
    }

    /// Takes back a deposit made by a transfer that was later rejected.
    /// Unlike [`Account::debit`] this applies to merchants too.
    pub(crate) fn reverse_deposit(&self, amount: i64) -> Result<(), TransferError> {
        self.inner.lock().withdraw(amount)
    }

    /// # Errors
    ///
    /// - [`TransferError::BalanceLessThanZero`] - Balance is negative.
    /// - [`TransferError::UserTypeRequired`] - Account type is unset.
    pub fn is_valid(&self) -> Result<(), TransferError> {
        if self.balance() < 0 {
            return Err(TransferError::BalanceLessThanZero);
        }
        if self.kind.is_none() {
            return Err(TransferError::UserTypeRequired);
        }
        Ok(())
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Account", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("full_name", &self.profile.full_name)?;
        state.serialize_field("email", &self.profile.email)?;
        state.serialize_field("balance", &data.balance)?;
        state.serialize_field("updated_at", &data.updated_at)?;
        state.end()
    }
}
