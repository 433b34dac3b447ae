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

//! Error types for account operations and transfer orchestration.

use crate::base::AccountId;
use thiserror::Error;

/// Errors raised while executing a transfer or mutating an account.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// Account balance is negative
    #[error("balance must be greater than 0")]
    BalanceLessThanZero,

    /// Account has no type
    #[error("user type is required")]
    UserTypeRequired,

    /// Debit would drive the balance below zero
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Merchant accounts may only receive funds
    #[error("user can not run debit operation")]
    DebitNotAllowed,

    /// Deposit would overflow the balance
    #[error("balance overflow")]
    BalanceOverflow,

    #[error("invalid sender")]
    InvalidSender,

    #[error("invalid recipient")]
    InvalidRecipient,

    /// Amount is zero or negative
    #[error("invalid amount")]
    InvalidAmount,

    /// Transfer date is unset
    #[error("invalid operation date")]
    InvalidDate,

    /// Authorizer answered, and the answer was no
    #[error("transfer not authorized")]
    AuthorizationDenied,

    #[error(transparent)]
    Authorizer(#[from] AuthorizerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TransferError {
    /// Returns `true` when the failure came from an unavailable collaborator
    /// and the same request may succeed later.
    ///
    /// Denials, validation and business-rule failures are final.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TransferError::Authorizer(AuthorizerError::Unavailable(_))
                | TransferError::Store(StoreError::Unavailable(_))
        )
    }
}

/// Errors reported by an [`AccountStore`](crate::AccountStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("account {0} already exists")]
    DuplicateAccount(AccountId),

    #[error("account store unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by an [`Authorizer`](crate::Authorizer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizerError {
    #[error("authorizer unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by a [`Notifier`](crate::Notifier).
///
/// Never surfaced to transfer callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}
