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

//! Transfer record validation tests.

use chrono::Utc;
use p2p_transfer_rs::{AccountId, TransferError, TransferRecord};

fn make_record(sender: i64, recipient: i64, value: i64) -> TransferRecord {
    let mut record = TransferRecord::new();
    record.sender = AccountId(sender);
    record.recipient = AccountId(recipient);
    record.value = value;
    record.date = Some(Utc::now());
    record
}

#[test]
fn complete_record_is_valid() {
    assert_eq!(make_record(25, 12, 5_000).is_valid(), Ok(()));
}

#[test]
fn missing_date_returns_invalid_date() {
    let mut record = make_record(25, 12, 5_000);
    record.date = None;
    assert_eq!(record.is_valid(), Err(TransferError::InvalidDate));
}

#[test]
fn zero_value_returns_invalid_amount() {
    assert_eq!(make_record(25, 12, 0).is_valid(), Err(TransferError::InvalidAmount));
}

#[test]
fn negative_value_returns_invalid_amount() {
    assert_eq!(make_record(25, 12, -1).is_valid(), Err(TransferError::InvalidAmount));
}

#[test]
fn missing_sender_returns_invalid_sender() {
    assert_eq!(make_record(0, 12, 5_000).is_valid(), Err(TransferError::InvalidSender));
    assert_eq!(make_record(-3, 12, 5_000).is_valid(), Err(TransferError::InvalidSender));
}

#[test]
fn missing_recipient_returns_invalid_recipient() {
    assert_eq!(
        make_record(25, 0, 5_000).is_valid(),
        Err(TransferError::InvalidRecipient)
    );
}

// === Priority Order ===

#[test]
fn sender_is_checked_first() {
    let mut record = TransferRecord::new();
    record.date = None;
    assert_eq!(record.is_valid(), Err(TransferError::InvalidSender));
}

#[test]
fn recipient_is_checked_before_amount_and_date() {
    let mut record = make_record(25, 0, 0);
    record.date = None;
    assert_eq!(record.is_valid(), Err(TransferError::InvalidRecipient));
}

#[test]
fn amount_is_checked_before_date() {
    let mut record = make_record(25, 12, 0);
    record.date = None;
    assert_eq!(record.is_valid(), Err(TransferError::InvalidAmount));
}
