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

//! Transfer requests, records and outcomes.
//!
//! A [`TransferRecord`] is built fresh for every attempt and validated before
//! it is handed to the store. Validation short-circuits in a fixed order:
//! sender, recipient, amount, date.

use crate::TransferError;
use crate::base::{AccountId, TransferId};
use chrono::{DateTime, Utc};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A request to move `value` from `sender` to `recipient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// When the caller issued the request. Informational only: it is logged,
    /// but the persisted record is dated when the transfer settles.
    pub date: DateTime<Utc>,
    #[serde(rename = "senderId")]
    pub sender: AccountId,
    #[serde(rename = "recipientId")]
    pub recipient: AccountId,
    /// Amount in the smallest currency unit.
    pub value: i64,
}

impl TransferRequest {
    pub fn new(sender: AccountId, recipient: AccountId, value: i64) -> Self {
        Self {
            date: Utc::now(),
            sender,
            recipient,
            value,
        }
    }
}

/// Persisted artifact of one transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Assigned by the store on save.
    pub id: Option<TransferId>,
    pub sender: AccountId,
    pub recipient: AccountId,
    pub value: i64,
    pub date: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransferRecord {
    /// Creates an empty record stamped with the current time.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: None,
            sender: AccountId(0),
            recipient: AccountId(0),
            value: 0,
            date: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// # Errors
    ///
    /// The first failing check wins:
    /// - [`TransferError::InvalidSender`] - Sender id is not positive.
    /// - [`TransferError::InvalidRecipient`] - Recipient id is not positive.
    /// - [`TransferError::InvalidAmount`] - Value is not positive.
    /// - [`TransferError::InvalidDate`] - Date is unset.
    pub fn is_valid(&self) -> Result<(), TransferError> {
        if self.sender.0 <= 0 {
            return Err(TransferError::InvalidSender);
        }
        if self.recipient.0 <= 0 {
            return Err(TransferError::InvalidRecipient);
        }
        if self.value <= 0 {
            return Err(TransferError::InvalidAmount);
        }
        if self.date.is_none() {
            return Err(TransferError::InvalidDate);
        }
        Ok(())
    }
}

impl Default for TransferRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Success,
    Rejected,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Success => f.write_str("success"),
            TransferStatus::Rejected => f.write_str("rejected"),
        }
    }
}

/// Terminal result of one transfer request.
///
/// A successful outcome always carries the persisted id. A rejected one never
/// does, and carries the error that stopped it instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    status: TransferStatus,
    id: Option<TransferId>,
    error: Option<TransferError>,
}

impl TransferOutcome {
    pub fn success(id: TransferId) -> Self {
        Self {
            status: TransferStatus::Success,
            id: Some(id),
            error: None,
        }
    }

    pub fn rejected(error: TransferError) -> Self {
        Self {
            status: TransferStatus::Rejected,
            id: None,
            error: Some(error),
        }
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == TransferStatus::Success
    }

    pub fn id(&self) -> Option<TransferId> {
        self.id
    }

    pub fn error(&self) -> Option<&TransferError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

impl From<Result<TransferId, TransferError>> for TransferOutcome {
    fn from(result: Result<TransferId, TransferError>) -> Self {
        match result {
            Ok(id) => Self::success(id),
            Err(error) => Self::rejected(error),
        }
    }
}

impl Serialize for TransferOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("TransferOutcome", 3)?;
        state.serialize_field("status", &self.status)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("errorMessage", &self.error_message())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_timestamps_and_no_business_fields() {
        let record = TransferRecord::new();
        assert_eq!(record.created_at, record.updated_at);
        assert_eq!(record.id, None);
        assert_eq!(record.sender, AccountId(0));
        assert_eq!(record.recipient, AccountId(0));
        assert_eq!(record.value, 0);
        assert_eq!(record.date, None);
        assert_eq!(record.error_message, None);
    }

    #[test]
    fn rejected_outcome_serializes_error_message() {
        let outcome = TransferOutcome::rejected(TransferError::AuthorizationDenied);
        let parsed = serde_json::to_value(&outcome).unwrap();
        assert_eq!(parsed["status"], "rejected");
        assert!(parsed["id"].is_null());
        assert_eq!(parsed["errorMessage"], "transfer not authorized");
    }

    #[test]
    fn success_outcome_serializes_id() {
        let outcome = TransferOutcome::success(TransferId(12));
        let parsed = serde_json::to_value(&outcome).unwrap();
        assert_eq!(parsed["status"], "success");
        assert_eq!(parsed["id"], 12);
        assert!(parsed["errorMessage"].is_null());
    }

    #[test]
    fn outcome_from_result() {
        let ok = TransferOutcome::from(Ok(TransferId(3)));
        assert!(ok.is_success());
        assert_eq!(ok.id(), Some(TransferId(3)));

        let err = TransferOutcome::from(Err(TransferError::InsufficientBalance));
        assert_eq!(err.status(), TransferStatus::Rejected);
        assert_eq!(err.id(), None);
        assert_eq!(err.error(), Some(&TransferError::InsufficientBalance));
    }

    #[test]
    fn request_uses_wire_field_names() {
        let json = r#"{"date":"2024-05-01T12:00:00Z","senderId":4,"recipientId":15,"value":100}"#;
        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.sender, AccountId(4));
        assert_eq!(request.recipient, AccountId(15));
        assert_eq!(request.value, 100);
    }
}
