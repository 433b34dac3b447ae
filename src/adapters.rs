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

//! In-process collaborators for local runs.

use crate::collaborators::{Authorizer, Notifier};
use crate::error::{AuthorizerError, NotifierError};
use tracing::info;

/// Grants authorization to holders of one pre-shared key.
#[derive(Debug, Clone)]
pub struct StaticAuthorizer {
    key: String,
    allow: bool,
}

impl StaticAuthorizer {
    /// Grants every request presenting `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            allow: true,
        }
    }

    /// Denies every request, whatever key it presents.
    pub fn deny_all() -> Self {
        Self {
            key: String::new(),
            allow: false,
        }
    }
}

impl Authorizer for StaticAuthorizer {
    fn is_authorized(&self, key: &str) -> Result<bool, AuthorizerError> {
        Ok(self.allow && key == self.key)
    }
}

/// Delivers notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, recipient_email: &str, message: &str) -> Result<(), NotifierError> {
        if recipient_email.is_empty() {
            return Err(NotifierError::Delivery("recipient has no email".into()));
        }
        info!(recipient = recipient_email, body = message, "Notification sent");
        Ok(())
    }
}
