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

//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Pre-shared token naming the "transfer" authorization scope.
pub const DEFAULT_AUTHORIZATION_KEY: &str = "5794d450-d2e2-4412-8131-73d0293ac1cc";

pub const DEFAULT_NOTIFICATION_MESSAGE: &str = "You have received a transfer";

/// Settings owned by the orchestrator's collaborator wiring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Key presented to the authorizer for every transfer.
    pub authorization_key: String,
    /// Body of the message sent to the recipient of a settled transfer.
    pub notification_message: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            authorization_key: DEFAULT_AUTHORIZATION_KEY.to_string(),
            notification_message: DEFAULT_NOTIFICATION_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: OrchestratorConfig =
            serde_json::from_str(r#"{"notification_message":"Funds arrived"}"#).unwrap();
        assert_eq!(config.authorization_key, DEFAULT_AUTHORIZATION_KEY);
        assert_eq!(config.notification_message, "Funds arrived");
    }
}
