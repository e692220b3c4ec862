// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Non-withdrawable balance usable only for entries.
    #[serde(default)]
    pub site_credit_balance: f64,
    /// Withdrawable balance earned from winnings.
    #[serde(default)]
    pub cash_balance: f64,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}
