// SPDX-License-Identifier: Apache-2.0

use prizenation_model::Theme;
use tracing::warn;

use crate::error::ClientError;
use crate::http::ApiClient;

/// The remote theme document, held verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeState {
    theme: Option<Theme>,
}

impl ThemeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// A failed fetch leaves the last known theme in place.
    pub fn load(&mut self, api: &ApiClient) -> Option<&Theme> {
        match api.theme() {
            Ok(theme) => self.theme = Some(theme),
            Err(err) => warn!(error = %err, "failed to fetch theme"),
        }
        self.theme.as_ref()
    }

    /// Writes the document back, then re-reads what the server kept.
    pub fn update(&mut self, api: &ApiClient, theme: &Theme) -> Result<&Theme, ClientError> {
        api.update_theme(theme)?;
        self.theme = Some(api.theme()?);
        self.theme.as_ref().ok_or(ClientError::Decode {
            endpoint: "GET /theme".to_string(),
            message: "empty theme".to_string(),
        })
    }
}
