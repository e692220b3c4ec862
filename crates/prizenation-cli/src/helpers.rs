use crate::{CliError, FormArgs, OutputMode};
use prizenation_client::SessionStore;
use prizenation_core::{resolve_config_path, ClientConfig, ConfigPathScope};
use prizenation_model::{CompetitionId, OrderId, Theme};
use prizenation_storefront::CompetitionForm;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

pub(crate) fn emit_ok(output_mode: OutputMode, payload: Value) -> Result<(), String> {
    if output_mode.json {
        println!(
            "{}",
            serde_json::to_string(&payload).map_err(|e| e.to_string())?
        );
    } else {
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?
        );
    }
    Ok(())
}

/// Same as [`emit_ok`], for command handlers that return [`CliError`].
pub(crate) fn emit(output_mode: OutputMode, payload: Value) -> Result<(), CliError> {
    emit_ok(output_mode, payload).map_err(CliError::internal)
}

pub(crate) fn emit_config(config: &ClientConfig, output_mode: OutputMode) -> Result<(), String> {
    emit_ok(
        output_mode,
        json!({
            "command": "config",
            "workspace_config": resolve_config_path(ConfigPathScope::Workspace),
            "user_config": resolve_config_path(ConfigPathScope::User),
            "session_file": SessionStore::default_location().path(),
            "api_url": config.api_url,
            "api_base": config.api_base(),
            "timeout_secs": config.timeout_secs,
            "log_json": config.log_json,
        }),
    )
}

pub(crate) fn parse_competition_id(raw: &str) -> Result<CompetitionId, CliError> {
    raw.parse::<CompetitionId>()
        .map_err(|e| CliError::usage(&e.to_string()).with_detail("id", raw))
}

pub(crate) fn parse_order_id(raw: &str) -> Result<OrderId, CliError> {
    raw.parse::<OrderId>()
        .map_err(|e| CliError::usage(&e.to_string()).with_detail("id", raw))
}

/// Reads a theme document; it must be a JSON object.
pub(crate) fn read_theme_file(path: &Path) -> Result<Theme, CliError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        CliError::usage(&format!("failed to read {}: {e}", path.display()))
    })?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(CliError::invalid(
            "theme",
            "Theme file must contain a JSON object".to_string(),
        )),
        Err(e) => Err(CliError::invalid("theme", format!("Invalid theme JSON: {e}"))),
    }
}

impl FormArgs {
    /// Writes every flag that was given onto `form`.
    pub(crate) fn overlay(&self, form: &mut CompetitionForm) {
        let text_fields: [(&Option<String>, &mut String); 15] = [
            (&self.title, &mut form.title),
            (&self.subtitle, &mut form.subtitle),
            (&self.description, &mut form.description),
            (&self.price, &mut form.price),
            (&self.sale_price, &mut form.sale_price),
            (&self.max_tickets, &mut form.max_tickets),
            (&self.max_tickets_per_user, &mut form.max_tickets_per_user),
            (&self.sold, &mut form.sold),
            (&self.image, &mut form.image),
            (&self.video, &mut form.video),
            (&self.category, &mut form.category),
            (&self.prize_value, &mut form.prize_value),
            (&self.end_datetime, &mut form.end_datetime),
            (&self.instant_win_image, &mut form.instant_win_image),
            (&self.instant_win_tickets, &mut form.instant_win_tickets),
        ];
        for (flag, slot) in text_fields {
            if let Some(value) = flag {
                slot.clone_from(value);
            }
        }
        if let Some(bundles) = &self.bulk_bundles {
            form.bulk_bundles.clone_from(bundles);
        }
        if let Some(tags) = &self.tags {
            form.tags = tags
                .iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(hot) = self.hot {
            form.hot = hot;
        }
        if let Some(instant) = self.instant {
            form.instant = instant;
        }
        if let Some(kind) = self.instant_win_type {
            form.instant_win_type = kind.into();
        }
    }
}
