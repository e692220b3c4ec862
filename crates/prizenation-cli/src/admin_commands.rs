// SPDX-License-Identifier: Apache-2.0
//! Admin console commands. Every command checks the cached session user
//! before the first request.

use crate::command_output_adapters::{entry_row, order_row};
use crate::helpers::{emit, parse_competition_id};
use crate::{AdminCommand, CliError, Context, FormArgs};
use prizenation_client::{messages, ApiClient, ClientError};
use prizenation_model::{Competition, CompetitionId, TicketNumber};
use prizenation_storefront::{
    filter_entries, filter_orders, validate_draw_ticket, CompetitionForm, MediaKind, MediaSlot,
    StatusFilter,
};
use serde_json::json;
use std::path::Path;
use tracing::info;

pub(crate) fn run_admin(ctx: &Context, command: AdminCommand) -> Result<(), CliError> {
    let admin = ctx
        .session
        .require_admin()
        .map_err(|e| CliError::client(&e, "Admin access required"))?;
    info!(admin = %admin.email, "admin command");
    match command {
        AdminCommand::Stats => {
            let stats = ctx
                .api
                .admin_stats()
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            emit(ctx.output, json!({"command": "admin stats", "stats": stats}))
        }
        AdminCommand::Create { form: args } => {
            let mut form = CompetitionForm::default();
            args.overlay(&mut form);
            let created = save(&ctx.api, None, &mut form, &args)?;
            emit(
                ctx.output,
                json!({"command": "admin create", "competition": created}),
            )
        }
        AdminCommand::Update { id, form: args } => {
            let id = parse_competition_id(&id)?;
            let existing = ctx
                .api
                .competition(&id)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            let mut form = CompetitionForm::from_competition(&existing);
            args.overlay(&mut form);
            save(&ctx.api, Some(&id), &mut form, &args)?;
            emit(
                ctx.output,
                json!({"command": "admin update", "id": id.as_str(), "status": "ok"}),
            )
        }
        AdminCommand::Delete { id } => {
            let id = parse_competition_id(&id)?;
            ctx.api
                .delete_competition(&id)
                .map_err(|e| CliError::client(&e, messages::DELETE_COMPETITION))?;
            emit(
                ctx.output,
                json!({"command": "admin delete", "id": id.as_str(), "status": "ok"}),
            )
        }
        AdminCommand::Entries { id, search } => {
            let id = parse_competition_id(&id)?;
            let response = ctx
                .api
                .competition_entries(&id)
                .map_err(|e| CliError::client(&e, messages::LOAD_ENTRIES))?;
            let shown = filter_entries(&response.entries, &search);
            emit(
                ctx.output,
                json!({
                    "command": "admin entries",
                    "id": id.as_str(),
                    "metrics": response.metrics,
                    "shown": shown.len(),
                    "entries": shown.into_iter().map(entry_row).collect::<Vec<_>>(),
                }),
            )
        }
        AdminCommand::FindWinner { id, ticket } => {
            let id = parse_competition_id(&id)?;
            let ticket = draw_ticket(&ticket)?;
            let lookup = ctx
                .api
                .find_winner(&id, ticket)
                .map_err(|e| CliError::client(&e, messages::FIND_WINNER))?;
            emit(
                ctx.output,
                json!({
                    "command": "admin find-winner",
                    "ticket": ticket.get(),
                    "found": lookup.found,
                    "winner": lookup.winner,
                }),
            )
        }
        AdminCommand::MarkWinner { id, ticket } => {
            let id = parse_competition_id(&id)?;
            let ticket = draw_ticket(&ticket)?;
            ctx.api
                .mark_winner(&id, ticket)
                .map_err(|e| CliError::client(&e, messages::MARK_WINNER))?;
            emit(
                ctx.output,
                json!({
                    "command": "admin mark-winner",
                    "id": id.as_str(),
                    "ticket": ticket.get(),
                    "status": "ok",
                }),
            )
        }
        AdminCommand::Orders { search, status } => {
            let filter = status.parse::<StatusFilter>().unwrap_or_default();
            let response = ctx
                .api
                .admin_orders()
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            let shown = filter_orders(&response.orders, &search, &filter);
            emit(
                ctx.output,
                json!({
                    "command": "admin orders",
                    "status_filter": filter.to_string(),
                    "metrics": response.metrics,
                    "shown": shown.len(),
                    "orders": shown.into_iter().map(order_row).collect::<Vec<_>>(),
                }),
            )
        }
        AdminCommand::Upload { path } => {
            let (kind, url) = upload(&ctx.api, &path)?;
            emit(
                ctx.output,
                json!({
                    "command": "admin upload",
                    "kind": kind.mime_prefix().trim_end_matches('/'),
                    "url": url,
                }),
            )
        }
    }
}

fn draw_ticket(raw: &str) -> Result<TicketNumber, CliError> {
    validate_draw_ticket(raw).map_err(|message| CliError::invalid("ticket", message))
}

fn upload(api: &ApiClient, path: &Path) -> Result<(MediaKind, String), CliError> {
    api.upload(path)
        .map_err(|e| CliError::client(&e, messages::UPLOAD))
}

/// Required fields are checked before any file is uploaded, and the
/// whole form again before it is sent.
fn save(
    api: &ApiClient,
    id: Option<&CompetitionId>,
    form: &mut CompetitionForm,
    args: &FormArgs,
) -> Result<Option<Competition>, CliError> {
    form.validate().map_err(|errors| {
        CliError::client(&ClientError::from(errors), messages::SAVE_COMPETITION)
    })?;
    let uploads = [
        (MediaSlot::Featured, args.media_file.as_deref()),
        (MediaSlot::InstantWin, args.instant_win_file.as_deref()),
    ];
    for (slot, file) in uploads
        .into_iter()
        .filter_map(|(slot, file)| file.map(|f| (slot, f)))
    {
        let (kind, url) = upload(api, file)?;
        form.apply_upload(slot, kind, &url);
    }
    api.save_competition(id, form)
        .map_err(|e| CliError::client(&e, messages::SAVE_COMPETITION))
}
