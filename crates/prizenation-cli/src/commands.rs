// SPDX-License-Identifier: Apache-2.0

use crate::command_output_adapters::{
    cart_view, checkout_receipt, competition_detail, countdown_line, order_row, validation_view,
    CompetitionCard,
};
use crate::helpers::{emit, parse_competition_id, parse_order_id, read_theme_file};
use crate::{
    AuthCommand, CartCommand, CheckoutCommand, CliError, CompetitionsCommand, Context,
    OrdersCommand, ThemeCommand,
};
use chrono::Utc;
use prizenation_client::{messages, CartState, IntervalTicker, ThemeState};
use prizenation_model::{CartItem, Category, Competition, PaymentMethod};
use prizenation_storefront::{
    bundle_offers, bundle_price, remaining_seconds, upsell_suggestions, Carousel, CheckoutCheck,
    QuantityBounds, QUICK_PICKS,
};
use serde_json::json;
use std::ops::ControlFlow;
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const WATCH_PERIOD: Duration = Duration::from_secs(1);

pub(crate) fn run_auth(ctx: &mut Context, command: AuthCommand) -> Result<(), CliError> {
    match command {
        AuthCommand::Register {
            email,
            name,
            password,
        } => {
            let user = ctx
                .session
                .register(&mut ctx.api, &email, &name, &password)
                .map_err(|e| CliError::client(&e, messages::REGISTER))?;
            emit(ctx.output, json!({"command": "auth register", "user": user}))
        }
        AuthCommand::Login { email, password } => {
            let user = ctx
                .session
                .login(&mut ctx.api, &email, &password)
                .map_err(|e| CliError::client(&e, messages::LOGIN))?;
            emit(ctx.output, json!({"command": "auth login", "user": user}))
        }
        AuthCommand::Me => {
            let user = ctx
                .session
                .refresh(&mut ctx.api)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            emit(
                ctx.output,
                json!({
                    "command": "auth me",
                    "user": user,
                    "display_name": user.display_name(),
                }),
            )
        }
        AuthCommand::Logout => {
            let mut cart = CartState::new();
            ctx.session
                .logout(&mut ctx.api, &mut cart)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            emit(ctx.output, json!({"command": "auth logout", "status": "ok"}))
        }
    }
}

fn load_competition(ctx: &Context, raw_id: &str) -> Result<Competition, CliError> {
    let id = parse_competition_id(raw_id)?;
    ctx.api
        .competition(&id)
        .map_err(|e| CliError::client(&e, messages::LOAD))
}

/// Feeds `on_tick` once per period from an [`IntervalTicker`] until it
/// breaks or `limit` ticks have passed. The ticker is joined on return.
fn watch<F>(limit: u32, mut on_tick: F) -> Result<(), CliError>
where
    F: FnMut() -> Result<ControlFlow<()>, CliError>,
{
    let (tx, rx) = mpsc::channel();
    let ticker = IntervalTicker::start(WATCH_PERIOD, move || {
        if tx.send(Instant::now()).is_err() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    for _ in 0..limit {
        if rx.recv().is_err() {
            break;
        }
        if on_tick()?.is_break() {
            break;
        }
    }
    ticker.stop();
    Ok(())
}

pub(crate) fn run_competitions(ctx: &Context, command: CompetitionsCommand) -> Result<(), CliError> {
    let config = ctx.api.config();
    match command {
        CompetitionsCommand::List { tag } => {
            let category = match tag.as_deref() {
                Some(raw) => raw
                    .parse::<Category>()
                    .map_err(|e| CliError::usage(&e.to_string()))?,
                None => Category::All,
            };
            let competitions = ctx
                .api
                .competitions(category.tag())
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            let now = Utc::now();
            let cards: Vec<CompetitionCard<'_>> = competitions
                .iter()
                .map(|c| CompetitionCard::new(c, config, now))
                .collect();
            emit(
                ctx.output,
                json!({
                    "command": "competitions list",
                    "category": category.label(),
                    "competitions": cards,
                }),
            )
        }
        CompetitionsCommand::Show { id } => {
            let competition = load_competition(ctx, &id)?;
            emit(
                ctx.output,
                json!({
                    "command": "competitions show",
                    "competition": competition_detail(&competition, config, Utc::now()),
                }),
            )
        }
        CompetitionsCommand::Countdown { id, watch: ticks } => {
            let competition = load_competition(ctx, &id)?;
            emit(ctx.output, countdown_line(&competition, Utc::now()))?;
            let Some(limit) = ticks else {
                return Ok(());
            };
            let Some(end) = competition.end_time() else {
                return Ok(());
            };
            watch(limit, || {
                let now = Utc::now();
                emit(ctx.output, countdown_line(&competition, now))?;
                if remaining_seconds(end, now) == 0 {
                    Ok(ControlFlow::Break(()))
                } else {
                    Ok(ControlFlow::Continue(()))
                }
            })
        }
        CompetitionsCommand::Bundles { id } => {
            let competition = load_competition(ctx, &id)?;
            emit(
                ctx.output,
                json!({
                    "command": "competitions bundles",
                    "id": competition.id.as_str(),
                    "bundles": bundle_offers(&competition),
                    "quick_picks": QUICK_PICKS,
                    "quantity": QuantityBounds::detail_page(&competition),
                }),
            )
        }
        CompetitionsCommand::Featured {
            watch: ticks,
            slide,
            next,
            previous,
        } => {
            let competitions = ctx
                .api
                .competitions(None)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            let slides = Carousel::slides(&competitions);
            let started = Instant::now();
            let mut carousel = Carousel::new(slides.len(), started);
            // Manual moves pause auto-advance.
            if let Some(index) = slide {
                carousel.jump(index, started);
            } else if next {
                carousel.next(started);
            } else if previous {
                carousel.previous(started);
            }
            let show = |carousel: &Carousel, now: Instant| {
                let index = carousel.index();
                let slide = slides.get(index).map(|c| CompetitionCard::new(c, config, Utc::now()));
                json!({
                    "command": "competitions featured",
                    "slide": index,
                    "slides": slides.len(),
                    "auto_playing": carousel.is_auto_playing(now),
                    "competition": slide,
                })
            };
            emit(ctx.output, show(&carousel, started))?;
            match ticks {
                Some(limit) if !carousel.is_empty() => watch(limit, || {
                    let now = Instant::now();
                    if carousel.tick(now) {
                        emit(ctx.output, show(&carousel, now))?;
                    }
                    Ok(ControlFlow::Continue(()))
                }),
                _ => Ok(()),
            }
        }
    }
}

fn upsell_for(ctx: &Context, cart: &CartState) -> Vec<Competition> {
    if cart.cart().is_empty() {
        return Vec::new();
    }
    match ctx.api.competitions(None) {
        Ok(all) => upsell_suggestions(&all, cart.cart())
            .into_iter()
            .cloned()
            .collect(),
        Err(err) => {
            warn!(error = %err, "could not load upsell competitions");
            Vec::new()
        }
    }
}

fn emit_cart(ctx: &Context, command: &str, cart: &CartState) -> Result<(), CliError> {
    let upsell = upsell_for(ctx, cart);
    let upsell: Vec<&Competition> = upsell.iter().collect();
    emit(
        ctx.output,
        json!({"command": command, "cart": cart_view(cart.cart(), &upsell)}),
    )
}

pub(crate) fn run_cart(ctx: &Context, command: CartCommand) -> Result<(), CliError> {
    let mut cart = CartState::new();
    match command {
        CartCommand::Show => {
            cart.refresh(&ctx.api)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            emit_cart(ctx, "cart show", &cart)
        }
        CartCommand::Add { id, quantity } => {
            let competition = load_competition(ctx, &id)?;
            let bounds = QuantityBounds::detail_page(&competition);
            if !bounds.contains(quantity) {
                return Err(CliError::invalid(
                    "quantity",
                    format!("Quantity must be between {} and {}", bounds.min, bounds.max),
                ));
            }
            debug!(
                competition = %competition.id,
                quantity,
                quoted = bundle_price(&competition, quantity),
                "adding to cart"
            );
            cart.add(&ctx.api, &CartItem::for_competition(&competition, quantity))
                .map_err(|e| CliError::client(&e, messages::ADD_TO_CART))?;
            emit_cart(ctx, "cart add", &cart)
        }
        CartCommand::Update { id, quantity } => {
            let id = parse_competition_id(&id)?;
            cart.update(&ctx.api, &id, quantity)
                .map_err(|e| CliError::client(&e, messages::UPDATE_CART))?;
            emit_cart(ctx, "cart update", &cart)
        }
        CartCommand::Clear => {
            cart.clear(&ctx.api)
                .map_err(|e| CliError::client(&e, messages::CLEAR_CART))?;
            emit_cart(ctx, "cart clear", &cart)
        }
        CartCommand::Coupon { code } => {
            cart.refresh(&ctx.api)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            cart.apply_coupon(&ctx.api, &code)
                .map_err(|e| CliError::client(&e, messages::APPLY_COUPON))?;
            emit_cart(ctx, "cart coupon", &cart)
        }
    }
}

pub(crate) fn run_checkout(ctx: &mut Context, command: CheckoutCommand) -> Result<(), CliError> {
    let mut cart = CartState::new();
    match command {
        CheckoutCommand::Validate => {
            let report = ctx
                .api
                .validate_checkout()
                .map_err(|e| CliError::client(&e, messages::CHECKOUT))?;
            cart.refresh(&ctx.api)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            let user = ctx.session.user();
            let methods: Vec<CheckoutCheck> = PaymentMethod::ALL
                .into_iter()
                .map(|method| CheckoutCheck::evaluate(method, user, cart.cart()))
                .collect();
            emit(
                ctx.output,
                json!({
                    "command": "checkout validate",
                    "report": validation_view(&report),
                    "methods": methods,
                }),
            )
        }
        CheckoutCommand::Complete { method } => {
            let method = PaymentMethod::from(method);
            let user = ctx
                .session
                .refresh(&mut ctx.api)
                .map_err(|e| CliError::client(&e, messages::CHECKOUT))?
                .clone();
            cart.refresh(&ctx.api)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            let response = cart
                .checkout(&ctx.api, Some(&user), method)
                .map_err(|e| CliError::client(&e, messages::CHECKOUT))?;
            if !response.success {
                return Err(CliError::dependency(messages::CHECKOUT));
            }
            emit(ctx.output, checkout_receipt(&response, ctx.api.config()))
        }
    }
}

pub(crate) fn run_orders(ctx: &Context, command: OrdersCommand) -> Result<(), CliError> {
    match command {
        OrdersCommand::List => {
            let orders = ctx
                .api
                .orders()
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            emit(
                ctx.output,
                json!({
                    "command": "orders list",
                    "orders": orders.iter().map(order_row).collect::<Vec<_>>(),
                }),
            )
        }
        OrdersCommand::Show { id } => {
            let id = parse_order_id(&id)?;
            let order = ctx
                .api
                .order(&id)
                .map_err(|e| CliError::client(&e, messages::LOAD))?;
            emit(
                ctx.output,
                json!({
                    "command": "orders show",
                    "summary": order_row(&order),
                    "order": order,
                }),
            )
        }
    }
}

pub(crate) fn run_theme(ctx: &Context, command: ThemeCommand) -> Result<(), CliError> {
    let mut state = ThemeState::new();
    match command {
        ThemeCommand::Get => {
            let theme = state
                .load(&ctx.api)
                .ok_or_else(|| CliError::dependency(messages::LOAD))?;
            emit(ctx.output, json!({"command": "theme get", "theme": theme}))
        }
        ThemeCommand::Set { file } => {
            ctx.session
                .require_admin()
                .map_err(|e| CliError::client(&e, messages::UPDATE_THEME))?;
            let theme = read_theme_file(&file)?;
            let saved = state
                .update(&ctx.api, &theme)
                .map_err(|e| CliError::client(&e, messages::UPDATE_THEME))?;
            emit(ctx.output, json!({"command": "theme set", "theme": saved}))
        }
    }
}
