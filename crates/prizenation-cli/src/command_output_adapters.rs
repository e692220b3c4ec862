// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use prizenation_api::{CheckoutResponse, Entry, ValidationReport};
use prizenation_core::ClientConfig;
use prizenation_model::{Cart, Competition, Order};
use prizenation_storefront::{
    bulk_discount_percent, bundle_offers, card_label, discounted_line_total, remaining_seconds,
    short_id, ticket_preview, CartTotals, CountdownDisplay, QuantityBounds, QUICK_PICKS,
};
use serde::Serialize;
use serde_json::{json, Value};

/// One row of the competitions grid.
#[derive(Debug, Serialize)]
pub(crate) struct CompetitionCard<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    pub sold_percent: u32,
    pub tickets_remaining: u64,
    pub ends: String,
    pub hot: bool,
    pub instant: bool,
    pub media: String,
}

impl<'a> CompetitionCard<'a> {
    pub(crate) fn new(c: &'a Competition, config: &ClientConfig, now: DateTime<Utc>) -> Self {
        let ends = match c.end_time() {
            Some(end) => card_label(remaining_seconds(end, now)),
            None => String::new(),
        };
        let media = c.primary_media();
        Self {
            id: c.id.as_str(),
            title: &c.title,
            price: c.price,
            sale_price: c.sale_price,
            sold_percent: c.sold_percent(),
            tickets_remaining: c.tickets_remaining(),
            ends,
            hot: c.hot,
            instant: c.instant,
            media: if media.is_empty() {
                String::new()
            } else {
                config.absolute_url(media)
            },
        }
    }
}

pub(crate) fn competition_detail(
    c: &Competition,
    config: &ClientConfig,
    now: DateTime<Utc>,
) -> Value {
    json!({
        "card": CompetitionCard::new(c, config, now),
        "subtitle": c.subtitle,
        "description": c.description,
        "category": c.category,
        "tags": c.tags,
        "prize_value": c.prize_value,
        "benefits": c.benefits,
        "countdown": CountdownDisplay::at(c.end_time(), now),
        "quantity": QuantityBounds::detail_page(c),
        "quick_picks": QUICK_PICKS,
        "bundles": bundle_offers(c),
        "instant_wins": c.instant_wins,
        "instant_wins_found": c.instant_wins_found,
    })
}

pub(crate) fn countdown_line(c: &Competition, now: DateTime<Utc>) -> Value {
    let display = CountdownDisplay::at(c.end_time(), now);
    json!({
        "id": c.id.as_str(),
        "display": display.to_string(),
        "countdown": display,
    })
}

/// Each line carries its volume tier badge. Totals stay the server's figures.
pub(crate) fn cart_view(cart: &Cart, upsell: &[&Competition]) -> Value {
    let totals = CartTotals::of(cart);
    json!({
        "items": cart.items.iter().map(|item| json!({
            "competition_id": item.competition_id.as_str(),
            "title": item.title,
            "price": item.price,
            "quantity": item.quantity,
            "line_total": item.line_total(),
            "discount_percent": bulk_discount_percent(item.quantity),
            "discounted_line_total": discounted_line_total(item.price, item.quantity),
        })).collect::<Vec<_>>(),
        "coupon_code": cart.coupon_code,
        "totals": totals,
        "upsell": upsell.iter().map(|c| json!({
            "id": c.id.as_str(),
            "title": c.title,
            "price": c.price,
        })).collect::<Vec<_>>(),
    })
}

/// Placed-order summary; a card payment's redirect is made absolute.
pub(crate) fn checkout_receipt(response: &CheckoutResponse, config: &ClientConfig) -> Value {
    let redirect_url = response
        .redirect_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| config.absolute_url(url));
    json!({
        "command": "checkout complete",
        "order_id": response.order_id.as_str(),
        "order_number": response.order_number,
        "payment_method": response.payment_method,
        "total": response.total,
        "tickets": response.tickets,
        "redirect_url": redirect_url,
        "requires_redirect": response.requires_redirect(),
    })
}

pub(crate) fn validation_view(report: &ValidationReport) -> Value {
    json!({
        "valid": report.valid,
        "issues": report.issues,
        "message": report.message,
    })
}

pub(crate) fn order_row(order: &Order) -> Value {
    let tickets: Vec<u64> = order
        .tickets
        .iter()
        .flat_map(|t| t.ticket_numbers())
        .map(|n| n.get())
        .collect();
    json!({
        "id": order.id.as_str(),
        "short_id": short_id(order.id.as_str(), 8),
        "order_number": order.order_number,
        "customer": order.user_email,
        "total": order.total,
        "discount": order.discount,
        "payment_method": order.payment_method,
        "status": order.effective_status().as_str(),
        "ticket_count": order.ticket_count,
        "tickets": ticket_preview(&tickets),
        "instant_wins": order.instant_wins().len(),
        "created_at": order.created_at,
    })
}

pub(crate) fn entry_row(entry: &Entry) -> Value {
    json!({
        "id": entry.id,
        "name": entry.user_name,
        "email": entry.user_email,
        "quantity": entry.quantity,
        "tickets": ticket_preview(&entry.ticket_numbers),
        "total_paid": entry.total_paid,
        "order": short_id(&entry.order_id, 8),
        "created_at": entry.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn competition() -> Competition {
        serde_json::from_value(json!({
            "id": "c-1",
            "title": "Dream Car",
            "price": 2.0,
            "max_tickets": 100,
            "tickets_sold": 25,
            "image": "/uploads/car.png",
            "end_datetime": "2030-01-02T00:00:00"
        }))
        .expect("competition")
    }

    #[test]
    fn card_absolutises_media_and_labels_end() {
        let c = competition();
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).single().expect("now");
        let card = CompetitionCard::new(&c, &ClientConfig::default(), now);
        assert_eq!(card.media, "http://localhost:8001/uploads/car.png");
        assert_eq!(card.sold_percent, 25);
        assert_eq!(card.tickets_remaining, 75);
        assert_eq!(card.ends, "Ends in 1 day");
    }

    #[test]
    fn ended_competition_shows_zero_countdown() {
        let c = competition();
        let now = Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).single().expect("now");
        let line = countdown_line(&c, now);
        assert_eq!(line["display"], "00d 00h 00m 00s");
    }

    #[test]
    fn cart_view_reports_totals() {
        let cart: Cart = serde_json::from_value(json!({
            "items": [{"competition_id": "c-1", "title": "Dream Car", "price": 2.0, "quantity": 30}],
            "discount": 0.0,
            "coupon_code": ""
        }))
        .expect("cart");
        let view = cart_view(&cart, &[]);
        assert_eq!(view["totals"]["subtotal"], 60.0);
        assert_eq!(view["totals"]["total"], 60.0);
        assert_eq!(view["items"][0]["line_total"], 60.0);
    }

    #[test]
    fn card_checkout_redirect_is_absolute() {
        let card: CheckoutResponse = serde_json::from_value(json!({
            "success": true,
            "order_id": "o-1",
            "payment_method": "card",
            "total": 12.5,
            "redirect_url": "/payment/card?order_id=o-1"
        }))
        .expect("checkout");
        let receipt = checkout_receipt(&card, &ClientConfig::default());
        assert_eq!(
            receipt["redirect_url"],
            "http://localhost:8001/payment/card?order_id=o-1"
        );
        assert_eq!(receipt["requires_redirect"], true);

        let credit: CheckoutResponse = serde_json::from_value(json!({
            "success": true,
            "order_id": "o-2",
            "payment_method": "site_credit"
        }))
        .expect("checkout");
        let receipt = checkout_receipt(&credit, &ClientConfig::default());
        assert!(receipt["redirect_url"].is_null());
        assert_eq!(receipt["requires_redirect"], false);
    }

    #[test]
    fn cart_lines_show_volume_tier() {
        let cart: Cart = serde_json::from_value(json!({
            "items": [
                {"competition_id": "c-1", "title": "Dream Car", "price": 2.0, "quantity": 30},
                {"competition_id": "c-2", "title": "Watch", "price": 1.0, "quantity": 3}
            ],
            "discount": 0.0,
            "coupon_code": ""
        }))
        .expect("cart");
        let view = cart_view(&cart, &[]);
        let bulk = &view["items"][0];
        assert_eq!(bulk["discount_percent"], 10);
        assert_eq!(bulk["discounted_line_total"], 54.0);
        assert_eq!(bulk["line_total"], 60.0);
        let small = &view["items"][1];
        assert_eq!(small["discount_percent"], 0);
        assert_eq!(small["discounted_line_total"], 3.0);
        assert_eq!(view["totals"]["total"], 63.0);
    }
}
