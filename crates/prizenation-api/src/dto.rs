// SPDX-License-Identifier: Apache-2.0
//! Request and response bodies. Responses tolerate unknown fields and
//! default what the backend may omit.

use prizenation_model::{
    BulkBundle, CompetitionId, InstantWin, Order, OrderId, OrderTickets, PaymentMethod, User,
    WalletType,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCartRequest {
    pub competition_id: CompetitionId,
    /// Zero removes the line.
    pub quantity: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckoutRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CouponResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub discount: f64,
}

/// Availability report returned by `/checkout/validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub success: bool,
    pub order_id: OrderId,
    #[serde(default)]
    pub order_number: u64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Empty for card payments until the gateway confirms.
    #[serde(default)]
    pub tickets: Vec<OrderTickets>,
    #[serde(default)]
    pub total: f64,
    /// Set only for card payments.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl CheckoutResponse {
    #[must_use]
    pub fn requires_redirect(&self) -> bool {
        self.redirect_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Body for `POST /competitions` and `PUT /competitions/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitionPayload {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub video: String,
    pub image: String,
    pub hot: bool,
    pub instant: bool,
    pub max_tickets: u64,
    pub max_tickets_per_user: Option<u32>,
    pub tickets_sold: u64,
    pub sold_override: u32,
    pub end_datetime: String,
    pub category: String,
    pub tags: Vec<String>,
    pub instant_wins: Vec<InstantWin>,
    pub instant_win_image: String,
    pub instant_win_type: WalletType,
    pub instant_win_ticket_numbers: Vec<u64>,
    pub instant_wins_found: u32,
    pub prize_value: String,
    pub benefits: Vec<String>,
    pub bulk_bundles: Vec<BulkBundle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub ticket_numbers: Vec<u64>,
    #[serde(default)]
    pub total_paid: f64,
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetrics {
    #[serde(default)]
    pub total_entries: u64,
    #[serde(default)]
    pub total_tickets: u64,
    #[serde(default)]
    pub unique_users: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub metrics: EntryMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMetrics {
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub orders_today: u64,
    #[serde(default)]
    pub revenue_today: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminOrdersResponse {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub metrics: OrderMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    #[serde(default)]
    pub total_competitions: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerLookup {
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResponse {
    /// Backend-relative, e.g. `/uploads/1712345.png`.
    pub url: String,
}
