// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::ids::{CompetitionId, OrderId, TicketNumber};
use crate::payment::{PaymentMethod, PaymentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketNumberEntry {
    pub number: TicketNumber,
}

/// Instant wins hit by one order, grouped by prize label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantWinGroup {
    pub prize: String,
    #[serde(default)]
    pub ticket_numbers: Vec<TicketNumber>,
}

/// Ticket numbers allocated to one competition within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTickets {
    pub competition_id: CompetitionId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub numbers: Vec<TicketNumberEntry>,
    #[serde(default)]
    pub instant_wins: Vec<InstantWinGroup>,
}

impl OrderTickets {
    #[must_use]
    pub fn ticket_numbers(&self) -> Vec<TicketNumber> {
        self.numbers.iter().map(|entry| entry.number).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: u64,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// Admin listings report the status under this name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(default)]
    pub ticket_count: u64,
    #[serde(default)]
    pub tickets: Vec<OrderTickets>,
    #[serde(default)]
    pub created_at: String,
}

impl Order {
    #[must_use]
    pub fn effective_status(&self) -> PaymentStatus {
        self.payment_status
            .clone()
            .or_else(|| self.status.clone())
            .unwrap_or(PaymentStatus::Pending)
    }

    #[must_use]
    pub fn instant_wins(&self) -> Vec<&InstantWinGroup> {
        self.tickets
            .iter()
            .flat_map(|t| t.instant_wins.iter())
            .collect()
    }
}
