// SPDX-License-Identifier: Apache-2.0

use prizenation_model::Cart;
use serde::Serialize;

/// Cart summary. Bulk tiers are not applied here; the discount is the
/// coupon amount the backend granted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CartTotals {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub item_count: u64,
}

impl CartTotals {
    #[must_use]
    pub fn of(cart: &Cart) -> Self {
        let subtotal: f64 = cart.items.iter().map(|item| item.line_total()).sum();
        let item_count = cart.items.iter().map(|item| u64::from(item.quantity)).sum();
        Self {
            subtotal,
            discount: cart.discount,
            total: (subtotal - cart.discount).max(0.0),
            item_count,
        }
    }
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        Self::of(cart)
    }
}
