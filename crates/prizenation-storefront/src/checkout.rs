// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use prizenation_model::{Cart, Competition, PaymentMethod, User};
use serde::Serialize;

use crate::totals::CartTotals;

const UPSELL_LIMIT: usize = 3;

/// Balance the method draws from; card payments have none.
/// A missing user counts as an empty wallet.
#[must_use]
pub fn balance_for(method: PaymentMethod, user: Option<&User>) -> Option<f64> {
    match method {
        PaymentMethod::SiteCredit => Some(user.map_or(0.0, |u| u.site_credit_balance)),
        PaymentMethod::Cash => Some(user.map_or(0.0, |u| u.cash_balance)),
        PaymentMethod::Card => None,
    }
}

#[must_use]
pub fn is_balance_sufficient(method: PaymentMethod, user: Option<&User>, total: f64) -> bool {
    balance_for(method, user).map_or(true, |balance| balance >= total)
}

/// The first competitions not already in the cart, in listing order.
#[must_use]
pub fn upsell_suggestions<'a>(competitions: &'a [Competition], cart: &Cart) -> Vec<&'a Competition> {
    competitions
        .iter()
        .filter(|c| !cart.contains(&c.id))
        .take(UPSELL_LIMIT)
        .collect()
}

/// A coupon may be applied once per cart and only with a non-blank code.
#[must_use]
pub fn can_apply_coupon(cart: &Cart, code: &str) -> bool {
    cart.coupon_code.is_empty() && !code.trim().is_empty()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CheckoutBlock {
    EmptyCart,
    InsufficientBalance,
}

impl fmt::Display for CheckoutBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCart => f.write_str("Your cart is empty"),
            Self::InsufficientBalance => f.write_str("Insufficient Balance"),
        }
    }
}

/// Local pre-flight for the checkout submit button.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CheckoutCheck {
    pub method: PaymentMethod,
    pub totals: CartTotals,
    pub balance: Option<f64>,
    pub blocked: Option<CheckoutBlock>,
}

impl CheckoutCheck {
    #[must_use]
    pub fn evaluate(method: PaymentMethod, user: Option<&User>, cart: &Cart) -> Self {
        let totals = CartTotals::of(cart);
        let blocked = if cart.is_empty() {
            Some(CheckoutBlock::EmptyCart)
        } else if !is_balance_sufficient(method, user, totals.total) {
            Some(CheckoutBlock::InsufficientBalance)
        } else {
            None
        };
        Self {
            method,
            totals,
            balance: balance_for(method, user),
            blocked,
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.blocked.is_none()
    }
}
