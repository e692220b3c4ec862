// SPDX-License-Identifier: Apache-2.0

use prizenation_api::CheckoutResponse;
use prizenation_model::{Cart, CartItem, CompetitionId, PaymentMethod, User};
use prizenation_storefront::{can_apply_coupon, CartTotals, CheckoutCheck};
use tracing::warn;

use crate::error::ClientError;
use crate::http::ApiClient;

/// Local mirror of the server cart. Every mutation except `clear`
/// re-reads the cart from the server afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    cart: Cart,
}

impl CartState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn totals(&self) -> CartTotals {
        CartTotals::of(&self.cart)
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.totals().item_count
    }

    /// On failure the previous cart is kept.
    pub fn refresh(&mut self, api: &ApiClient) -> Result<&Cart, ClientError> {
        self.cart = api.cart()?;
        Ok(&self.cart)
    }

    pub fn add(&mut self, api: &ApiClient, item: &CartItem) -> Result<&Cart, ClientError> {
        if item.quantity == 0 {
            return Err(ClientError::invalid(
                "quantity",
                "Quantity must be at least 1",
            ));
        }
        api.add_to_cart(item)?;
        self.refresh(api)
    }

    /// Quantity zero removes the line server-side.
    pub fn update(
        &mut self,
        api: &ApiClient,
        id: &CompetitionId,
        quantity: u32,
    ) -> Result<&Cart, ClientError> {
        api.update_cart(id, quantity)?;
        self.refresh(api)
    }

    pub fn clear(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        api.clear_cart()?;
        self.cart = Cart::empty();
        Ok(())
    }

    pub fn apply_coupon(&mut self, api: &ApiClient, code: &str) -> Result<&Cart, ClientError> {
        if !can_apply_coupon(&self.cart, code) {
            let reason = if self.cart.coupon_code.is_empty() {
                "Enter a coupon code"
            } else {
                "A coupon is already applied"
            };
            return Err(ClientError::invalid("coupon", reason));
        }
        api.apply_coupon(code)?;
        self.refresh(api)
    }

    /// Empties local state without touching the server.
    pub fn reset(&mut self) {
        self.cart = Cart::empty();
    }

    /// Checks the selected balance locally, places the order, then clears
    /// the cart.
    pub fn checkout(
        &mut self,
        api: &ApiClient,
        user: Option<&User>,
        method: PaymentMethod,
    ) -> Result<CheckoutResponse, ClientError> {
        let check = CheckoutCheck::evaluate(method, user, &self.cart);
        if let Some(block) = check.blocked {
            return Err(ClientError::invalid("payment_method", block.to_string()));
        }
        let response = api.complete_checkout(method)?;
        if response.success {
            if let Err(err) = self.clear(api) {
                warn!(error = %err, "order placed but clearing the cart failed");
                self.reset();
            }
        }
        Ok(response)
    }
}
