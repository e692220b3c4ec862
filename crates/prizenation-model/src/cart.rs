// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

use crate::competition::Competition;
use crate::ids::CompetitionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub competition_id: CompetitionId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl CartItem {
    /// The add-to-cart body built from a competition page.
    #[must_use]
    pub fn for_competition(competition: &Competition, quantity: u32) -> Self {
        Self {
            competition_id: competition.id.clone(),
            title: competition.title.clone(),
            price: competition.price,
            quantity,
            image: competition.primary_media().to_string(),
        }
    }

    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Server-held cart. `discount` is whatever the backend granted for `coupon_code`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub coupon_code: String,
}

impl Cart {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, competition: &CompetitionId) -> bool {
        self.items.iter().any(|item| &item.competition_id == competition)
    }
}
