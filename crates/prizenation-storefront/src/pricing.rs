// SPDX-License-Identifier: Apache-2.0

use prizenation_model::{BulkBundle, Competition};
use serde::Serialize;

/// `(minimum quantity, percent off)`, highest threshold first.
const BULK_TIERS: [(u32, u32); 4] = [(100, 20), (50, 15), (25, 10), (10, 5)];

/// Bundles shown on a competition page that defines none of its own.
pub const DEFAULT_BUNDLES: [BulkBundle; 4] = [
    BulkBundle::new(10, 0.0),
    BulkBundle::new(25, 5.0),
    BulkBundle::new(50, 10.0),
    BulkBundle::new(100, 15.0),
];

/// One-tap quantities offered next to the stepper.
pub const QUICK_PICKS: [u32; 4] = [5, 10, 25, 50];

#[must_use]
pub fn bulk_discount_percent(quantity: u32) -> u32 {
    BULK_TIERS
        .iter()
        .find(|(min, _)| quantity >= *min)
        .map_or(0, |(_, pct)| *pct)
}

#[must_use]
pub fn discounted_line_total(unit_price: f64, quantity: u32) -> f64 {
    let pct = f64::from(bulk_discount_percent(quantity));
    unit_price * f64::from(quantity) * (1.0 - pct / 100.0)
}

/// Competition-page price for `quantity` tickets. Only a bundle whose
/// quantity matches exactly earns its discount.
#[must_use]
pub fn bundle_price(competition: &Competition, quantity: u32) -> f64 {
    let base = f64::from(quantity) * competition.price;
    competition
        .bulk_bundles
        .iter()
        .find(|b| b.quantity == quantity)
        .map_or(base, |b| base * (1.0 - b.discount_percent / 100.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BundleOffer {
    pub quantity: u32,
    pub discount_percent: f64,
    pub original_price: f64,
    pub price: f64,
    pub savings: f64,
    pub best_value: bool,
}

/// Bundle tiles for a competition page; the last tile is flagged best value.
#[must_use]
pub fn bundle_offers(competition: &Competition) -> Vec<BundleOffer> {
    let bundles: &[BulkBundle] = if competition.bulk_bundles.is_empty() {
        &DEFAULT_BUNDLES
    } else {
        &competition.bulk_bundles
    };
    let last = bundles.len().saturating_sub(1);
    bundles
        .iter()
        .enumerate()
        .map(|(idx, b)| {
            let original_price = f64::from(b.quantity) * competition.price;
            let price = original_price * (1.0 - b.discount_percent / 100.0);
            BundleOffer {
                quantity: b.quantity,
                discount_percent: b.discount_percent,
                original_price,
                price,
                savings: original_price - price,
                best_value: idx == last,
            }
        })
        .collect()
}

/// Inclusive quantity range a picker clamps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuantityBounds {
    pub min: u32,
    pub max: u32,
}

const PAGE_MAX: u32 = 100;
const TYPED_FALLBACK_MAX: u32 = 1000;

impl QuantityBounds {
    /// Listing card picker; zero means "open the competition page".
    pub const CARD: Self = Self { min: 0, max: 100 };

    /// Competition page stepper and quick picks.
    #[must_use]
    pub fn detail_page(competition: &Competition) -> Self {
        Self {
            min: 1,
            max: Self::typed_input(competition).max.min(PAGE_MAX),
        }
    }

    /// Limit applied to a typed quantity before the page clamp.
    #[must_use]
    pub fn typed_input(competition: &Competition) -> Self {
        let max = competition
            .max_tickets_per_user
            .filter(|m| *m > 0)
            .unwrap_or(TYPED_FALLBACK_MAX);
        Self { min: 1, max }
    }

    #[must_use]
    pub fn clamp(self, quantity: i64) -> u32 {
        let clamped = quantity.clamp(i64::from(self.min), i64::from(self.max));
        u32::try_from(clamped).unwrap_or(self.max)
    }

    #[must_use]
    pub fn step(self, current: u32, delta: i64) -> u32 {
        self.clamp(i64::from(current) + delta)
    }

    #[must_use]
    pub fn contains(self, quantity: u32) -> bool {
        (self.min..=self.max).contains(&quantity)
    }
}
