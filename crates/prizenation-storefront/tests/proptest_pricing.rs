// SPDX-License-Identifier: Apache-2.0

use chrono::{Duration, TimeZone, Utc};
use prizenation_model::{Cart, CartItem, CompetitionId};
use prizenation_storefront::{
    bulk_discount_percent, discounted_line_total, remaining_seconds, CartTotals, Countdown,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn tier_is_monotonic(q in 0_u32..10_000) {
        prop_assert!(bulk_discount_percent(q) <= bulk_discount_percent(q + 1));
        prop_assert!(bulk_discount_percent(q) <= 20);
    }

    #[test]
    fn discounted_total_never_exceeds_list_price(price in 0.01_f64..500.0, q in 0_u32..1_000) {
        let list = price * f64::from(q);
        let discounted = discounted_line_total(price, q);
        prop_assert!(discounted <= list + 1e-9);
        prop_assert!(discounted >= list * 0.8 - 1e-9);
    }

    #[test]
    fn cart_total_never_negative(
        lines in proptest::collection::vec((0.01_f64..100.0, 1_u32..200), 0..6),
        discount in 0.0_f64..50_000.0
    ) {
        let items = lines
            .iter()
            .enumerate()
            .map(|(idx, (price, quantity))| CartItem {
                competition_id: CompetitionId::new(format!("c-{idx}")).expect("id"),
                title: String::new(),
                price: *price,
                quantity: *quantity,
                image: String::new(),
            })
            .collect();
        let cart = Cart { items, discount, coupon_code: String::new() };
        let totals = CartTotals::of(&cart);
        prop_assert!(totals.total >= 0.0);
        if discount >= totals.subtotal {
            prop_assert_eq!(totals.total, 0.0);
        }
    }

    #[test]
    fn countdown_hits_zero_at_end_and_stays_there(offset in -100_000_i64..100_000) {
        let end = Utc.timestamp_opt(1_800_000_000, 0).single().expect("end");
        let now = end - Duration::seconds(offset);
        let left = remaining_seconds(end, now);
        if offset <= 0 {
            prop_assert_eq!(left, 0);
            prop_assert!(Countdown::from_seconds(left).is_finished());
        } else {
            prop_assert_eq!(left, offset.unsigned_abs());
            prop_assert_eq!(Countdown::from_seconds(left).total_seconds(), left);
        }
    }
}
