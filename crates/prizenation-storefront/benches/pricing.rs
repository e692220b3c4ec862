use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prizenation_model::{Cart, CartItem, CompetitionId};
use prizenation_storefront::{bulk_discount_percent, discounted_line_total, CartTotals};

fn bench_pricing(c: &mut Criterion) {
    c.bench_function("pricing.bulk_tier.sweep", |b| {
        b.iter(|| {
            (0_u32..500)
                .map(|q| bulk_discount_percent(black_box(q)))
                .sum::<u32>()
        });
    });

    c.bench_function("pricing.discounted_line_total", |b| {
        b.iter(|| discounted_line_total(black_box(1.99), black_box(75)));
    });

    let cart = Cart {
        items: (0..50)
            .filter_map(|i| CompetitionId::new(format!("comp-{i}")).ok())
            .map(|competition_id| CartItem {
                competition_id,
                title: "Prize".to_string(),
                price: 0.99,
                quantity: 25,
                image: String::new(),
            })
            .collect(),
        discount: 5.0,
        coupon_code: "SAVE5".to_string(),
    };
    c.bench_function("pricing.cart_totals.50_lines", |b| {
        b.iter(|| CartTotals::of(black_box(&cart)));
    });
}

criterion_group!(benches, bench_pricing);
criterion_main!(benches);
