#![forbid(unsafe_code)]
//! Values the storefront derives locally from API records.
//!
//! Everything here is pure: the backend stays authoritative for prices,
//! balances and ticket allocation, and these helpers only reproduce what
//! the customer pages and the admin console display or check before a
//! request is sent.

pub mod carousel;
pub mod checkout;
pub mod countdown;
pub mod filters;
pub mod forms;
pub mod pricing;
pub mod totals;

pub use carousel::{Carousel, AUTO_ADVANCE, MANUAL_PAUSE, MAX_SLIDES};
pub use checkout::{
    balance_for, can_apply_coupon, is_balance_sufficient, upsell_suggestions, CheckoutBlock,
    CheckoutCheck,
};
pub use countdown::{card_label, remaining_seconds, Countdown, CountdownDisplay};
pub use filters::{filter_entries, filter_orders, short_id, ticket_preview, StatusFilter};
pub use forms::{
    parse_bulk_bundles, parse_ticket_list, validate_draw_ticket, CompetitionForm, FormErrors,
    MediaKind, MediaSlot, StoredFields, UploadCheck, MAX_UPLOAD_BYTES,
};
pub use pricing::{
    bulk_discount_percent, bundle_offers, bundle_price, discounted_line_total, BundleOffer,
    QuantityBounds, DEFAULT_BUNDLES, QUICK_PICKS,
};
pub use totals::CartTotals;

pub const CRATE_NAME: &str = "prizenation-storefront";
