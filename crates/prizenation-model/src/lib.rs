#![forbid(unsafe_code)]
//! Records mirrored from the Prize Nation backend.
//!
//! These types are plain data: they carry no invariants beyond what the
//! backend guarantees, tolerate unknown fields, and default missing fields
//! the same way the backend does.

mod cart;
mod competition;
mod ids;
mod order;
mod payment;
mod user;

pub use cart::{Cart, CartItem};
pub use competition::{
    parse_end_datetime, BulkBundle, Category, Competition, InstantWin, WalletType,
    FORM_CATEGORIES,
};
pub use ids::{CompetitionId, OrderId, TicketNumber, ValidationError, ID_MAX_LEN};
pub use order::{InstantWinGroup, Order, OrderTickets, TicketNumberEntry};
pub use payment::{PaymentMethod, PaymentStatus};
pub use user::User;

/// Theme settings are fetched and written back verbatim.
pub type Theme = serde_json::Map<String, serde_json::Value>;

pub const CRATE_NAME: &str = "prizenation-model";
