#![forbid(unsafe_code)]
//! Wire contract for the Prize Nation `/api` backend.
//!
//! Nothing in this crate performs I/O. [`routes`] names every endpoint the
//! storefront consumes, [`dto`] holds the bodies exchanged with them, and
//! [`ApiError`] turns a non-2xx response body into a displayable message.

pub mod dto;
mod errors;
pub mod routes;

pub use dto::{
    AdminOrdersResponse, AdminStats, AuthResponse, CheckoutRequest, CheckoutResponse,
    CompetitionPayload, CouponResponse, EntriesResponse, Entry, EntryMetrics, LoginRequest,
    OrderMetrics, RegisterRequest, UpdateCartRequest, UploadResponse, ValidationReport, Winner,
    WinnerLookup,
};
pub use errors::{decode_detail, ApiError};
pub use routes::{Endpoint, HttpMethod};

pub const CRATE_NAME: &str = "prizenation-api";

/// Path prefix every endpoint is mounted under.
pub const API_PREFIX: &str = "/api";
