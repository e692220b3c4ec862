#![forbid(unsafe_code)]
//! Talks to the Prize Nation backend and keeps the client-side state the
//! storefront needs between calls: the signed-in session, the cart and
//! the theme document.

mod cart;
mod error;
mod http;
pub mod messages;
mod session;
mod theme;
mod ticker;

pub use cart::CartState;
pub use error::ClientError;
pub use http::ApiClient;
pub use session::{Session, SessionStore, StoredSession};
pub use theme::ThemeState;
pub use ticker::IntervalTicker;

pub const CRATE_NAME: &str = "prizenation-client";
