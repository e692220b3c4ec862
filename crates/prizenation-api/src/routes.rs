// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use prizenation_model::{CompetitionId, OrderId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A method, a path relative to the API prefix and its query pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    #[must_use]
    fn with_query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Public endpoints are the auth handshake and the read-only catalogue.
    #[must_use]
    pub fn requires_auth(&self) -> bool {
        let public = matches!(self.path.as_str(), "/auth/register" | "/auth/login")
            || (self.method == HttpMethod::Get
                && (self.path == "/theme" || self.path.starts_with("/competitions")));
        !public
    }

    /// Admin endpoints are gated locally before they are called.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.path.starts_with("/admin/")
            || self.path == "/upload"
            || (self.path == "/theme" && self.method == HttpMethod::Put)
            || (self.path.starts_with("/competitions") && self.method != HttpMethod::Get)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)?;
        for (idx, (k, v)) in self.query.iter().enumerate() {
            let sep = if idx == 0 { '?' } else { '&' };
            write!(f, "{sep}{k}={v}")?;
        }
        Ok(())
    }
}

#[must_use]
pub fn register() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/auth/register")
}

#[must_use]
pub fn login() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/auth/login")
}

#[must_use]
pub fn me() -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/auth/me")
}

/// `tag = None` lists every competition.
#[must_use]
pub fn competitions(tag: Option<&str>) -> Endpoint {
    let endpoint = Endpoint::new(HttpMethod::Get, "/competitions");
    match tag {
        Some(tag) => endpoint.with_query("tag", tag),
        None => endpoint,
    }
}

#[must_use]
pub fn competition(id: &CompetitionId) -> Endpoint {
    Endpoint::new(HttpMethod::Get, format!("/competitions/{id}"))
}

#[must_use]
pub fn create_competition() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/competitions")
}

#[must_use]
pub fn update_competition(id: &CompetitionId) -> Endpoint {
    Endpoint::new(HttpMethod::Put, format!("/competitions/{id}"))
}

#[must_use]
pub fn delete_competition(id: &CompetitionId) -> Endpoint {
    Endpoint::new(HttpMethod::Delete, format!("/competitions/{id}"))
}

#[must_use]
pub fn cart() -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/cart")
}

#[must_use]
pub fn cart_add() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/cart/add")
}

#[must_use]
pub fn cart_update() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/cart/update")
}

#[must_use]
pub fn cart_clear() -> Endpoint {
    Endpoint::new(HttpMethod::Delete, "/cart/clear")
}

/// The code travels in the query string; the body is empty.
#[must_use]
pub fn apply_coupon(code: &str) -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/cart/apply-coupon").with_query("code", code)
}

#[must_use]
pub fn checkout_validate() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/checkout/validate")
}

#[must_use]
pub fn checkout_complete() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/checkout/complete")
}

#[must_use]
pub fn orders() -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/orders")
}

#[must_use]
pub fn order(id: &OrderId) -> Endpoint {
    Endpoint::new(HttpMethod::Get, format!("/orders/{id}"))
}

#[must_use]
pub fn theme() -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/theme")
}

#[must_use]
pub fn update_theme() -> Endpoint {
    Endpoint::new(HttpMethod::Put, "/theme")
}

#[must_use]
pub fn admin_stats() -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/admin/stats")
}

#[must_use]
pub fn admin_entries(id: &CompetitionId) -> Endpoint {
    Endpoint::new(HttpMethod::Get, format!("/admin/competitions/{id}/entries"))
}

/// Body is the bare ticket number.
#[must_use]
pub fn find_winner(id: &CompetitionId) -> Endpoint {
    Endpoint::new(
        HttpMethod::Post,
        format!("/admin/competitions/{id}/find-winner"),
    )
}

/// Body is the bare ticket number.
#[must_use]
pub fn mark_winner(id: &CompetitionId) -> Endpoint {
    Endpoint::new(
        HttpMethod::Post,
        format!("/admin/competitions/{id}/mark-winner"),
    )
}

#[must_use]
pub fn admin_orders() -> Endpoint {
    Endpoint::new(HttpMethod::Get, "/admin/orders")
}

/// Multipart body with a single `file` field.
#[must_use]
pub fn upload() -> Endpoint {
    Endpoint::new(HttpMethod::Post, "/upload")
}
