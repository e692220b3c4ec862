// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use prizenation_api::Entry;
use prizenation_model::{Order, PaymentStatus};

const PREVIEW_TICKETS: usize = 10;

fn matches(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive search over name, email and order id.
#[must_use]
pub fn filter_entries<'a>(entries: &'a [Entry], search: &str) -> Vec<&'a Entry> {
    let needle = search.to_lowercase();
    entries
        .iter()
        .filter(|e| {
            matches(&e.user_name, &needle)
                || matches(&e.user_email, &needle)
                || matches(&e.order_id, &needle)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Status(String),
}

impl StatusFilter {
    #[must_use]
    pub fn accepts(&self, status: &PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Status(wanted) => status.as_str().eq_ignore_ascii_case(wanted),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Status(s.to_string()))
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Status(s) => f.write_str(s),
        }
    }
}

/// Search over order id and customer email, then the status filter.
#[must_use]
pub fn filter_orders<'a>(orders: &'a [Order], search: &str, status: &StatusFilter) -> Vec<&'a Order> {
    let needle = search.to_lowercase();
    orders
        .iter()
        .filter(|o| matches(o.id.as_str(), &needle) || matches(&o.user_email, &needle))
        .filter(|o| status.accepts(&o.effective_status()))
        .collect()
}

/// First ten numbers, then a count of the rest.
#[must_use]
pub fn ticket_preview(numbers: &[u64]) -> String {
    let shown = numbers
        .iter()
        .take(PREVIEW_TICKETS)
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if numbers.len() > PREVIEW_TICKETS {
        format!("{shown} ... (+{} more)", numbers.len() - PREVIEW_TICKETS)
    } else {
        shown
    }
}

/// Leading `len` characters of an identifier.
#[must_use]
pub fn short_id(id: &str, len: usize) -> &str {
    match id.char_indices().nth(len) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries() -> Vec<Entry> {
        serde_json::from_value(json!([
            {"id": "e1", "user_name": "Alice Smith", "user_email": "alice@example.com", "order_id": "ORD-111"},
            {"id": "e2", "user_name": "Bob", "user_email": "bob@shop.test", "order_id": "ord-222"}
        ]))
        .expect("entries")
    }

    fn orders() -> Vec<Order> {
        serde_json::from_value(json!([
            {"id": "aaa-1", "user_email": "x@example.com", "status": "completed"},
            {"id": "bbb-2", "user_email": "y@example.com", "payment_status": "pending"},
            {"id": "ccc-3", "user_email": "Z@Example.com", "status": "Failed"}
        ]))
        .expect("orders")
    }

    #[test]
    fn entry_search_is_case_insensitive() {
        let all = entries();
        assert_eq!(filter_entries(&all, "ALICE").len(), 1);
        assert_eq!(filter_entries(&all, "ord-").len(), 2);
        assert_eq!(filter_entries(&all, "shop.test")[0].id, "e2");
        assert_eq!(filter_entries(&all, "").len(), 2);
    }

    #[test]
    fn order_search_and_status() {
        let all = orders();
        let any: StatusFilter = "all".parse().expect("filter");
        assert_eq!(filter_orders(&all, "example.com", &any).len(), 3);
        let failed: StatusFilter = "failed".parse().expect("filter");
        let hits = filter_orders(&all, "", &failed);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "ccc-3");
        let pending = StatusFilter::Status("PENDING".to_string());
        assert_eq!(filter_orders(&all, "bbb", &pending).len(), 1);
        assert_eq!(filter_orders(&all, "aaa", &pending).len(), 0);
    }

    #[test]
    fn preview_truncates_after_ten() {
        let few: Vec<u64> = (1..=3).collect();
        assert_eq!(ticket_preview(&few), "1, 2, 3");
        let many: Vec<u64> = (1..=13).collect();
        assert_eq!(
            ticket_preview(&many),
            "1, 2, 3, 4, 5, 6, 7, 8, 9, 10 ... (+3 more)"
        );
        assert_eq!(ticket_preview(&[]), "");
    }

    #[test]
    fn short_ids() {
        assert_eq!(short_id("0123456789abcdef", 8), "01234567");
        assert_eq!(short_id("0123456789abcdef", 12), "0123456789ab");
        assert_eq!(short_id("abc", 12), "abc");
    }
}
