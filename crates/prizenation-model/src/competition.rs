// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CompetitionId, TicketNumber, ValidationError};

/// Categories offered by the admin form's category selector.
pub const FORM_CATEGORIES: [&str; 6] = ["all", "jackpot", "spin", "instawin", "rolling", "vip"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletType {
    #[default]
    SiteCredit,
    Cash,
}

impl WalletType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SiteCredit => "site_credit",
            Self::Cash => "cash",
        }
    }
}

impl FromStr for WalletType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "site_credit" => Ok(Self::SiteCredit),
            "cash" => Ok(Self::Cash),
            other => Err(ValidationError(format!(
                "wallet type must be site_credit or cash: `{other}`"
            ))),
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstantWin {
    pub name: String,
    pub qty: u32,
    /// Comma separated winning ticket numbers.
    #[serde(default)]
    pub numbers: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub wallet_type: WalletType,
}

impl InstantWin {
    #[must_use]
    pub fn ticket_numbers(&self) -> Vec<TicketNumber> {
        self.numbers
            .split(',')
            .filter_map(|raw| TicketNumber::parse(raw).ok())
            .collect()
    }
}

/// A fixed (quantity, discount%) pricing tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulkBundle {
    pub quantity: u32,
    pub discount_percent: f64,
}

impl BulkBundle {
    #[must_use]
    pub const fn new(quantity: u32, discount_percent: f64) -> Self {
        Self {
            quantity,
            discount_percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competition {
    pub id: CompetitionId,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub video: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub hot: bool,
    #[serde(default)]
    pub instant: bool,
    pub max_tickets: u64,
    #[serde(default)]
    pub max_tickets_per_user: Option<u32>,
    #[serde(default)]
    pub tickets_sold: u64,
    #[serde(default)]
    pub sold_override: u32,
    /// Sold percentage as derived by the listing endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold: Option<u32>,
    #[serde(default)]
    pub end_datetime: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub instant_wins: Vec<InstantWin>,
    #[serde(default)]
    pub instant_win_image: String,
    #[serde(default)]
    pub instant_win_type: WalletType,
    #[serde(default)]
    pub instant_win_ticket_numbers: Vec<u64>,
    #[serde(default)]
    pub instant_wins_found: u32,
    #[serde(default = "default_prize_value")]
    pub prize_value: String,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub bulk_bundles: Vec<BulkBundle>,
}

fn default_category() -> String {
    "all".to_string()
}

fn default_prize_value() -> String {
    "0".to_string()
}

impl Competition {
    /// Uses the server value when present, otherwise the listing endpoint's rule.
    #[must_use]
    pub fn sold_percent(&self) -> u32 {
        if let Some(sold) = self.sold {
            return sold;
        }
        if self.sold_override > 0 {
            return self.sold_override;
        }
        if self.max_tickets > 0 && self.tickets_sold > 0 {
            // Half-way values round to even, as the backend does.
            let pct = (self.tickets_sold as f64 / self.max_tickets as f64 * 100.0)
                .round_ties_even();
            return pct.min(100.0) as u32;
        }
        0
    }

    #[must_use]
    pub fn tickets_remaining(&self) -> u64 {
        self.max_tickets.saturating_sub(self.tickets_sold)
    }

    #[must_use]
    pub fn primary_media(&self) -> &str {
        if self.image.is_empty() {
            &self.video
        } else {
            &self.image
        }
    }

    /// `None` when the competition has no end date or it cannot be read.
    #[must_use]
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        parse_end_datetime(&self.end_datetime)
    }
}

/// Accepts RFC 3339 timestamps and the naive `YYYY-MM-DDTHH:MM[:SS[.f]]`
/// form produced by datetime inputs; naive values are read as UTC.
#[must_use]
pub fn parse_end_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Listing tabs. `All` means no tag filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    All,
    Jackpot,
    Spin,
    Instawins,
    Rolling,
    Vip,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::All,
        Self::Jackpot,
        Self::Spin,
        Self::Instawins,
        Self::Rolling,
        Self::Vip,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Jackpot => "jackpot",
            Self::Spin => "spin",
            Self::Instawins => "instawins",
            Self::Rolling => "rolling",
            Self::Vip => "vip",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Jackpot => "Jackpot",
            Self::Spin => "Spin",
            Self::Instawins => "Instawins",
            Self::Rolling => "Rolling",
            Self::Vip => "VIP",
        }
    }

    /// Query value for `GET /competitions?tag=`.
    #[must_use]
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| ValidationError(format!("unknown category `{s}`")))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
