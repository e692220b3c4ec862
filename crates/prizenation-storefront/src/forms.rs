// SPDX-License-Identifier: Apache-2.0
//! Admin form state and the checks run before anything is sent.

use std::fmt;
use std::path::Path;

use prizenation_api::CompetitionPayload;
use prizenation_model::{
    parse_end_datetime, BulkBundle, Competition, TicketNumber, WalletType, FORM_CATEGORIES,
};
use serde::ser::{Serialize, SerializeMap, Serializer};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const DEFAULT_BUNDLE_INPUT: &str = "10:0,25:5,50:10,100:15";
const MIN_PRICE: f64 = 0.01;

const VIDEO_EXTENSIONS: [&str; 7] = ["mp4", "webm", "mov", "m4v", "ogv", "avi", "mkv"];

/// Field errors in the order the form lays its fields out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: Vec<(&'static str, String)>,
}

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (field, message)) in self.entries.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl Serialize for FormErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Raw admin form input. Numeric fields stay text until submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionForm {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub price: String,
    pub sale_price: String,
    pub max_tickets: String,
    pub max_tickets_per_user: String,
    pub sold: String,
    pub image: String,
    pub video: String,
    pub category: String,
    pub tags: Vec<String>,
    pub hot: bool,
    pub instant: bool,
    pub prize_value: String,
    pub end_datetime: String,
    pub instant_win_image: String,
    pub instant_win_type: WalletType,
    /// Comma separated ticket numbers.
    pub instant_win_tickets: String,
    /// `quantity:percent` pairs, comma separated.
    pub bulk_bundles: String,
    /// Set when editing; see [`StoredFields`].
    pub stored: StoredFields,
}

/// Values a competition was loaded with. Stored values that older
/// records carry in free-form shapes are sent back unchecked as long as
/// the edit leaves them alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredFields {
    pub category: Option<String>,
    pub end_datetime: Option<String>,
}

impl StoredFields {
    fn keeps(stored: Option<&String>, current: &str) -> bool {
        stored.is_some_and(|value| value.trim() == current.trim())
    }
}

impl Default for CompetitionForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            description: String::new(),
            price: String::new(),
            sale_price: String::new(),
            max_tickets: String::new(),
            max_tickets_per_user: String::new(),
            sold: "0".to_string(),
            image: String::new(),
            video: String::new(),
            category: "all".to_string(),
            tags: Vec::new(),
            hot: false,
            instant: false,
            prize_value: String::new(),
            end_datetime: String::new(),
            instant_win_image: String::new(),
            instant_win_type: WalletType::SiteCredit,
            instant_win_tickets: String::new(),
            bulk_bundles: DEFAULT_BUNDLE_INPUT.to_string(),
            stored: StoredFields::default(),
        }
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn format_bundles(bundles: &[BulkBundle]) -> String {
    bundles
        .iter()
        .map(|b| format!("{}:{}", b.quantity, b.discount_percent))
        .collect::<Vec<_>>()
        .join(",")
}

impl CompetitionForm {
    /// Pre-fills the edit form from a stored competition.
    #[must_use]
    pub fn from_competition(c: &Competition) -> Self {
        let tickets = c
            .instant_win_ticket_numbers
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            title: c.title.clone(),
            subtitle: c.subtitle.clone(),
            description: c.description.clone(),
            price: c.price.to_string(),
            sale_price: c.sale_price.map(|p| p.to_string()).unwrap_or_default(),
            max_tickets: c.max_tickets.to_string(),
            max_tickets_per_user: c
                .max_tickets_per_user
                .map(|m| m.to_string())
                .unwrap_or_default(),
            sold: c.sold_override.to_string(),
            image: c.image.clone(),
            video: c.video.clone(),
            category: if blank(&c.category) {
                "all".to_string()
            } else {
                c.category.clone()
            },
            tags: c.tags.clone(),
            hot: c.hot,
            instant: c.instant,
            prize_value: c.prize_value.clone(),
            end_datetime: c.end_datetime.clone(),
            instant_win_image: c.instant_win_image.clone(),
            instant_win_type: c.instant_win_type,
            instant_win_tickets: tickets,
            bulk_bundles: if c.bulk_bundles.is_empty() {
                DEFAULT_BUNDLE_INPUT.to_string()
            } else {
                format_bundles(&c.bulk_bundles)
            },
            stored: StoredFields {
                category: Some(c.category.clone()),
                end_datetime: Some(c.end_datetime.clone()),
            },
        }
    }

    /// Required-field checks. Nothing may be sent while this fails.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        self.check_required(&mut errors);
        errors.into_result()
    }

    fn check_required(&self, errors: &mut FormErrors) -> Option<(f64, u64)> {
        if blank(&self.title) {
            errors.push("title", "Title is required");
        }
        if blank(&self.subtitle) {
            errors.push("subtitle", "Subtitle is required");
        }
        if blank(&self.description) {
            errors.push("description", "Description is required");
        }
        let price = match self.price.trim().parse::<f64>() {
            Ok(p) if p.is_finite() && p >= MIN_PRICE => Some(p),
            _ => {
                errors.push("price", "Price must be at least £0.01");
                None
            }
        };
        let max_tickets = match self.max_tickets.trim().parse::<u64>() {
            Ok(n) if n >= 1 => Some(n),
            _ => {
                errors.push("max_tickets", "Max tickets must be at least 1");
                None
            }
        };
        price.zip(max_tickets)
    }

    /// Validates, then maps the form onto the request body.
    pub fn to_payload(&self) -> Result<CompetitionPayload, FormErrors> {
        let mut errors = FormErrors::new();
        let required = self.check_required(&mut errors);

        let sale_price = if blank(&self.sale_price) {
            None
        } else {
            match self.sale_price.trim().parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => Some(p),
                _ => {
                    errors.push("sale_price", "Sale price must be a number");
                    None
                }
            }
        };
        let max_tickets_per_user = if blank(&self.max_tickets_per_user) {
            None
        } else {
            match self.max_tickets_per_user.trim().parse::<u32>() {
                Ok(n) => Some(n),
                Err(_) => {
                    errors.push(
                        "max_tickets_per_user",
                        "Max tickets per user must be a whole number",
                    );
                    None
                }
            }
        };
        let category_kept = StoredFields::keeps(self.stored.category.as_ref(), &self.category);
        let category = if category_kept {
            self.category.trim().to_string()
        } else if blank(&self.category) {
            "all".to_string()
        } else {
            self.category.trim().to_ascii_lowercase()
        };
        if !category_kept && !FORM_CATEGORIES.contains(&category.as_str()) {
            errors.push(
                "category",
                format!("Category must be one of: {}", FORM_CATEGORIES.join(", ")),
            );
        }
        let end_kept = StoredFields::keeps(self.stored.end_datetime.as_ref(), &self.end_datetime);
        if !end_kept
            && !blank(&self.end_datetime)
            && parse_end_datetime(&self.end_datetime).is_none()
        {
            errors.push("end_datetime", "End date must be a valid date and time");
        }
        let bulk_bundles = match parse_bulk_bundles(&self.bulk_bundles) {
            Ok(b) => b,
            Err(message) => {
                errors.push("bulk_bundles", message);
                Vec::new()
            }
        };
        let (price, max_tickets) = match required {
            Some(values) if errors.is_empty() => values,
            _ => return Err(errors),
        };

        Ok(CompetitionPayload {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            description: self.description.clone(),
            price,
            sale_price,
            video: self.video.clone(),
            image: self.image.clone(),
            hot: self.hot,
            instant: self.instant,
            max_tickets,
            max_tickets_per_user,
            tickets_sold: 0,
            sold_override: self.sold.trim().parse::<u32>().unwrap_or(0),
            end_datetime: self.end_datetime.trim().to_string(),
            category,
            tags: self.tags.clone(),
            instant_wins: Vec::new(),
            instant_win_image: self.instant_win_image.clone(),
            instant_win_type: self.instant_win_type,
            instant_win_ticket_numbers: parse_ticket_list(&self.instant_win_tickets),
            instant_wins_found: 0,
            prize_value: if blank(&self.prize_value) {
                "0".to_string()
            } else {
                self.prize_value.trim().to_string()
            },
            benefits: Vec::new(),
            bulk_bundles,
        })
    }

    /// Stores an uploaded media URL in the slot it was uploaded for.
    pub fn apply_upload(&mut self, slot: MediaSlot, kind: MediaKind, url: &str) {
        match (slot, kind) {
            (MediaSlot::InstantWin, _) => self.instant_win_image = url.to_string(),
            (MediaSlot::Featured, MediaKind::Video) => {
                self.video = url.to_string();
                self.image.clear();
            }
            (MediaSlot::Featured, MediaKind::Image) => {
                self.image = url.to_string();
                self.video.clear();
            }
        }
    }
}

/// Comma separated ticket numbers; blanks and non-numbers are dropped.
#[must_use]
pub fn parse_ticket_list(input: &str) -> Vec<u64> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<u64>().ok())
        .collect()
}

/// Parses `quantity:percent` pairs such as `10:0,25:5`.
pub fn parse_bulk_bundles(input: &str) -> Result<Vec<BulkBundle>, String> {
    let mut bundles = Vec::new();
    for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let invalid = || format!("Bulk bundle `{raw}` must look like quantity:percent");
        let (qty, pct) = raw.split_once(':').ok_or_else(invalid)?;
        let quantity = qty.trim().parse::<u32>().map_err(|_| invalid())?;
        let discount_percent = pct.trim().parse::<f64>().map_err(|_| invalid())?;
        if quantity == 0 || !(0.0..=100.0).contains(&discount_percent) {
            return Err(invalid());
        }
        bundles.push(BulkBundle::new(quantity, discount_percent));
    }
    Ok(bundles)
}

/// Draw-winner input: a positive ticket number.
pub fn validate_draw_ticket(input: &str) -> Result<TicketNumber, String> {
    TicketNumber::parse(input).map_err(|_| "Please enter a ticket number".to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Self::Video
        } else {
            Self::Image
        }
    }

    #[must_use]
    pub const fn mime_prefix(self) -> &'static str {
        match self {
            Self::Image => "image/",
            Self::Video => "video/",
        }
    }
}

/// Where an uploaded file lands in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSlot {
    Featured,
    InstantWin,
}

/// Local checks run before a file is posted to `/upload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadCheck {
    pub kind: MediaKind,
    pub size: u64,
}

impl UploadCheck {
    pub fn inspect(path: &Path, size: u64) -> Result<Self, String> {
        if size > MAX_UPLOAD_BYTES {
            return Err("File size must be less than 10MB".to_string());
        }
        Ok(Self {
            kind: MediaKind::from_path(path),
            size,
        })
    }
}
