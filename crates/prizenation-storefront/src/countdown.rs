// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::Serialize;

const DAY: u64 = 86_400;
const HOUR: u64 = 3_600;
const MINUTE: u64 = 60;

/// Whole seconds until `end`, never negative.
#[must_use]
pub fn remaining_seconds(end: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        // Both operands are positive, so truncation is the floor.
        (millis / 1000).unsigned_abs()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Countdown {
    #[must_use]
    pub const fn from_seconds(total: u64) -> Self {
        Self {
            days: total / DAY,
            hours: (total % DAY) / HOUR,
            minutes: (total % HOUR) / MINUTE,
            seconds: total % MINUTE,
        }
    }

    #[must_use]
    pub fn until(end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_seconds(remaining_seconds(end, now))
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    #[must_use]
    pub const fn total_seconds(&self) -> u64 {
        self.days * DAY + self.hours * HOUR + self.minutes * MINUTE + self.seconds
    }
}

/// The four zero-padded tiles of the competition page timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownDisplay {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl CountdownDisplay {
    /// Shown before the competition has loaded.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::filled("--")
    }

    fn filled(value: &str) -> Self {
        Self {
            days: value.to_string(),
            hours: value.to_string(),
            minutes: value.to_string(),
            seconds: value.to_string(),
        }
    }

    #[must_use]
    pub fn from_countdown(countdown: Countdown) -> Self {
        Self {
            days: format!("{:02}", countdown.days),
            hours: format!("{:02}", countdown.hours),
            minutes: format!("{:02}", countdown.minutes),
            seconds: format!("{:02}", countdown.seconds),
        }
    }

    /// `None` end means the competition has no end date or is not loaded.
    #[must_use]
    pub fn at(end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match end {
            Some(end) => Self::from_countdown(Countdown::until(end, now)),
            None => Self::placeholder(),
        }
    }
}

impl std::fmt::Display for CountdownDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Listing card label: the largest non-zero unit, or `ENDED`.
#[must_use]
pub fn card_label(remaining: u64) -> String {
    if remaining == 0 {
        return "ENDED".to_string();
    }
    let c = Countdown::from_seconds(remaining);
    let text = if c.days > 0 {
        plural(c.days, "day")
    } else if c.hours > 0 {
        plural(c.hours, "hour")
    } else if c.minutes > 0 {
        plural(c.minutes, "minute")
    } else {
        plural(remaining, "second")
    };
    format!("Ends in {text}")
}
