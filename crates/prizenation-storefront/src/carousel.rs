// SPDX-License-Identifier: Apache-2.0
//! Hero carousel over the first few competitions.
//!
//! Time is passed in explicitly so the state machine can be driven by a
//! ticker in the CLI and by fixed instants in tests.

use std::time::{Duration, Instant};

use prizenation_model::Competition;

pub const MAX_SLIDES: usize = 3;
pub const AUTO_ADVANCE: Duration = Duration::from_secs(5);
/// Auto-advance stays off this long after a manual move.
pub const MANUAL_PAUSE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    index: usize,
    last_advance: Instant,
    paused_until: Option<Instant>,
}

impl Carousel {
    #[must_use]
    pub fn new(slide_count: usize, now: Instant) -> Self {
        Self {
            len: slide_count.min(MAX_SLIDES),
            index: 0,
            last_advance: now,
            paused_until: None,
        }
    }

    #[must_use]
    pub fn slides(competitions: &[Competition]) -> &[Competition] {
        &competitions[..competitions.len().min(MAX_SLIDES)]
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_auto_playing(&self, now: Instant) -> bool {
        self.paused_until.map_or(true, |until| now >= until)
    }

    /// Advances for every full interval elapsed; returns whether the slide changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.len < 2 {
            return false;
        }
        if let Some(until) = self.paused_until {
            if now < until {
                return false;
            }
            self.paused_until = None;
            self.last_advance = until;
        }
        let elapsed = now.saturating_duration_since(self.last_advance);
        let steps = (elapsed.as_millis() / AUTO_ADVANCE.as_millis()) as usize;
        if steps == 0 {
            return false;
        }
        let before = self.index;
        self.index = (self.index + steps) % self.len;
        self.last_advance += AUTO_ADVANCE * u32::try_from(steps).unwrap_or(u32::MAX);
        before != self.index
    }

    pub fn next(&mut self, now: Instant) {
        if self.len > 0 {
            self.jump((self.index + 1) % self.len, now);
        }
    }

    pub fn previous(&mut self, now: Instant) {
        if self.len > 0 {
            let idx = if self.index == 0 {
                self.len - 1
            } else {
                self.index - 1
            };
            self.jump(idx, now);
        }
    }

    /// Out-of-range targets wrap around.
    pub fn jump(&mut self, index: usize, now: Instant) {
        if self.len == 0 {
            return;
        }
        self.index = index % self.len;
        self.paused_until = Some(now + MANUAL_PAUSE);
    }
}
