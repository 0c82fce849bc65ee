//! Normalization of the scroll host's offset into the single progress scalar.

use crate::constants::{SCROLL_DAMPING_SEC, SCROLL_PAGES};
use crate::easing::{clamp01, Damping};

/// Anything that yields the frame's progress in \[0, 1\].
pub trait ProgressSource {
    fn progress(&self) -> f32;
}

impl ProgressSource for f32 {
    fn progress(&self) -> f32 {
        clamp01(*self)
    }
}

/// Fraction of `range` covered by `offset`, clamped. An empty range reads as 0.
#[inline]
pub fn normalize_offset(offset: f32, range: f32) -> f32 {
    if !(range > 0.0) || !offset.is_finite() {
        return 0.0;
    }
    clamp01(offset / range)
}

/// Scroll container spanning `pages` viewport heights, with the reported
/// offset eased toward the raw scroll position.
#[derive(Clone, Debug)]
pub struct ScrollProgress {
    pages: f32,
    damping: Damping,
    target: f32,
    offset: f32,
}

impl Default for ScrollProgress {
    fn default() -> Self {
        Self::new(SCROLL_PAGES, SCROLL_DAMPING_SEC)
    }
}

impl ScrollProgress {
    pub fn new(pages: f32, damping_sec: f32) -> Self {
        Self {
            pages: pages.max(1.0),
            damping: Damping::TimeConstant(damping_sec),
            target: 0.0,
            offset: 0.0,
        }
    }

    pub fn pages(&self) -> f32 {
        self.pages
    }

    /// Scrollable distance for a viewport of `viewport_height` pixels.
    pub fn scroll_range(&self, viewport_height: f32) -> f32 {
        (self.pages - 1.0) * viewport_height.max(0.0)
    }

    /// Feed the host's raw scroll position in pixels, assuming the container
    /// spans exactly `pages` viewport heights.
    pub fn set_scroll(&mut self, scroll_top: f32, viewport_height: f32) {
        self.target = normalize_offset(scroll_top, self.scroll_range(viewport_height));
    }

    /// Feed the raw scroll position against a measured scrollable distance
    /// (`scrollHeight - clientHeight`). A non-positive range falls back to
    /// the page count.
    pub fn set_scroll_measured(&mut self, scroll_top: f32, range: f32, viewport_height: f32) {
        if range > 0.0 {
            self.target = normalize_offset(scroll_top, range);
        } else {
            self.set_scroll(scroll_top, viewport_height);
        }
    }

    /// Feed an already-normalized target directly.
    pub fn set_target(&mut self, t: f32) {
        self.target = if t.is_finite() { clamp01(t) } else { 0.0 };
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Ease the reported offset toward the target; call once per frame.
    pub fn advance(&mut self, dt_sec: f32) -> f32 {
        let f = self.damping.factor(dt_sec);
        self.offset = clamp01(self.offset + (self.target - self.offset) * f);
        self.offset
    }

    /// Jump straight to the target.
    pub fn snap(&mut self) -> f32 {
        self.offset = self.target;
        self.offset
    }
}

impl ProgressSource for ScrollProgress {
    fn progress(&self) -> f32 {
        self.offset
    }
}
