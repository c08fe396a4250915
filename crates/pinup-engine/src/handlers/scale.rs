//! Scroll-to-scale with centre preservation.
//!
//! Every image swap resizes the window programmatically. Some platforms echo
//! such a resize back as a scroll event, so each of the first
//! [`LOCK_CEILING`] resets swallows the next scroll.

use crate::input::InputEvent;
use crate::window::WindowControl;

use super::{ImageReplacer, InputHandler, ResetSubscriber};

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 2.0;

/// Scroll pixels per unit of scale.
pub const SCROLL_DIVISOR: f64 = 200.0;

/// Pixels per scroll line for line-based wheels.
pub const LINE_HEIGHT: f64 = 20.0;

/// Number of resets that arm scroll suppression.
pub const LOCK_CEILING: u8 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleHandler {
    base: (i32, i32),
    scale: f64,
    lock: u8,
    suppress_next: bool,
}

impl ScaleHandler {
    /// Starts at scale 1.0 with the window's current size as base.
    pub fn new(window: &dyn WindowControl) -> Self {
        Self {
            base: window.size(),
            scale: 1.0,
            lock: 0,
            suppress_next: false,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn base(&self) -> (i32, i32) {
        self.base
    }

    pub fn lock(&self) -> u8 {
        self.lock
    }

    pub fn suppressing(&self) -> bool {
        self.suppress_next
    }

    /// Recaptures the base size and returns to scale 1.0.
    pub fn reset(&mut self, window: &dyn WindowControl) {
        self.base = window.size();
        self.scale = 1.0;
        if self.lock < LOCK_CEILING {
            self.lock += 1;
            self.suppress_next = true;
        }
        log::debug!("scale reset to base {:?} (lock {})", self.base, self.lock);
    }

    /// Applies `dy` scroll pixels. The scale never grows the window past
    /// [`WindowControl::max_extent`] on either side.
    pub fn scroll(&mut self, dy: f64, window: &mut dyn WindowControl) {
        if self.suppress_next {
            self.suppress_next = false;
            log::debug!("scroll of {dy} suppressed after reset");
            return;
        }

        let max = window.max_extent().max(1);
        let longest = self.base.0.max(self.base.1).max(1);
        let upper = MAX_SCALE.min(f64::from(max) / f64::from(longest)).max(MIN_SCALE);
        self.scale = (self.scale + dy / SCROLL_DIVISOR).clamp(MIN_SCALE, upper);
        let width = ((f64::from(self.base.0) * self.scale) as i32).min(max);
        let height = ((f64::from(self.base.1) * self.scale) as i32).min(max);

        let (old_w, old_h) = window.size();
        let (x, y) = window.position();
        window.set_size(width, height);
        window.set_position(x + (old_w - width) / 2, y + (old_h - height) / 2);
        log::trace!("scale {:.2} -> {width}x{height}", self.scale);
    }
}

impl InputHandler for ScaleHandler {
    fn handle(
        &mut self,
        event: &InputEvent,
        window: &mut dyn WindowControl,
        _images: &mut dyn ImageReplacer,
    ) {
        if let InputEvent::MouseWheel { delta } = event {
            self.scroll(delta.y_pixels(LINE_HEIGHT), window);
        }
    }
}

impl ResetSubscriber for ScaleHandler {
    fn on_image_replaced(&mut self, window: &dyn WindowControl) {
        self.reset(window);
    }
}
