//! Slide transition between frames.

use crate::application::Navigator;
use crate::domain::{Direction, FrameId};

/// Tracks which frame was last shown and how far its slide-in has got.
///
/// The direction is sampled from the navigator at the moment the top frame
/// changes and is only used to choose which side the content slides in from.
#[derive(Debug, Clone)]
pub struct Transition {
    shown: Option<FrameId>,
    direction: Direction,
    remaining: u8,
    total: u8,
}

impl Transition {
    pub fn new(total_ticks: u8) -> Self {
        Self {
            shown: None,
            direction: Direction::None,
            remaining: 0,
            total: total_ticks,
        }
    }

    /// Restarts the slide when the navigator's top frame has changed.
    pub fn observe(&mut self, navigator: &Navigator) {
        let top = navigator.current_ticket().map(|t| t.id);
        if top == self.shown {
            return;
        }
        self.shown = top;
        self.direction = navigator.direction();
        self.remaining = match (top, self.direction) {
            (None, _) | (_, Direction::None) => 0,
            _ => self.total,
        };
    }

    pub fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn is_animating(&self) -> bool {
        self.remaining > 0
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Horizontal offset of the content within a region `width` wide.
    /// Positive values push the content right.
    pub fn offset(&self, width: u16) -> i32 {
        if self.remaining == 0 || self.total == 0 {
            return 0;
        }
        let shift = i32::from(width) * i32::from(self.remaining) / i32::from(self.total);
        match self.direction {
            Direction::Forward => shift,
            Direction::Backward => -shift,
            Direction::None => 0,
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(4)
    }
}
