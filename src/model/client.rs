use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::geometry::{FULL, PercentRect, Rect};

/// Protocol handle of a managed window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub u32);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

/// Gap allowance on each side of a tiled client.
///
/// Sides on the monitor boundary get the whole gap. Interior sides get half,
/// split so that the two clients sharing an edge add up to one full gap.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gaps {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Gaps {
    pub fn uniform(gap: i32) -> Gaps { Gaps { left: gap, top: gap, right: gap, bottom: gap } }

    pub fn for_rect(rect: &PercentRect, gap: i32) -> Gaps {
        let leading = gap / 2;
        let trailing = gap - leading;
        Gaps {
            left: if rect.x == 0 { gap } else { trailing },
            top: if rect.y == 0 { gap } else { trailing },
            right: if rect.right() == FULL { gap } else { leading },
            bottom: if rect.bottom() == FULL { gap } else { leading },
        }
    }

    /// Shrinks `rect` by these gaps and by a border of `border` pixels on
    /// every side. The result is never smaller than one pixel.
    pub fn apply(&self, rect: &Rect, border: i32) -> Rect {
        Rect {
            x: rect.x + self.left,
            y: rect.y + self.top,
            w: (rect.w - self.left - self.right - 2 * border).max(1),
            h: (rect.h - self.top - self.bottom - 2 * border).max(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub window: WindowId,
    /// Canonical position inside the partition. Only meaningful for tiled
    /// clients.
    pub percent: PercentRect,
    /// Last pixel geometry sent to (or, for floating clients, accepted from)
    /// the display server.
    pub geometry: Rect,
    pub gaps: Gaps,
    pub floating: bool,
    pub transient: bool,
    pub urgent: bool,
    pub title: String,
    pub class: String,
}

impl Client {
    pub fn new(window: WindowId, geometry: Rect) -> Client {
        Client {
            window,
            percent: PercentRect::FULL,
            geometry,
            gaps: Gaps::default(),
            floating: false,
            transient: false,
            urgent: false,
            title: String::new(),
            class: String::new(),
        }
    }

    pub fn is_tiled(&self) -> bool { !self.floating && !self.transient }

    pub fn refresh_gaps(&mut self, gap: i32) { self.gaps = Gaps::for_rect(&self.percent, gap); }

    /// Pixel geometry for this client when tiled inside `area`.
    pub fn tiled_geometry(&self, area: &Rect, border: i32) -> Rect {
        self.gaps.apply(&self.percent.to_pixels(area), border)
    }
}
