use serde::{Deserialize, Serialize};

/// Full extent of a percentage axis.
pub const FULL: i32 = 100;

/// Pixel rectangle in root-window coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self { Rect { x, y, w, h } }

    pub fn right(&self) -> i32 { self.x + self.w }

    pub fn bottom(&self) -> i32 { self.y + self.h }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Moves (and if needed shrinks) `self` so that it lies inside `bounds`.
    pub fn clamped_into(&self, bounds: &Rect) -> Rect {
        let w = self.w.clamp(1, bounds.w.max(1));
        let h = self.h.clamp(1, bounds.h.max(1));
        let x = self.x.clamp(bounds.x, bounds.right() - w);
        let y = self.y.clamp(bounds.y, bounds.bottom() - h);
        Rect { x, y, w, h }
    }

    /// Places a rectangle of this size in the middle of `bounds`.
    pub fn centered_in(&self, bounds: &Rect) -> Rect {
        let w = self.w.clamp(1, bounds.w.max(1));
        let h = self.h.clamp(1, bounds.h.max(1));
        Rect {
            x: bounds.x + (bounds.w - w) / 2,
            y: bounds.y + (bounds.h - h) / 2,
            w,
            h,
        }
    }
}

/// A rectangle expressed in percentage points of a monitor's usable area.
///
/// Every coordinate lies in `[0, 100]`; `x + w` and `y + h` never exceed 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PercentRect {
    pub const FULL: PercentRect = PercentRect { x: 0, y: 0, w: FULL, h: FULL };

    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self { PercentRect { x, y, w, h } }

    pub fn right(&self) -> i32 { self.x + self.w }

    pub fn bottom(&self) -> i32 { self.y + self.h }

    pub fn area(&self) -> i64 { self.w as i64 * self.h as i64 }

    pub fn is_degenerate(&self) -> bool { self.w <= 0 || self.h <= 0 }

    pub fn is_within_bounds(&self) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= FULL && self.bottom() <= FULL
    }

    pub fn overlaps(&self, other: &PercentRect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Maps this rectangle onto `area`. Edges are rounded independently so that
    /// rectangles sharing an edge in percent space share it in pixels too.
    pub fn to_pixels(&self, area: &Rect) -> Rect {
        let scale = |origin: i32, extent: i32, pct: i32| {
            origin + (extent as i64 * pct as i64 / FULL as i64) as i32
        };
        let left = scale(area.x, area.w, self.x);
        let right = scale(area.x, area.w, self.right());
        let top = scale(area.y, area.h, self.y);
        let bottom = scale(area.y, area.h, self.bottom());
        Rect { x: left, y: top, w: right - left, h: bottom - top }
    }
}

impl Default for PercentRect {
    fn default() -> Self { PercentRect::FULL }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn percent_rects_map_onto_shared_pixel_edges() {
        let area = Rect::new(10, 20, 1001, 333);
        let left = PercentRect::new(0, 0, 33, 100).to_pixels(&area);
        let right = PercentRect::new(33, 0, 67, 100).to_pixels(&area);
        assert_eq!(left.right(), right.x);
        assert_eq!(left.x, 10);
        assert_eq!(right.right(), 1011);
        assert_eq!(left.h, 333);
    }

    #[test]
    fn clamping_pulls_windows_back_on_screen() {
        let bounds = Rect::new(1920, 0, 1280, 1024);
        let rect = Rect::new(10, -40, 400, 300).clamped_into(&bounds);
        assert_eq!(rect, Rect::new(1920, 0, 400, 300));

        let huge = Rect::new(2000, 10, 4000, 4000).clamped_into(&bounds);
        assert_eq!(huge, bounds);
    }

    #[test]
    fn centering_keeps_size_when_it_fits() {
        let bounds = Rect::new(0, 0, 1000, 800);
        assert_eq!(Rect::new(5, 5, 200, 100).centered_in(&bounds), Rect::new(400, 350, 200, 100));
    }
}
