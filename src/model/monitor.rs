use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::geometry::Rect;

/// Display-server identifier of a physical output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputId(pub u32);

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "output#{}", self.0) }
}

/// An output as reported by the display server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub id: OutputId,
    pub rect: Rect,
}

/// Space kept free for a panel along the top or bottom of a monitor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strut {
    pub top: i32,
    pub bottom: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub output: OutputId,
    pub rect: Rect,
    pub strut: Strut,
    pub desktop: usize,
    /// Desktop shown before the current one, for `last_desktop`.
    pub last_desktop: usize,
}

impl Monitor {
    pub fn new(output: Output, strut: Strut, desktop: usize) -> Monitor {
        Monitor {
            output: output.id,
            rect: output.rect,
            strut,
            desktop,
            last_desktop: desktop,
        }
    }

    /// The monitor's rectangle minus the panel strip.
    pub fn usable(&self) -> Rect {
        let top = self.strut.top.min(self.rect.h - 1).max(0);
        let bottom = self.strut.bottom.min(self.rect.h - 1 - top).max(0);
        Rect {
            x: self.rect.x,
            y: self.rect.y + top,
            w: self.rect.w,
            h: self.rect.h - top - bottom,
        }
    }

    pub(crate) fn show(&mut self, desktop: usize) {
        if desktop != self.desktop {
            self.last_desktop = self.desktop;
            self.desktop = desktop;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usable_area_skips_the_panel() {
        let output = Output { id: OutputId(1), rect: Rect::new(1920, 0, 1280, 1024) };
        let top = Monitor::new(output, Strut { top: 20, bottom: 0 }, 0);
        assert_eq!(top.usable(), Rect::new(1920, 20, 1280, 1004));
        let bottom = Monitor::new(output, Strut { top: 0, bottom: 24 }, 0);
        assert_eq!(bottom.usable(), Rect::new(1920, 0, 1280, 1000));
    }
}
