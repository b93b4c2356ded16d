use tracing::{debug, info};

use crate::model::client::WindowId;
use crate::model::desktop::Desktop;
use crate::model::monitor::{Monitor, Output, OutputId, Strut};

/// What `WmState::show` did to bring a desktop onto a monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shown {
    /// Nothing changed: same desktop, or the index was out of range.
    Unchanged,
    /// The desktop was on monitor `other`, which now shows `previous`.
    Swapped { other: usize, previous: usize },
    /// The desktop was hidden. `previous` is hidden now.
    Replaced { previous: usize },
}

/// All desktops and monitors, plus which monitor receives commands.
#[derive(Clone, Debug)]
pub struct WmState {
    pub desktops: Vec<Desktop>,
    monitors: Vec<Monitor>,
    selected: usize,
}

impl WmState {
    pub fn new(desktops: Vec<Desktop>) -> WmState {
        WmState { desktops, monitors: Vec::new(), selected: 0 }
    }

    pub fn monitors(&self) -> &[Monitor] { &self.monitors }

    pub fn monitor_mut(&mut self, idx: usize) -> Option<&mut Monitor> { self.monitors.get_mut(idx) }

    pub fn selected(&self) -> Option<usize> { (self.selected < self.monitors.len()).then_some(self.selected) }

    pub fn selected_monitor(&self) -> Option<&Monitor> { self.monitors.get(self.selected) }

    pub fn selected_desktop(&self) -> Option<usize> { self.selected_monitor().map(|m| m.desktop) }

    pub fn select(&mut self, monitor: usize) {
        if monitor < self.monitors.len() && monitor != self.selected {
            debug!(monitor, "selecting monitor");
            self.selected = monitor;
        }
    }

    pub fn monitor_showing(&self, desktop: usize) -> Option<usize> {
        self.monitors.iter().position(|m| m.desktop == desktop)
    }

    pub fn is_displayed(&self, desktop: usize) -> bool { self.monitor_showing(desktop).is_some() }

    pub fn desktop_of(&self, window: WindowId) -> Option<usize> {
        self.desktops.iter().position(|d| d.contains(window))
    }

    /// Brings `desktop` onto `monitor`. A desktop already visible elsewhere
    /// trades places with the one on `monitor`, so no desktop is ever shown
    /// twice.
    pub fn show(&mut self, monitor: usize, desktop: usize) -> Shown {
        let Some(current) = self.monitors.get(monitor).map(|m| m.desktop) else {
            return Shown::Unchanged;
        };
        if desktop >= self.desktops.len() || desktop == current {
            return Shown::Unchanged;
        }
        match self.monitor_showing(desktop) {
            Some(other) => {
                self.monitors[other].show(current);
                self.monitors[monitor].show(desktop);
                Shown::Swapped { other, previous: current }
            }
            None => {
                self.monitors[monitor].show(desktop);
                Shown::Replaced { previous: current }
            }
        }
    }

    /// Registers a new output, giving it the lowest desktop no monitor is
    /// showing. Returns its index, or `None` if every desktop is taken.
    pub fn add_monitor(&mut self, output: Output, strut: Strut) -> Option<usize> {
        let desktop = (0..self.desktops.len()).find(|&d| !self.is_displayed(d))?;
        info!(output = %output.id, ?output.rect, desktop, "adding monitor");
        self.monitors.push(Monitor::new(output, strut, desktop));
        Some(self.monitors.len() - 1)
    }

    pub fn remove_monitor(&mut self, output: OutputId) -> Option<Monitor> {
        let idx = self.monitors.iter().position(|m| m.output == output)?;
        let monitor = self.monitors.remove(idx);
        info!(%output, desktop = monitor.desktop, "removing monitor");
        if self.selected > idx || self.selected >= self.monitors.len() {
            self.selected = self.selected.saturating_sub(1);
        }
        Some(monitor)
    }

    pub fn monitor_index(&self, output: OutputId) -> Option<usize> {
        self.monitors.iter().position(|m| m.output == output)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::Direction;
    use crate::model::desktop::Mode;
    use crate::model::geometry::Rect;

    fn state(desktops: usize, outputs: usize) -> WmState {
        let mut state = WmState::new(
            (0..desktops).map(|_| Desktop::new(Mode::Tile, Direction::Right, 0)).collect(),
        );
        for i in 0..outputs {
            let rect = Rect::new(i as i32 * 1000, 0, 1000, 800);
            state.add_monitor(Output { id: OutputId(i as u32), rect }, Strut::default());
        }
        state
    }

    fn shown(state: &WmState) -> Vec<usize> { state.monitors().iter().map(|m| m.desktop).collect() }

    #[test]
    fn switching_to_a_visible_desktop_swaps() {
        let mut s = state(9, 2);
        assert_eq!(shown(&s), vec![0, 1]);
        assert_eq!(s.show(0, 1), Shown::Swapped { other: 1, previous: 0 });
        assert_eq!(shown(&s), vec![1, 0]);
    }

    #[test]
    fn switching_to_a_hidden_desktop_replaces() {
        let mut s = state(9, 2);
        assert_eq!(s.show(1, 5), Shown::Replaced { previous: 1 });
        assert_eq!(shown(&s), vec![0, 5]);
        assert_eq!(s.monitors()[1].last_desktop, 1);
        assert_eq!(s.show(1, 5), Shown::Unchanged);
        assert_eq!(s.show(1, 9), Shown::Unchanged);
    }

    #[test]
    fn no_desktop_is_ever_shown_twice() {
        let mut s = state(4, 3);
        for (monitor, desktop) in [(0, 2), (1, 2), (2, 3), (0, 0), (2, 1), (1, 3), (0, 1)] {
            s.show(monitor, desktop);
            let mut seen = shown(&s);
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 3, "after showing {desktop} on {monitor}");
        }
    }

    #[test]
    fn outputs_beyond_the_desktop_count_are_ignored() {
        let mut s = state(2, 2);
        let rect = Rect::new(2000, 0, 1000, 800);
        assert_eq!(s.add_monitor(Output { id: OutputId(7), rect }, Strut::default()), None);
    }

    #[test]
    fn removing_a_monitor_frees_its_desktop() {
        let mut s = state(9, 3);
        s.select(2);
        assert_eq!(s.remove_monitor(OutputId(1)).map(|m| m.desktop), Some(1));
        assert_eq!(s.selected(), Some(1));
        assert!(!s.is_displayed(1));
        let rect = Rect::new(0, 0, 640, 480);
        assert_eq!(s.add_monitor(Output { id: OutputId(9), rect }, Strut::default()), Some(2));
        assert_eq!(shown(&s), vec![0, 2, 1]);
    }
}
