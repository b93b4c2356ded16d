use tracing::{debug, trace};

use super::Reactor;
use super::error::LogFailure;
use crate::layout_engine::stacking_order;
use crate::model::client::WindowId;
use crate::sys::backend::ColorRole;

impl Reactor {
    /// Makes `window` the current client of `desktop`. `None` clears the
    /// desktop's focus.
    ///
    /// Input focus only moves when `desktop` is on the selected monitor;
    /// otherwise this just updates the desktop's focus pointers and borders.
    pub(crate) fn focus(&mut self, desktop: usize, window: Option<WindowId>) {
        let selected = self.state.selected_desktop() == Some(desktop);
        let d = &mut self.state.desktops[desktop];
        let window = window.filter(|&w| d.contains(w));
        let old = d.set_current(window);
        if selected {
            if let Some(client) = window.and_then(|w| d.client_mut(w)) {
                client.urgent = false;
            }
        }
        trace!(desktop, ?old, ?window, "focus");

        if let Some(old) = old.filter(|&o| Some(o) != window) {
            self.paint_border(desktop, old);
        }
        if let Some(window) = window {
            self.paint_border(desktop, window);
        }
        self.restack(desktop);
        if selected {
            self.backend.set_input_focus(window).or_log("set_input_focus");
        }
    }

    pub(crate) fn paint_border(&mut self, desktop: usize, window: WindowId) {
        let d = &self.state.desktops[desktop];
        let Some(client) = d.client(window) else {
            return;
        };
        let role = if client.urgent {
            ColorRole::Urgent
        } else if d.current() == Some(window) && self.state.selected_desktop() == Some(desktop) {
            ColorRole::Focused
        } else {
            ColorRole::Unfocused
        };
        self.backend.set_border(window, role).or_log("set_border");
    }

    /// Raises floating clients (and the current client in stacked modes)
    /// above the rest.
    pub(crate) fn restack(&mut self, desktop: usize) {
        if !self.state.is_displayed(desktop) {
            return;
        }
        for window in stacking_order(&self.state.desktops[desktop]) {
            self.backend.raise(window).or_log("raise");
        }
    }

    /// Moves keyboard commands to `monitor` and focuses its desktop's current
    /// client.
    pub(crate) fn select_monitor(&mut self, monitor: usize) {
        if self.state.selected() == Some(monitor) || monitor >= self.state.monitors().len() {
            return;
        }
        let previous = self.state.selected_desktop();
        self.state.select(monitor);
        debug!(monitor, "selected monitor");
        if let Some(previous) = previous {
            if let Some(window) = self.state.desktops[previous].current() {
                self.paint_border(previous, window);
            }
        }
        if let Some(desktop) = self.state.selected_desktop() {
            let current = self.state.desktops[desktop].current();
            self.focus(desktop, current);
        }
    }

    /// The client a new tiled client on `desktop` splits. Normally the
    /// current client; when that one floats, the tiled client under the
    /// pointer. `None` lets the desktop fall back to its first tiled client.
    pub(crate) fn insertion_anchor(&mut self, desktop: usize) -> Option<WindowId> {
        let current = self.state.desktops[desktop].current_client()?;
        if current.is_tiled() {
            return Some(current.window);
        }
        if !self.state.is_displayed(desktop) {
            return None;
        }
        let (x, y) = self.backend.pointer().or_log("pointer")?;
        self.state.desktops[desktop]
            .clients()
            .iter()
            .find(|c| c.is_tiled() && c.geometry.contains(x, y))
            .map(|c| c.window)
    }
}
