use tracing::{debug, trace, warn};

use crate::actor::reactor::error::{LogFailure, ReactorError};
use crate::actor::reactor::{Reactor, WindowInfo};
use crate::model::client::{Client, WindowId};
use crate::model::desktop::Mode;
use crate::model::geometry::Rect;

pub struct WindowEventHandler;

impl WindowEventHandler {
    pub fn handle_window_created(reactor: &mut Reactor, info: WindowInfo) {
        if let Some(desktop) = reactor.state.desktop_of(info.window) {
            debug!(window = %info.window, desktop, "map request for a managed window");
            if reactor.state.is_displayed(desktop) {
                reactor.backend.map(info.window).or_log("map");
            }
            return;
        }

        let rule = reactor.config.find_app_rule(&info.class, &info.title).cloned();
        let desktop = Self::desktop_for(reactor, &info, rule.as_ref().and_then(|r| r.desktop));
        let border = reactor.config.settings.border_width;
        if reactor.backend.manage(info.window, border).or_log("manage").is_none() {
            return;
        }

        let mut client = Client::new(info.window, info.geometry);
        client.title = info.title;
        client.class = info.class;
        client.transient = info.transient_for.is_some();
        client.floating = info.wants_floating || rule.as_ref().is_some_and(|r| r.floating);
        client.urgent = info.urgent;
        if !client.is_tiled() {
            let bounds = reactor
                .state
                .monitor_showing(desktop)
                .or(reactor.state.selected())
                .map(|idx| reactor.state.monitors()[idx].rect);
            if let Some(bounds) = bounds {
                client.geometry = place_floating(&client.geometry, &bounds);
            }
        }

        let anchor = reactor.insertion_anchor(desktop);
        debug!(window = %info.window, desktop, ?anchor, "managing window");
        reactor.state.desktops[desktop].insert(client, anchor);

        if reactor.state.is_displayed(desktop) {
            reactor.relayout(desktop);
            reactor.backend.map(info.window).or_log("map");
        }

        let follow = rule.as_ref().is_some_and(|r| r.follow);
        if follow && reactor.state.selected_desktop() != Some(desktop) {
            if let Some(monitor) = reactor.state.selected() {
                reactor.state.desktops[desktop].set_current(Some(info.window));
                reactor.switch_desktop(monitor, desktop);
                return;
            }
        }
        reactor.focus(desktop, Some(info.window));
    }

    /// Transients go with their parent, then app rules, then the desktop the
    /// client asked for, then the selected desktop.
    fn desktop_for(reactor: &Reactor, info: &WindowInfo, rule_desktop: Option<usize>) -> usize {
        let fallback = reactor.state.selected_desktop().unwrap_or(0);
        let parent = info.transient_for.and_then(|parent| reactor.state.desktop_of(parent));
        let Some(desktop) = parent.or(rule_desktop).or(info.desktop) else {
            return fallback;
        };
        let desktops = reactor.state.desktops.len();
        if desktop >= desktops {
            warn!(window = %info.window, "{}", ReactorError::DesktopOutOfRange { desktop, desktops });
            return fallback;
        }
        desktop
    }

    /// Destroyed and withdrawn windows both leave the manager.
    pub fn handle_window_gone(reactor: &mut Reactor, window: WindowId) {
        let Some(desktop) = reactor.state.desktop_of(window) else {
            trace!("ignoring: {}", ReactorError::UnknownWindow(window));
            return;
        };
        reactor.state.desktops[desktop].remove(window);
        debug!(%window, desktop, "unmanaged window");
        reactor.relayout(desktop);
        let current = reactor.state.desktops[desktop].current();
        reactor.focus(desktop, current);
    }

    /// Unmanaged windows get what they ask for. Floating clients, and every
    /// client in float mode, are kept on their monitor. Tiled clients are
    /// told their current geometry.
    pub fn handle_geometry_request(reactor: &mut Reactor, window: WindowId, rect: Rect, border: i32) {
        let Some(desktop) = reactor.state.desktop_of(window) else {
            reactor.backend.move_resize(window, rect, border).or_log("move_resize");
            return;
        };
        let border_width = reactor.config.settings.border_width;
        let bounds = reactor
            .state
            .monitor_showing(desktop)
            .map(|idx| reactor.state.monitors()[idx].rect);
        let d = &mut reactor.state.desktops[desktop];
        let float_mode = d.mode == Mode::Float;
        let Some(client) = d.client_mut(window) else {
            return;
        };

        if client.is_tiled() && !float_mode {
            let geometry = client.geometry;
            trace!(%window, ?rect, ?geometry, "refusing geometry request from tiled client");
            reactor
                .backend
                .confirm_geometry(window, geometry, border_width)
                .or_log("confirm_geometry");
            return;
        }

        client.geometry = match bounds {
            Some(bounds) => rect.clamped_into(&bounds),
            None => rect,
        };
        let geometry = client.geometry;
        if bounds.is_some() {
            reactor.backend.move_resize(window, geometry, border_width).or_log("move_resize");
        }
    }

    pub fn handle_title_changed(reactor: &mut Reactor, window: WindowId, title: String) {
        let Some(desktop) = reactor.state.desktop_of(window) else {
            return;
        };
        if let Some(client) = reactor.state.desktops[desktop].client_mut(window) {
            client.title = title;
        }
    }

    pub fn handle_urgency_changed(reactor: &mut Reactor, window: WindowId, urgent: bool) {
        let Some(desktop) = reactor.state.desktop_of(window) else {
            return;
        };
        let focused = reactor.state.selected_desktop() == Some(desktop)
            && reactor.state.desktops[desktop].current() == Some(window);
        if let Some(client) = reactor.state.desktops[desktop].client_mut(window) {
            client.urgent = urgent && !focused;
        }
        reactor.paint_border(desktop, window);
    }
}

/// Windows that did not pick a position are centered on the monitor.
fn place_floating(geometry: &Rect, bounds: &Rect) -> Rect {
    if geometry.x == 0 && geometry.y == 0 {
        geometry.centered_in(bounds)
    } else {
        geometry.clamped_into(bounds)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unpositioned_floating_windows_are_centered() {
        let bounds = Rect { x: 0, y: 0, w: 1000, h: 800 };
        let placed = place_floating(&Rect { x: 0, y: 0, w: 200, h: 100 }, &bounds);
        assert_eq!(placed, Rect { x: 400, y: 350, w: 200, h: 100 });
    }
}
